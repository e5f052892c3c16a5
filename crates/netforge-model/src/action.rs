//! Event actions
//!
//! What the dataplane should do with a packet once an event matches it.
//! The action is a tagged value rather than a free-form string plus loose
//! argument fields, so an unknown shape fails at deserialization instead
//! of at build time.

use serde::{Deserialize, Serialize};

/// Action attached to a packet event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    /// Forward the packet out of the named port
    Forward {
        /// Egress port
        port: String,
    },
    /// Rewrite one packet field before forwarding
    Modify {
        /// Field to rewrite
        field: String,
        /// Replacement value
        value: String,
    },
    /// Drop the packet
    Drop,
}

impl EventAction {
    /// Check whether this action carries arguments
    #[inline]
    #[must_use]
    pub fn has_args(&self) -> bool {
        !matches!(self, Self::Drop)
    }
}

impl Default for EventAction {
    fn default() -> Self {
        Self::Drop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_action_is_drop() {
        assert_eq!(EventAction::default(), EventAction::Drop);
        assert!(!EventAction::default().has_args());
    }

    #[test]
    fn action_serde_roundtrip() {
        let action = EventAction::Modify {
            field: "ttl".to_string(),
            value: "64".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        let back: EventAction = serde_json::from_value(json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn malformed_action_fails_deserialization() {
        let loose = serde_json::json!({ "actionString": "Forward(p)", "p": "eth0" });
        assert!(serde_json::from_value::<EventAction>(loose).is_err());
    }
}
