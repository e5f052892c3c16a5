//! Packet event documents
//!
//! An event is one packet (a field map matching the project's packet format)
//! plus the action to apply when it matches. Like scenarios, events store no
//! back reference - the owning scenario is found by reverse query.

use crate::action::EventAction;
use crate::id::{EventId, UserId};
use crate::packet::FieldMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Packet event document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Document id
    pub id: EventId,
    /// Owning user; checked on every read and mutation
    pub owner_id: UserId,
    /// Packet fields: field name → value
    pub packet: FieldMap,
    /// Action applied when the packet matches
    pub action: EventAction,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create an event with an explicit packet and action
    #[must_use]
    pub fn new(owner_id: UserId, packet: FieldMap, action: EventAction) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            owner_id,
            packet,
            action,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an event seeded from a project's packet format
    ///
    /// The format's default values become the initial packet; the action
    /// starts as [`EventAction::Drop`].
    #[must_use]
    pub fn from_format(owner_id: UserId, format: &FieldMap) -> Self {
        Self::new(owner_id, format.clone(), EventAction::default())
    }

    /// Check ownership
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Replace packet and action together (the edit operation)
    pub fn update(&mut self, packet: FieldMap, action: EventAction) {
        self.packet = packet;
        self.action = action;
        self.touch();
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
