//! Scenario documents
//!
//! A scenario is an ordered list of event references. It carries no back
//! reference to its project; the owning project is found by reverse query
//! over `scenario_ids` lists.

use crate::id::{EventId, ScenarioId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scenario document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Document id
    pub id: ScenarioId,
    /// Owning user; checked on every read and mutation
    pub owner_id: UserId,
    /// Display name, empty on creation
    pub name: String,
    /// Contained events, in execution order
    pub event_ids: Vec<EventId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Scenario {
    /// Create an empty scenario for `owner_id`
    #[must_use]
    pub fn new(owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ScenarioId::new(),
            owner_id,
            name: String::new(),
            event_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check ownership
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Rename the scenario
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Append an event reference at the end of the execution order
    pub fn push_event(&mut self, event_id: EventId) {
        self.event_ids.push(event_id);
        self.touch();
    }

    /// Remove an event reference, preserving the order of the rest
    ///
    /// Returns `false` if the id was not referenced.
    pub fn remove_event(&mut self, event_id: EventId) -> bool {
        let before = self.event_ids.len();
        self.event_ids.retain(|id| *id != event_id);
        let removed = self.event_ids.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
