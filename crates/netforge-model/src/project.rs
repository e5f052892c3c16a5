//! Project documents
//!
//! A project owns its scenarios only through `scenario_ids` - the scenarios
//! themselves are separate documents, and the order of the id list is the
//! execution/display order. `packet_format` names the field set every event
//! under this project shares; its values double as defaults for new events.

use crate::id::{ProjectId, ScenarioId, UserId};
use crate::packet::FieldMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque response from the external builder, kept as-is in build history
pub type BuildRecord = serde_json::Value;

/// Project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Document id
    pub id: ProjectId,
    /// Owning user; checked on every read and mutation
    pub owner_id: UserId,
    /// Display name, empty on creation
    pub name: String,
    /// Shared packet field set: field name → default value
    pub packet_format: FieldMap,
    /// Contained scenarios, in execution order
    pub scenario_ids: Vec<ScenarioId>,
    /// Build history, most recent first
    pub builds: Vec<BuildRecord>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create an empty project for `owner_id`
    #[must_use]
    pub fn new(owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            owner_id,
            name: String::new(),
            packet_format: FieldMap::new(),
            scenario_ids: Vec::new(),
            builds: Vec::new(),
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

    /// Rename the project
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Replace the packet format
    pub fn set_packet_format(&mut self, format: FieldMap) {
        self.packet_format = format;
        self.touch();
    }

    /// Append a scenario reference at the end of the execution order
    pub fn push_scenario(&mut self, scenario_id: ScenarioId) {
        self.scenario_ids.push(scenario_id);
        self.touch();
    }

    /// Remove a scenario reference, preserving the order of the rest
    ///
    /// Returns `false` if the id was not referenced.
    pub fn remove_scenario(&mut self, scenario_id: ScenarioId) -> bool {
        let before = self.scenario_ids.len();
        self.scenario_ids.retain(|id| *id != scenario_id);
        let removed = self.scenario_ids.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Prepend a build result (history is most-recent-first)
    pub fn record_build(&mut self, build: BuildRecord) {
        self.builds.insert(0, build);
        self.touch();
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_is_empty() {
        let project = Project::new(UserId::new());
        assert!(project.name.is_empty());
        assert!(project.scenario_ids.is_empty());
        assert!(project.builds.is_empty());
    }

    #[test]
    fn scenario_order_is_preserved() {
        let mut project = Project::new(UserId::new());
        let (a, b, c) = (ScenarioId::new(), ScenarioId::new(), ScenarioId::new());
        project.push_scenario(a);
        project.push_scenario(b);
        project.push_scenario(c);

        assert!(project.remove_scenario(b));
        assert_eq!(project.scenario_ids, vec![a, c]);
        assert!(!project.remove_scenario(b));
    }

    #[test]
    fn builds_are_most_recent_first() {
        let mut project = Project::new(UserId::new());
        project.record_build(serde_json::json!({"build": 1}));
        project.record_build(serde_json::json!({"build": 2}));

        assert_eq!(project.builds[0], serde_json::json!({"build": 2}));
        assert_eq!(project.builds[1], serde_json::json!({"build": 1}));
    }

    #[test]
    fn ownership_check() {
        let owner = UserId::new();
        let project = Project::new(owner);
        assert!(project.is_owned_by(owner));
        assert!(!project.is_owned_by(UserId::new()));
    }
}
