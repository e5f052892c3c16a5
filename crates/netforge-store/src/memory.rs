//! In-memory reference store.
//!
//! One concurrent map per collection, plus two reverse indexes that are
//! maintained on every write touching a membership array:
//!
//! - scenario id -> the project listing it
//! - event id -> the scenario listing it
//!
//! The indexes make [`project_containing`](ReferenceStore::project_containing)
//! and [`scenario_containing`](ReferenceStore::scenario_containing) a pair
//! of map hits instead of a collection scan.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use netforge_model::{Event, EventId, Project, ProjectId, Scenario, ScenarioId, User, UserId};

use crate::error::{Collection, StoreError};
use crate::store::ReferenceStore;

/// Process-local [`ReferenceStore`] backed by concurrent hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    usernames: DashMap<String, UserId>,
    projects: DashMap<ProjectId, Project>,
    scenarios: DashMap<ScenarioId, Scenario>,
    events: DashMap<EventId, Event>,
    scenario_parent: DashMap<ScenarioId, ProjectId>,
    event_parent: DashMap<EventId, ScenarioId>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn index_project(&self, project: &Project) {
        self.scenario_parent
            .retain(|sid, pid| *pid != project.id || project.scenario_ids.contains(sid));
        for sid in &project.scenario_ids {
            self.scenario_parent.insert(*sid, project.id);
        }
    }

    fn index_scenario(&self, scenario: &Scenario) {
        self.event_parent
            .retain(|eid, sid| *sid != scenario.id || scenario.event_ids.contains(eid));
        for eid in &scenario.event_ids {
            self.event_parent.insert(*eid, scenario.id);
        }
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: Collection::Users,
                key: user.username.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(())
            }
        }
    }

    async fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::not_found(Collection::Users, id))
    }

    async fn user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let id = self
            .usernames
            .get(username)
            .map(|entry| *entry.value())
            .ok_or_else(|| StoreError::not_found(Collection::Users, username))?;
        self.get_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut all: Vec<User> = self.users.iter().map(|doc| doc.value().clone()).collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        match self.projects.entry(project.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: Collection::Projects,
                key: project.id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(project.clone());
                self.index_project(project);
                Ok(())
            }
        }
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, StoreError> {
        self.projects
            .get(&id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::not_found(Collection::Projects, id))
    }

    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        if !self.projects.contains_key(&project.id) {
            return Err(StoreError::not_found(Collection::Projects, project.id));
        }
        self.projects.insert(project.id, project.clone());
        self.index_project(project);
        Ok(())
    }

    async fn remove_project(&self, id: ProjectId) -> Result<(), StoreError> {
        self.projects.remove(&id);
        self.scenario_parent.retain(|_, pid| *pid != id);
        Ok(())
    }

    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, StoreError> {
        let mut owned: Vec<Project> = self
            .projects
            .iter()
            .filter(|doc| doc.owner_id == owner)
            .map(|doc| doc.value().clone())
            .collect();
        owned.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(owned)
    }

    async fn project_containing(&self, scenario: ScenarioId) -> Result<Project, StoreError> {
        let parent = self
            .scenario_parent
            .get(&scenario)
            .map(|entry| *entry.value())
            .ok_or_else(|| StoreError::not_found(Collection::Projects, scenario))?;
        self.get_project(parent).await
    }

    async fn insert_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        match self.scenarios.entry(scenario.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: Collection::Scenarios,
                key: scenario.id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(scenario.clone());
                self.index_scenario(scenario);
                Ok(())
            }
        }
    }

    async fn get_scenario(&self, id: ScenarioId) -> Result<Scenario, StoreError> {
        self.scenarios
            .get(&id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::not_found(Collection::Scenarios, id))
    }

    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        if !self.scenarios.contains_key(&scenario.id) {
            return Err(StoreError::not_found(Collection::Scenarios, scenario.id));
        }
        self.scenarios.insert(scenario.id, scenario.clone());
        self.index_scenario(scenario);
        Ok(())
    }

    async fn remove_scenario(&self, id: ScenarioId) -> Result<(), StoreError> {
        self.scenarios.remove(&id);
        self.scenario_parent.remove(&id);
        self.event_parent.retain(|_, sid| *sid != id);
        Ok(())
    }

    async fn scenario_containing(&self, event: EventId) -> Result<Scenario, StoreError> {
        let parent = self
            .event_parent
            .get(&event)
            .map(|entry| *entry.value())
            .ok_or_else(|| StoreError::not_found(Collection::Scenarios, event))?;
        self.get_scenario(parent).await
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        match self.events.entry(event.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: Collection::Events,
                key: event.id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(event.clone());
                Ok(())
            }
        }
    }

    async fn get_event(&self, id: EventId) -> Result<Event, StoreError> {
        self.events
            .get(&id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::not_found(Collection::Events, id))
    }

    async fn save_event(&self, event: &Event) -> Result<(), StoreError> {
        if !self.events.contains_key(&event.id) {
            return Err(StoreError::not_found(Collection::Events, event.id));
        }
        self.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn remove_event(&self, id: EventId) -> Result<(), StoreError> {
        self.events.remove(&id);
        self.event_parent.remove(&id);
        Ok(())
    }
}
