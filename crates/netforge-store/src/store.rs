//! The reference-store contract.
//!
//! Documents are stored whole and linked only by identifier arrays, so
//! the contract is a flat set of per-collection operations plus the two
//! reverse lookups (which project lists a scenario, which scenario lists
//! an event) that deletion and editing need. Implementations are free to
//! answer those from an index or a scan; callers only see the result.

use async_trait::async_trait;
use netforge_model::{Event, EventId, Project, ProjectId, Scenario, ScenarioId, User, UserId};

use crate::error::StoreError;

/// Document storage for users, projects, scenarios, and events.
///
/// All reads return owned copies of the stored document. Writes replace
/// documents whole; there is no partial update. `insert_*` rejects an
/// existing key with [`StoreError::Duplicate`], `save_*` requires the
/// document to already exist, and `remove_*` is a no-op when the
/// document is already gone.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    // Users

    /// Stores a new user. Usernames are unique across the collection.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Fetches a user by id.
    async fn get_user(&self, id: UserId) -> Result<User, StoreError>;

    /// Fetches a user by unique username.
    async fn user_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Lists every registered user, ordered by username.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    // Projects

    /// Stores a new project.
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Fetches a project by id.
    async fn get_project(&self, id: ProjectId) -> Result<Project, StoreError>;

    /// Replaces an existing project document.
    async fn save_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Deletes a project document, if present.
    async fn remove_project(&self, id: ProjectId) -> Result<(), StoreError>;

    /// Lists the projects owned by a user, ordered by creation time.
    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, StoreError>;

    /// Finds the project whose `scenario_ids` lists the given scenario.
    async fn project_containing(&self, scenario: ScenarioId) -> Result<Project, StoreError>;

    // Scenarios

    /// Stores a new scenario.
    async fn insert_scenario(&self, scenario: &Scenario) -> Result<(), StoreError>;

    /// Fetches a scenario by id.
    async fn get_scenario(&self, id: ScenarioId) -> Result<Scenario, StoreError>;

    /// Replaces an existing scenario document.
    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StoreError>;

    /// Deletes a scenario document, if present.
    async fn remove_scenario(&self, id: ScenarioId) -> Result<(), StoreError>;

    /// Finds the scenario whose `event_ids` lists the given event.
    async fn scenario_containing(&self, event: EventId) -> Result<Scenario, StoreError>;

    // Events

    /// Stores a new event.
    async fn insert_event(&self, event: &Event) -> Result<(), StoreError>;

    /// Fetches an event by id.
    async fn get_event(&self, id: EventId) -> Result<Event, StoreError>;

    /// Replaces an existing event document.
    async fn save_event(&self, event: &Event) -> Result<(), StoreError>;

    /// Deletes an event document, if present.
    async fn remove_event(&self, id: EventId) -> Result<(), StoreError>;
}
