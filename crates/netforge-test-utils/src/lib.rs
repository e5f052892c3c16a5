//! Testing utilities for the netforge workspace
//!
//! Shared fixtures, builder and store doubles, and test setup helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use netforge_core::{BuildError, BuildSubmission, Builder, CoreConfig, ProjectService};
use netforge_model::{
    BuildRecord, Event, EventId, FieldMap, Project, ProjectId, Scenario, ScenarioId, User, UserId,
};
use netforge_store::{MemoryStore, ReferenceStore, StoreError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Builder double that answers every submission with a canned response.
#[derive(Debug, Clone)]
pub struct StaticBuilder {
    response: BuildRecord,
}

impl StaticBuilder {
    pub fn ok(response: BuildRecord) -> Self {
        Self { response }
    }
}

#[async_trait]
impl Builder for StaticBuilder {
    async fn submit(&self, _submission: &BuildSubmission) -> Result<BuildRecord, BuildError> {
        Ok(self.response.clone())
    }
}

/// Builder double that records every submission it receives.
#[derive(Debug)]
pub struct RecordingBuilder {
    response: BuildRecord,
    submissions: Mutex<Vec<BuildSubmission>>,
}

impl RecordingBuilder {
    pub fn ok(response: BuildRecord) -> Self {
        Self {
            response,
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Everything submitted so far, in order.
    pub fn submissions(&self) -> Vec<BuildSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Builder for RecordingBuilder {
    async fn submit(&self, submission: &BuildSubmission) -> Result<BuildRecord, BuildError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(self.response.clone())
    }
}

/// Builder double that always fails with a configured error.
#[derive(Debug, Clone)]
pub struct FailingBuilder {
    error: BuildError,
}

impl FailingBuilder {
    pub fn unavailable() -> Self {
        Self {
            error: BuildError::Unavailable("builder offline".to_string()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            error: BuildError::Rejected {
                status,
                detail: "rejected by test double".to_string(),
            },
        }
    }
}

#[async_trait]
impl Builder for FailingBuilder {
    async fn submit(&self, _submission: &BuildSubmission) -> Result<BuildRecord, BuildError> {
        Err(self.error.clone())
    }
}

/// Store double that can be told to fail the next selected write.
///
/// Everything else passes through to an inner [`MemoryStore`]. Scenario and
/// event inserts are recorded so a test can locate a provisional document
/// whose id was never returned to the caller.
#[derive(Debug, Default)]
pub struct UnreliableStore {
    inner: MemoryStore,
    fail_save_project: AtomicBool,
    fail_save_scenario: AtomicBool,
    inserted_scenarios: Mutex<Vec<ScenarioId>>,
    inserted_events: Mutex<Vec<EventId>>,
}

impl UnreliableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `save_project` call with an unavailable error.
    pub fn fail_next_save_project(&self) {
        self.fail_save_project.store(true, Ordering::SeqCst);
    }

    /// Fail the next `save_scenario` call with an unavailable error.
    pub fn fail_next_save_scenario(&self) {
        self.fail_save_scenario.store(true, Ordering::SeqCst);
    }

    /// Ids handed to `insert_scenario`, in call order.
    pub fn inserted_scenarios(&self) -> Vec<ScenarioId> {
        self.inserted_scenarios.lock().unwrap().clone()
    }

    /// Ids handed to `insert_event`, in call order.
    pub fn inserted_events(&self) -> Vec<EventId> {
        self.inserted_events.lock().unwrap().clone()
    }

    fn offline() -> StoreError {
        StoreError::Unavailable("store offline".to_string())
    }
}

#[async_trait]
impl ReferenceStore for UnreliableStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.insert_user(user).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        self.inner.get_user(id).await
    }

    async fn user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.inner.user_by_username(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.list_users().await
    }

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.inner.insert_project(project).await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, StoreError> {
        self.inner.get_project(id).await
    }

    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        if self.fail_save_project.swap(false, Ordering::SeqCst) {
            return Err(Self::offline());
        }
        self.inner.save_project(project).await
    }

    async fn remove_project(&self, id: ProjectId) -> Result<(), StoreError> {
        self.inner.remove_project(id).await
    }

    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, StoreError> {
        self.inner.list_projects(owner).await
    }

    async fn project_containing(&self, scenario: ScenarioId) -> Result<Project, StoreError> {
        self.inner.project_containing(scenario).await
    }

    async fn insert_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        self.inserted_scenarios.lock().unwrap().push(scenario.id);
        self.inner.insert_scenario(scenario).await
    }

    async fn get_scenario(&self, id: ScenarioId) -> Result<Scenario, StoreError> {
        self.inner.get_scenario(id).await
    }

    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        if self.fail_save_scenario.swap(false, Ordering::SeqCst) {
            return Err(Self::offline());
        }
        self.inner.save_scenario(scenario).await
    }

    async fn remove_scenario(&self, id: ScenarioId) -> Result<(), StoreError> {
        self.inner.remove_scenario(id).await
    }

    async fn scenario_containing(&self, event: EventId) -> Result<Scenario, StoreError> {
        self.inner.scenario_containing(event).await
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        self.inserted_events.lock().unwrap().push(event.id);
        self.inner.insert_event(event).await
    }

    async fn get_event(&self, id: EventId) -> Result<Event, StoreError> {
        self.inner.get_event(id).await
    }

    async fn save_event(&self, event: &Event) -> Result<(), StoreError> {
        self.inner.save_event(event).await
    }

    async fn remove_event(&self, id: EventId) -> Result<(), StoreError> {
        self.inner.remove_event(id).await
    }
}

/// A three-field packet format whose keys exercise the numeric ordering.
pub fn sample_format() -> FieldMap {
    [
        ("1".to_string(), json!("0x0800")),
        ("2".to_string(), json!("0x00")),
        ("3".to_string(), json!("64")),
    ]
    .into_iter()
    .collect()
}

/// A fully linked project tree as seeded by [`seed_project`].
pub struct SeededProject {
    pub owner: User,
    pub project: Project,
    pub scenarios: Vec<Scenario>,
    /// Events per scenario, in reference order.
    pub events: Vec<Vec<Event>>,
}

/// Seeds a store with one user owning one project: two scenarios, the
/// first with two events and the second with one, every event carrying the
/// sample format defaults.
pub async fn seed_project(store: &MemoryStore) -> SeededProject {
    let owner = User::new("netop", "netop@example.com", "hash");
    store.insert_user(&owner).await.unwrap();

    let mut project = Project::new(owner.id);
    project.rename("switching lab");
    project.set_packet_format(sample_format());

    let mut scenarios = Vec::new();
    let mut events = Vec::new();
    for (name, count) in [("handshake", 2), ("teardown", 1)] {
        let mut scenario = Scenario::new(owner.id);
        scenario.rename(name);
        let mut scenario_events = Vec::new();
        for _ in 0..count {
            let event = Event::from_format(owner.id, &project.packet_format);
            store.insert_event(&event).await.unwrap();
            scenario.push_event(event.id);
            scenario_events.push(event);
        }
        store.insert_scenario(&scenario).await.unwrap();
        project.push_scenario(scenario.id);
        scenarios.push(scenario);
        events.push(scenario_events);
    }
    store.insert_project(&project).await.unwrap();

    SeededProject {
        owner,
        project,
        scenarios,
        events,
    }
}

/// A service wired to a fresh in-memory store and a recording builder.
pub struct TestService {
    pub store: Arc<MemoryStore>,
    pub builder: Arc<RecordingBuilder>,
    pub service: ProjectService<MemoryStore, RecordingBuilder>,
}

pub fn setup_test_service() -> TestService {
    let store = Arc::new(MemoryStore::new());
    let builder = Arc::new(RecordingBuilder::ok(json!({"artifact": "demo.tar"})));
    let service = ProjectService::new(
        Arc::clone(&store),
        Arc::clone(&builder),
        CoreConfig::default(),
    );
    TestService {
        store,
        builder,
        service,
    }
}

/// Installs a fmt subscriber for test output; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
