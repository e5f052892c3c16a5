//! Graph assembly.
//!
//! Documents reference their children through id lists only, so every read
//! of a tree has to materialize it: fetch the scenario ids a project names,
//! fetch the event ids each scenario names, and splice the results back
//! together. All siblings at one tree level are fetched concurrently with a
//! bounded fan-out, and results are reassembled by original list index, not
//! by completion order. A missing child fails the whole assembly as a
//! dangling reference; a missing root is a plain not-found.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use netforge_model::{
    BuildRecord, Event, EventId, FieldMap, Project, ProjectId, Scenario, ScenarioId, UserId,
};
use netforge_store::ReferenceStore;
use serde::Serialize;
use std::future::Future;
use tracing::debug;

use crate::config::DEFAULT_FAN_OUT_WIDTH;
use crate::error::CoreError;

/// A scenario with `event_ids` replaced by the events themselves.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledScenario {
    /// Scenario document id.
    pub id: ScenarioId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Materialized events, in `event_ids` order.
    pub events: Vec<Event>,
    /// Creation time of the underlying document.
    pub created_at: DateTime<Utc>,
    /// Last mutation time of the underlying document.
    pub updated_at: DateTime<Utc>,
}

/// A project with `scenario_ids` replaced by assembled scenarios.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledProject {
    /// Project document id.
    pub id: ProjectId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Shared packet field set.
    pub packet_format: FieldMap,
    /// Materialized scenarios, in `scenario_ids` order.
    pub scenarios: Vec<AssembledScenario>,
    /// Build history, most recent first.
    pub builds: Vec<BuildRecord>,
    /// Creation time of the underlying document.
    pub created_at: DateTime<Utc>,
    /// Last mutation time of the underlying document.
    pub updated_at: DateTime<Utc>,
}

/// Resolves id lists into materialized entity lists.
///
/// This is the one fan-out/fan-in primitive in the system; the scenario and
/// project assemblers and the build compiler all go through it.
pub struct Assembler<'a, S> {
    store: &'a S,
    width: usize,
}

impl<'a, S: ReferenceStore> Assembler<'a, S> {
    /// Creates an assembler with the default fan-out width.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            width: DEFAULT_FAN_OUT_WIDTH,
        }
    }

    /// Caps the number of sibling fetches in flight at one tree level.
    /// Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Resolves `ids` through `fetch`, concurrently, returning results in
    /// input order regardless of completion order. Fails on the first
    /// error; in-flight sibling fetches are dropped, not awaited.
    async fn resolve_ordered<I, T, F, Fut>(&self, ids: &[I], fetch: F) -> Result<Vec<T>, CoreError>
    where
        I: Copy,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        stream::iter(ids.iter().copied().map(fetch))
            .buffered(self.width)
            .try_collect()
            .await
    }

    /// Fetches a single event document, unchanged. No side effects.
    pub async fn event(&self, id: EventId) -> Result<Event, CoreError> {
        self.store.get_event(id).await.map_err(CoreError::root)
    }

    /// Fetches a scenario and materializes its events.
    pub async fn scenario(&self, id: ScenarioId) -> Result<AssembledScenario, CoreError> {
        let scenario = self.store.get_scenario(id).await.map_err(CoreError::root)?;
        self.scenario_tree(scenario).await
    }

    /// Materializes the events of an already fetched scenario.
    pub async fn scenario_tree(&self, scenario: Scenario) -> Result<AssembledScenario, CoreError> {
        debug!(
            scenario = %scenario.id,
            events = scenario.event_ids.len(),
            "assembling scenario"
        );
        let store = self.store;
        let events = self
            .resolve_ordered(&scenario.event_ids, |id| async move {
                store.get_event(id).await.map_err(CoreError::child)
            })
            .await?;
        Ok(AssembledScenario {
            id: scenario.id,
            owner_id: scenario.owner_id,
            name: scenario.name,
            events,
            created_at: scenario.created_at,
            updated_at: scenario.updated_at,
        })
    }

    /// Materializes a full project tree: scenarios concurrently, events
    /// concurrently within each scenario.
    pub async fn project(&self, project: &Project) -> Result<AssembledProject, CoreError> {
        debug!(
            project = %project.id,
            scenarios = project.scenario_ids.len(),
            "assembling project"
        );
        let scenarios = self
            .resolve_ordered(&project.scenario_ids, |id| async move {
                let scenario = self.store.get_scenario(id).await.map_err(CoreError::child)?;
                self.scenario_tree(scenario).await
            })
            .await?;
        Ok(AssembledProject {
            id: project.id,
            owner_id: project.owner_id,
            name: project.name.clone(),
            packet_format: project.packet_format.clone(),
            scenarios,
            builds: project.builds.clone(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        })
    }

    /// Assembles each project independently. One project failing does not
    /// affect its siblings; results keep the input order.
    pub async fn batch(&self, projects: &[Project]) -> Vec<Result<AssembledProject, CoreError>> {
        join_all(projects.iter().map(|project| self.project(project))).await
    }
}
