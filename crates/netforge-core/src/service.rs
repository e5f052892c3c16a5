//! Service operations.
//!
//! One method per operation the editor exposes. Every operation authorizes
//! by fetching the target document and comparing its `owner_id` with the
//! requesting user; a mismatch is `Forbidden`, which the boundary status
//! folds into not-found so existence is never leaked. Multi-document writes
//! are ordered so a failure midway never leaves a parent list naming a
//! document that was not written: children are written before parents
//! reference them, parents stop referencing before children are deleted,
//! and a failed parent update compensates by removing the just-written
//! child.

use std::sync::Arc;

use netforge_model::{
    Event, EventAction, EventId, FieldMap, Project, ProjectId, Scenario, ScenarioId, User, UserId,
};
use netforge_store::{Collection, ReferenceStore, StoreError};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::assemble::{AssembledProject, Assembler};
use crate::builder::{BuildSubmission, Builder};
use crate::compile::BuildCompiler;
use crate::config::CoreConfig;
use crate::error::CoreError;

/// Scenario-scoped read model.
///
/// Carries the owning project's `packet_format` next to the materialized
/// events so a client can render the packet grid from one response.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioView {
    /// The scenario.
    pub scenario_id: ScenarioId,
    /// The owning project's field set, canonical source for column order.
    pub packet_format: FieldMap,
    /// Materialized events, in reference order.
    pub events: Vec<Event>,
}

/// The editor backend: user accounts, the project/scenario/event tree, and
/// build submission.
pub struct ProjectService<S, B> {
    store: Arc<S>,
    builder: Arc<B>,
    config: CoreConfig,
}

impl<S, B> ProjectService<S, B>
where
    S: ReferenceStore,
    B: Builder,
{
    /// Creates a service over a store and a builder client.
    pub fn new(store: Arc<S>, builder: Arc<B>, config: CoreConfig) -> Self {
        Self {
            store,
            builder,
            config,
        }
    }

    fn assembler(&self) -> Assembler<'_, S> {
        Assembler::new(self.store.as_ref()).with_width(self.config.fan_out_width)
    }

    fn compiler(&self) -> BuildCompiler<'_, S> {
        BuildCompiler::new(self.store.as_ref()).with_width(self.config.fan_out_width)
    }

    async fn owned_project(&self, user: UserId, id: ProjectId) -> Result<Project, CoreError> {
        let project = self.store.get_project(id).await.map_err(CoreError::root)?;
        if !project.is_owned_by(user) {
            return Err(CoreError::forbidden(user, Collection::Projects, id));
        }
        Ok(project)
    }

    async fn owned_scenario(&self, user: UserId, id: ScenarioId) -> Result<Scenario, CoreError> {
        let scenario = self.store.get_scenario(id).await.map_err(CoreError::root)?;
        if !scenario.is_owned_by(user) {
            return Err(CoreError::forbidden(user, Collection::Scenarios, id));
        }
        Ok(scenario)
    }

    async fn owned_event(&self, user: UserId, id: EventId) -> Result<Event, CoreError> {
        let event = self.store.get_event(id).await.map_err(CoreError::root)?;
        if !event.is_owned_by(user) {
            return Err(CoreError::forbidden(user, Collection::Events, id));
        }
        Ok(event)
    }

    /// Builds the scenario read model for an already authorized scenario.
    async fn scenario_view(&self, scenario: Scenario) -> Result<ScenarioView, CoreError> {
        let project = self
            .store
            .project_containing(scenario.id)
            .await
            .map_err(CoreError::root)?;
        let assembled = self.assembler().scenario_tree(scenario).await?;
        Ok(ScenarioView {
            scenario_id: assembled.id,
            packet_format: project.packet_format,
            events: assembled.events,
        })
    }

    // Users

    /// Registers a user. The password hash is stored as handed in; hashing
    /// happens upstream.
    pub async fn register_user(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<User, CoreError> {
        let user = User::new(username, email, password_hash);
        match self.store.insert_user(&user).await {
            Ok(()) => {
                info!(user = %user.id, "registered user");
                Ok(user)
            }
            Err(StoreError::Duplicate { key, .. }) => Err(CoreError::validation(format!(
                "username already registered: {key}"
            ))),
            Err(other) => Err(CoreError::Store(other)),
        }
    }

    /// Lists every registered user.
    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.store.list_users().await.map_err(CoreError::root)
    }

    // Projects

    /// Creates an empty project and returns it assembled.
    pub async fn create_project(&self, owner: UserId) -> Result<AssembledProject, CoreError> {
        let project = Project::new(owner);
        self.store
            .insert_project(&project)
            .await
            .map_err(CoreError::Store)?;
        info!(project = %project.id, user = %owner, "created project");
        self.assembler().project(&project).await
    }

    /// Assembles every project the user owns.
    ///
    /// Results are per-project: one project failing to assemble does not
    /// hide its siblings, so the dashboard can render what it can.
    pub async fn list_projects(
        &self,
        owner: UserId,
    ) -> Result<Vec<Result<AssembledProject, CoreError>>, CoreError> {
        let projects = self
            .store
            .list_projects(owner)
            .await
            .map_err(CoreError::root)?;
        Ok(self.assembler().batch(&projects).await)
    }

    /// Fetches one project, fully assembled.
    pub async fn get_project(
        &self,
        user: UserId,
        id: ProjectId,
    ) -> Result<AssembledProject, CoreError> {
        let project = self.owned_project(user, id).await?;
        self.assembler().project(&project).await
    }

    /// Renames a project.
    pub async fn rename_project(
        &self,
        user: UserId,
        id: ProjectId,
        name: impl Into<String>,
    ) -> Result<Project, CoreError> {
        let mut project = self.owned_project(user, id).await?;
        project.rename(name);
        self.store
            .save_project(&project)
            .await
            .map_err(CoreError::root)?;
        info!(project = %id, "renamed project");
        Ok(project)
    }

    /// Replaces a project's packet format.
    ///
    /// Existing events keep their packets; the new format only seeds events
    /// created afterwards and reorders build output columns.
    pub async fn update_packet_format(
        &self,
        user: UserId,
        id: ProjectId,
        format: FieldMap,
    ) -> Result<Project, CoreError> {
        let mut project = self.owned_project(user, id).await?;
        project.set_packet_format(format);
        self.store
            .save_project(&project)
            .await
            .map_err(CoreError::root)?;
        info!(project = %id, fields = project.packet_format.len(), "updated packet format");
        Ok(project)
    }

    /// Deletes a project and everything under it.
    ///
    /// The project document goes first so no surviving list ever names a
    /// deleted child; scenarios and events are then removed best-effort. A
    /// failure midway can orphan unreferenced documents but never dangle a
    /// reference.
    pub async fn delete_project(&self, user: UserId, id: ProjectId) -> Result<(), CoreError> {
        let project = self.owned_project(user, id).await?;

        // Collect reachable children before the project record goes away.
        let mut scenarios = Vec::new();
        for sid in &project.scenario_ids {
            match self.store.get_scenario(*sid).await {
                Ok(scenario) => scenarios.push(scenario),
                Err(err) if err.is_not_found() => {
                    warn!(scenario = %sid, "skipping dangling scenario reference during delete");
                }
                Err(other) => return Err(CoreError::Store(other)),
            }
        }

        self.store
            .remove_project(id)
            .await
            .map_err(CoreError::Store)?;
        for scenario in &scenarios {
            for eid in &scenario.event_ids {
                self.store
                    .remove_event(*eid)
                    .await
                    .map_err(CoreError::Store)?;
            }
            self.store
                .remove_scenario(scenario.id)
                .await
                .map_err(CoreError::Store)?;
        }
        info!(project = %id, scenarios = scenarios.len(), "deleted project");
        Ok(())
    }

    // Scenarios

    /// Creates an empty scenario under a project and returns its view.
    pub async fn create_scenario(
        &self,
        user: UserId,
        project_id: ProjectId,
    ) -> Result<ScenarioView, CoreError> {
        let mut project = self.owned_project(user, project_id).await?;
        let scenario = Scenario::new(project.owner_id);

        self.store
            .insert_scenario(&scenario)
            .await
            .map_err(CoreError::Store)?;
        project.push_scenario(scenario.id);
        if let Err(err) = self.store.save_project(&project).await {
            warn!(
                scenario = %scenario.id,
                project = %project_id,
                "project update failed, removing just-created scenario"
            );
            if let Err(cleanup) = self.store.remove_scenario(scenario.id).await {
                warn!(scenario = %scenario.id, error = %cleanup, "compensating removal failed");
            }
            return Err(CoreError::root(err));
        }

        info!(scenario = %scenario.id, project = %project_id, "created scenario");
        Ok(ScenarioView {
            scenario_id: scenario.id,
            packet_format: project.packet_format,
            events: Vec::new(),
        })
    }

    /// Fetches a scenario view: materialized events plus the owning
    /// project's packet format.
    pub async fn get_scenario(
        &self,
        user: UserId,
        id: ScenarioId,
    ) -> Result<ScenarioView, CoreError> {
        let scenario = self.owned_scenario(user, id).await?;
        self.scenario_view(scenario).await
    }

    /// Renames a scenario.
    pub async fn rename_scenario(
        &self,
        user: UserId,
        id: ScenarioId,
        name: impl Into<String>,
    ) -> Result<Scenario, CoreError> {
        let mut scenario = self.owned_scenario(user, id).await?;
        scenario.rename(name);
        self.store
            .save_scenario(&scenario)
            .await
            .map_err(CoreError::root)?;
        info!(scenario = %id, "renamed scenario");
        Ok(scenario)
    }

    /// Deletes a scenario, its events, and the project's reference to it.
    ///
    /// The project stops referencing the scenario before any document is
    /// deleted. A scenario no project references is still deletable.
    pub async fn delete_scenario(&self, user: UserId, id: ScenarioId) -> Result<(), CoreError> {
        let scenario = self.owned_scenario(user, id).await?;

        match self.store.project_containing(id).await {
            Ok(mut project) => {
                if project.remove_scenario(id) {
                    self.store
                        .save_project(&project)
                        .await
                        .map_err(CoreError::root)?;
                }
            }
            Err(err) if err.is_not_found() => {
                warn!(scenario = %id, "no project references this scenario");
            }
            Err(other) => return Err(CoreError::Store(other)),
        }

        for eid in &scenario.event_ids {
            self.store
                .remove_event(*eid)
                .await
                .map_err(CoreError::Store)?;
        }
        self.store
            .remove_scenario(id)
            .await
            .map_err(CoreError::Store)?;
        info!(scenario = %id, events = scenario.event_ids.len(), "deleted scenario");
        Ok(())
    }

    // Events

    /// Creates an event under a scenario, seeded from the owning project's
    /// packet format with the default action, and returns the refreshed
    /// scenario view.
    pub async fn create_event(
        &self,
        user: UserId,
        scenario_id: ScenarioId,
    ) -> Result<ScenarioView, CoreError> {
        let mut scenario = self.owned_scenario(user, scenario_id).await?;
        let project = self
            .store
            .project_containing(scenario_id)
            .await
            .map_err(CoreError::root)?;

        let event = Event::from_format(scenario.owner_id, &project.packet_format);
        self.store
            .insert_event(&event)
            .await
            .map_err(CoreError::Store)?;
        scenario.push_event(event.id);
        if let Err(err) = self.store.save_scenario(&scenario).await {
            warn!(
                event = %event.id,
                scenario = %scenario_id,
                "scenario update failed, removing just-created event"
            );
            if let Err(cleanup) = self.store.remove_event(event.id).await {
                warn!(event = %event.id, error = %cleanup, "compensating removal failed");
            }
            return Err(CoreError::root(err));
        }

        info!(event = %event.id, scenario = %scenario_id, "created event");
        self.scenario_view(scenario).await
    }

    /// Fetches a single event document.
    pub async fn get_event(&self, user: UserId, id: EventId) -> Result<Event, CoreError> {
        self.owned_event(user, id).await
    }

    /// Replaces an event's packet and action from raw JSON payloads and
    /// returns the refreshed view of the containing scenario.
    ///
    /// The packet must be an object of field values and the action one of
    /// the known shapes; anything else is a validation error, checked
    /// before any document is touched.
    pub async fn edit_event(
        &self,
        user: UserId,
        id: EventId,
        packet: Value,
        action: Value,
    ) -> Result<ScenarioView, CoreError> {
        let packet: FieldMap = serde_json::from_value(packet).map_err(|err| {
            CoreError::validation(format!("packet must be an object of field values: {err}"))
        })?;
        let action: EventAction = serde_json::from_value(action)
            .map_err(|err| CoreError::validation(format!("unrecognized action: {err}")))?;

        let mut event = self.owned_event(user, id).await?;
        event.update(packet, action);
        self.store
            .save_event(&event)
            .await
            .map_err(CoreError::root)?;
        info!(event = %id, "edited event");

        let scenario = self
            .store
            .scenario_containing(id)
            .await
            .map_err(CoreError::root)?;
        self.scenario_view(scenario).await
    }

    /// Deletes an event and the scenario's reference to it, returning the
    /// refreshed view of the containing scenario.
    pub async fn delete_event(&self, user: UserId, id: EventId) -> Result<ScenarioView, CoreError> {
        self.owned_event(user, id).await?;
        let mut scenario = self
            .store
            .scenario_containing(id)
            .await
            .map_err(CoreError::root)?;

        if scenario.remove_event(id) {
            self.store
                .save_scenario(&scenario)
                .await
                .map_err(CoreError::root)?;
        }
        self.store
            .remove_event(id)
            .await
            .map_err(CoreError::Store)?;
        info!(event = %id, scenario = %scenario.id, "deleted event");
        self.scenario_view(scenario).await
    }

    // Builds

    /// Compiles the project, exchanges it with the external builder, and
    /// prepends the response to the project's build history.
    ///
    /// Nothing is persisted unless the exchange succeeds, so a failed build
    /// never mutates the project.
    pub async fn submit_build(&self, user: UserId, id: ProjectId) -> Result<Project, CoreError> {
        let mut project = self.owned_project(user, id).await?;
        let request = self.compiler().compile(&project).await?;

        let submission = BuildSubmission {
            user_id: user,
            project_id: project.id,
            project_name: project.name.clone(),
            project_data: request,
        };
        let record = self.builder.submit(&submission).await?;

        project.record_build(record);
        self.store
            .save_project(&project)
            .await
            .map_err(CoreError::root)?;
        info!(project = %id, builds = project.builds.len(), "recorded build");
        Ok(project)
    }
}
