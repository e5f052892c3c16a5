//! Build compilation.
//!
//! Flattens a project into the builder's request shape: the project's field
//! names in canonical order, then one entry per scenario holding its events'
//! canonical value lists and instruction strings. Scenario and event order
//! follow the reference lists on the documents.

use netforge_model::Project;
use netforge_store::ReferenceStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assemble::Assembler;
use crate::canonical::{canonical_order, canonicalize, CanonicalEvent};
use crate::error::CoreError;

/// One scenario flattened for the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildScenario {
    /// Scenario display name.
    pub name: String,
    /// Canonicalized events, in reference order.
    pub events: Vec<CanonicalEvent>,
}

/// The compiled payload handed to the external builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Project display name.
    pub name: String,
    /// Packet field names in canonical order; every event's `packet` list
    /// aligns positionally with this.
    pub format: Vec<String>,
    /// Flattened scenarios, in reference order.
    pub scenarios: Vec<BuildScenario>,
}

/// Compiles projects into [`BuildRequest`]s.
pub struct BuildCompiler<'a, S> {
    assembler: Assembler<'a, S>,
}

impl<'a, S: ReferenceStore> BuildCompiler<'a, S> {
    /// Creates a compiler reading from `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            assembler: Assembler::new(store),
        }
    }

    /// Caps the fan-out width of the underlying assembly.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.assembler = self.assembler.with_width(width);
        self
    }

    /// Resolves and flattens the whole project tree.
    ///
    /// Any dangling reference fails the compilation; a partial build
    /// request is never produced.
    pub async fn compile(&self, project: &Project) -> Result<BuildRequest, CoreError> {
        let format = canonical_order(&project.packet_format);
        let assembled = self.assembler.project(project).await?;
        let scenarios = assembled
            .scenarios
            .into_iter()
            .map(|scenario| BuildScenario {
                name: scenario.name,
                events: scenario.events.iter().map(canonicalize).collect(),
            })
            .collect();
        debug!(
            project = %project.id,
            fields = format.len(),
            "compiled build request"
        );
        Ok(BuildRequest {
            name: project.name.clone(),
            format,
            scenarios,
        })
    }
}
