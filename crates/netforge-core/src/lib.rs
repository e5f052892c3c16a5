//! netforge-core: the scenario editor backend.
//!
//! Documents live in a [`netforge_store::ReferenceStore`] and reference
//! each other only through id lists; this crate turns those lists into
//! trees and those trees into builds:
//!
//! - **assemble**: bounded fan-out resolution of id lists into
//!   materialized, order-preserving trees
//! - **canonical**: packet field ordering and action encoding
//! - **compile**: flattening a project tree into the builder's request
//! - **builder**: the external builder exchange (trait plus HTTP client)
//! - **service**: the operation surface, with per-document ownership
//!   checks and ordered multi-document writes
//! - **config**, **error**: runtime knobs and the error taxonomy

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod assemble;
pub mod builder;
pub mod canonical;
pub mod compile;
pub mod config;
pub mod error;
pub mod service;

// Re-export the main types
pub use assemble::{AssembledProject, AssembledScenario, Assembler};
pub use builder::{BuildError, BuildSubmission, Builder, HttpBuilder};
pub use canonical::{canonical_order, canonicalize, encode_action, CanonicalEvent};
pub use compile::{BuildCompiler, BuildRequest, BuildScenario};
pub use config::{BuilderConfig, CoreConfig};
pub use error::{CoreError, ErrorStatus};
pub use service::{ProjectService, ScenarioView};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
