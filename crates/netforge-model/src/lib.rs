//! netforge Model - document types
//!
//! The four document collections behind the scenario editor:
//! - [`User`]: registered accounts
//! - [`Project`]: packet format + ordered scenario references + build history
//! - [`Scenario`]: ordered event references
//! - [`Event`]: one packet and its [`EventAction`]
//!
//! Documents are linked only by identifier arrays - there are no foreign
//! keys and no joins. Rehydrating the tree (and flattening it into a build
//! payload) lives in `netforge-core`; this crate is pure data.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod action;
pub mod event;
pub mod id;
pub mod packet;
pub mod project;
pub mod scenario;
pub mod user;

// Re-exports for convenience
pub use action::EventAction;
pub use event::Event;
pub use id::{EventId, ProjectId, ScenarioId, UserId};
pub use packet::FieldMap;
pub use project::{BuildRecord, Project};
pub use scenario::Scenario;
pub use user::User;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
