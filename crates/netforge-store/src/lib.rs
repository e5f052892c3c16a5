//! netforge-store: document storage for the scenario editor backend.
//!
//! Everything above this crate speaks [`ReferenceStore`], a flat
//! per-collection contract over whole-document reads and writes:
//!
//! - **store**: the async trait every backend implements
//! - **memory**: a process-local implementation over concurrent maps,
//!   with reverse indexes for the two containment lookups
//! - **error**: the store-level error taxonomy
//!
//! Documents never embed each other. A project lists scenario ids, a
//! scenario lists event ids, and resolving those lists into trees is
//! the job of `netforge-core`, not of the store.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod error;
pub mod memory;
pub mod store;

// Re-export the main types
pub use error::{Collection, StoreError};
pub use memory::MemoryStore;
pub use store::ReferenceStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
