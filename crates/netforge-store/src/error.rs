//! Error types for reference-store operations.

use std::fmt;

use thiserror::Error;

/// The document collections a store manages.
///
/// Used in error messages so a failed lookup names the collection it
/// missed, not just the raw identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// User account documents.
    Users,
    /// Project documents.
    Projects,
    /// Scenario documents.
    Scenarios,
    /// Event documents.
    Events,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Users => "users",
            Self::Projects => "projects",
            Self::Scenarios => "scenarios",
            Self::Events => "events",
        };
        write!(f, "{name}")
    }
}

/// Errors produced by [`ReferenceStore`](crate::store::ReferenceStore)
/// implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No document with the given identifier exists in the collection.
    #[error("{collection} document not found: {id}")]
    NotFound {
        /// Collection that was searched.
        collection: Collection,
        /// Identifier that missed.
        id: String,
    },

    /// A uniqueness constraint was violated on insert.
    #[error("duplicate {collection} key: {key}")]
    Duplicate {
        /// Collection holding the constraint.
        collection: Collection,
        /// The key that already exists.
        key: String,
    },

    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Shorthand for a missing-document error.
    #[must_use]
    pub fn not_found(collection: Collection, id: impl fmt::Display) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Returns `true` when the error means the document simply does not
    /// exist, as opposed to the store itself failing.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_collection() {
        let err = StoreError::not_found(Collection::Scenarios, "abc-123");
        assert_eq!(err.to_string(), "scenarios document not found: abc-123");
        assert!(err.is_not_found());
    }

    #[test]
    fn duplicate_is_not_a_missing_document() {
        let err = StoreError::Duplicate {
            collection: Collection::Users,
            key: "alice".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "duplicate users key: alice");
    }
}
