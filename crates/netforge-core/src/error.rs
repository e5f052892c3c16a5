//! The service-level error taxonomy.
//!
//! Store and builder failures are folded into one enum here so every
//! operation returns a single error type. Two conversions matter:
//!
//! - a missing document at the *root* of an operation is [`CoreError::NotFound`]
//! - a missing document reached *through a membership list* is
//!   [`CoreError::DanglingReference`], because the list itself is broken
//!
//! [`CoreError::status`] projects the taxonomy onto the coarse outcomes a
//! client sees. Forbidden collapses into not-found there so probing for
//! another user's documents reveals nothing.

use netforge_model::UserId;
use netforge_store::{Collection, StoreError};
use std::fmt;
use thiserror::Error;

use crate::builder::BuildError;

/// Errors for assembly, compilation, and service operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested document does not exist.
    #[error("{collection} document not found: {id}")]
    NotFound {
        /// Collection that was searched.
        collection: Collection,
        /// Identifier that missed.
        id: String,
    },

    /// The document exists but belongs to a different user.
    #[error("{collection} {id} is not owned by user {user}")]
    Forbidden {
        /// The requesting user.
        user: UserId,
        /// Collection holding the document.
        collection: Collection,
        /// The document that was requested.
        id: String,
    },

    /// A membership list names a document that no longer resolves.
    #[error("dangling reference: {collection} {id} is listed but missing")]
    DanglingReference {
        /// Collection the reference points into.
        collection: Collection,
        /// The identifier that no longer resolves.
        id: String,
    },

    /// An edit payload could not be interpreted.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// The builder exchange failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The store failed for a reason other than a missing document.
    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl CoreError {
    /// Shorthand for a missing root document.
    #[must_use]
    pub fn not_found(collection: Collection, id: impl fmt::Display) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Shorthand for an ownership mismatch.
    #[must_use]
    pub fn forbidden(user: UserId, collection: Collection, id: impl fmt::Display) -> Self {
        Self::Forbidden {
            user,
            collection,
            id: id.to_string(),
        }
    }

    /// Shorthand for a broken membership reference.
    #[must_use]
    pub fn dangling(collection: Collection, id: impl fmt::Display) -> Self {
        Self::DanglingReference {
            collection,
            id: id.to_string(),
        }
    }

    /// Shorthand for a rejected payload.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Converts a store failure on a root fetch: missing stays missing.
    pub(crate) fn root(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => Self::NotFound { collection, id },
            other => Self::Store(other),
        }
    }

    /// Converts a store failure on a child fetch: missing becomes a
    /// dangling reference in the containing list.
    pub(crate) fn child(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => Self::DanglingReference { collection, id },
            other => Self::Store(other),
        }
    }

    /// Projects this error onto the outcome a client is shown.
    #[must_use]
    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::NotFound { .. } | Self::Forbidden { .. } | Self::DanglingReference { .. } => {
                ErrorStatus::NotFound
            }
            Self::Validation(_) => ErrorStatus::InvalidRequest,
            Self::Build(BuildError::Rejected { .. }) => ErrorStatus::BuilderRejected,
            Self::Build(_) => ErrorStatus::BuilderUnavailable,
            Self::Store(_) => ErrorStatus::Internal,
        }
    }

    /// Returns `true` when retrying the same operation could succeed
    /// without any state change.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Build(BuildError::Unavailable(_)) | Self::Store(StoreError::Unavailable(_))
        )
    }
}

/// The coarse outcome classes surfaced at the request boundary.
///
/// Deliberately smaller than [`CoreError`]: ownership mismatches, missing
/// documents, and dangling references all land on [`ErrorStatus::NotFound`],
/// while the two builder failures stay distinct so clients can retry an
/// unavailable builder but report a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// The document is missing, dangling, or not the caller's to see.
    NotFound,
    /// The request payload was malformed.
    InvalidRequest,
    /// The builder exchange could not complete.
    BuilderUnavailable,
    /// The builder refused the compiled project.
    BuilderRejected,
    /// A storage-layer failure outside the caller's control.
    Internal,
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::InvalidRequest => "invalid request",
            Self::BuilderUnavailable => "builder unavailable",
            Self::BuilderRejected => "builder rejected",
            Self::Internal => "internal",
        };
        write!(f, "{name}")
    }
}
