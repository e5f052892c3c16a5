//! The external builder exchange.
//!
//! The builder is a separate service that turns a compiled project payload
//! into a deployable artifact. This module owns the outbound contract: the
//! submission envelope, the error split between an unreachable builder and
//! a rejecting one, and an HTTP client implementation.

use async_trait::async_trait;
use netforge_model::{BuildRecord, ProjectId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::compile::BuildRequest;
use crate::config::BuilderConfig;

/// Failures of the builder exchange.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// The builder could not be reached or the exchange did not complete.
    #[error("builder unavailable: {0}")]
    Unavailable(String),

    /// The builder answered with a non-success status.
    #[error("builder rejected the project: status {status}: {detail}")]
    Rejected {
        /// HTTP-style status code the builder returned.
        status: u16,
        /// Response body, as far as it could be read.
        detail: String,
    },

    /// The builder reported success but the response body was unreadable.
    #[error("unreadable builder response: {0}")]
    InvalidResponse(String),
}

impl BuildError {
    /// Returns `true` when the same submission could succeed on retry.
    #[inline]
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// The full submission envelope: the compiled payload plus the identifiers
/// the builder echoes into its artifacts. Field names follow the builder's
/// wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSubmission {
    /// Requesting user.
    pub user_id: UserId,
    /// Project being built.
    pub project_id: ProjectId,
    /// Project display name.
    pub project_name: String,
    /// The compiled payload.
    pub project_data: BuildRequest,
}

/// Outbound side of the build exchange.
#[async_trait]
pub trait Builder: Send + Sync {
    /// Sends one submission and returns the builder's opaque response.
    async fn submit(&self, submission: &BuildSubmission) -> Result<BuildRecord, BuildError>;
}

/// HTTP client for a real builder service.
///
/// Submissions are POSTed as JSON to `<base_url>/build`; whatever JSON the
/// builder answers with is returned untouched.
#[derive(Debug, Clone)]
pub struct HttpBuilder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBuilder {
    /// Builds a client from configuration. Fails only if the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &BuilderConfig) -> Result<Self, BuildError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| BuildError::Unavailable(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Builder for HttpBuilder {
    async fn submit(&self, submission: &BuildSubmission) -> Result<BuildRecord, BuildError> {
        let url = format!("{}/build", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|err| {
                error!(url = %url, error = %err, "builder exchange failed");
                BuildError::Unavailable(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(url = %url, status = status.as_u16(), "builder rejected submission");
            return Err(BuildError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<BuildRecord>()
            .await
            .map_err(|err| BuildError::InvalidResponse(err.to_string()))
    }
}
