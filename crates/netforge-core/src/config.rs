//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Builder endpoint used when no configuration is provided.
pub const DEFAULT_BUILDER_URL: &str = "http://127.0.0.1:5000";

/// Per-exchange timeout used when no configuration is provided.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on sibling fetches in flight at one tree level.
pub const DEFAULT_FAN_OUT_WIDTH: usize = 16;

/// Environment variable overriding the builder base URL.
pub const BUILDER_URL_ENV: &str = "NETFORGE_BUILDER_URL";

/// Environment variable overriding the exchange timeout, in seconds.
pub const BUILDER_TIMEOUT_ENV: &str = "NETFORGE_BUILDER_TIMEOUT_SECS";

/// Connection settings for the external builder service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Base URL; the compiled payload is POSTed to `<base_url>/build`.
    pub base_url: String,
    /// Timeout applied to each exchange.
    pub request_timeout: Duration,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BUILDER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BuilderConfig {
    /// Reads the builder endpoint from the environment, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var(BUILDER_URL_ENV).unwrap_or_else(|_| DEFAULT_BUILDER_URL.to_string());
        let request_timeout = env::var(BUILDER_TIMEOUT_ENV)
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self {
            base_url,
            request_timeout,
        }
    }

    /// Sets the builder base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-exchange timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Top-level configuration for the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// External builder endpoint.
    pub builder: BuilderConfig,
    /// Cap on concurrent sibling fetches during assembly fan-out.
    pub fan_out_width: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            builder: BuilderConfig::default(),
            fan_out_width: DEFAULT_FAN_OUT_WIDTH,
        }
    }
}

impl CoreConfig {
    /// Builds a config from the environment; the fan-out width keeps its
    /// default (it is a code-level tuning knob, not a deployment one).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            builder: BuilderConfig::from_env(),
            ..Self::default()
        }
    }

    /// Sets the builder endpoint configuration.
    #[must_use]
    pub fn with_builder(mut self, builder: BuilderConfig) -> Self {
        self.builder = builder;
        self
    }

    /// Sets the fan-out width. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_fan_out_width(mut self, width: usize) -> Self {
        self.fan_out_width = width.max(1);
        self
    }
}
