//! Endpoint configuration.

use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_ENDPOINT: &str = "IDENTITYQUALITY_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "IDENTITYQUALITY_TIMEOUT_SECS";

/// Where the identity quality service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://identitystore.example/rest/identitystore/api`.
    pub endpoint: String,
    /// Global per-call timeout applied by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Create configuration from environment variables
    ///
    /// Expects:
    /// - `IDENTITYQUALITY_ENDPOINT`: base URL of the service (required)
    /// - `IDENTITYQUALITY_TIMEOUT_SECS`: whole seconds (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var(ENV_ENDPOINT).map_err(|_| ConfigError::Missing(ENV_ENDPOINT))?;
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Blank(ENV_ENDPOINT));
        }

        let timeout = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self { endpoint, timeout })
    }
}
