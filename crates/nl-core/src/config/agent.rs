//! Agent configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::{duration_secs, option_duration_secs};
use crate::error::ConfigError;

/// Base URL of the coordination gateway API
pub const DEFAULT_BASE_URL: &str = "https://gateway-run.bls.dev/api/v1";

/// Endpoint that echoes the caller's public IP as `{"ip": "..."}`
pub const DEFAULT_IP_SERVICE_URL: &str = "https://tight-block-2413.txlabs.workers.dev";

/// Interval between recurring liveness pings
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(60);

/// Longest accepted ping interval (one day)
pub const MAX_PING_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the node agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Gateway API base URL, without a trailing slash
    pub base_url: String,

    /// Public IP discovery endpoint
    pub ip_service_url: String,

    /// File holding `<nodeId>:<hardwareId>`
    pub id_file: PathBuf,

    /// File holding the bearer token, re-read before every API call
    pub token_file: PathBuf,

    /// Recurring ping interval
    #[serde(with = "duration_secs")]
    pub ping_interval: Duration,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(with = "option_duration_secs")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ip_service_url: DEFAULT_IP_SERVICE_URL.to_string(),
            id_file: PathBuf::from("id.txt"),
            token_file: PathBuf::from("user.txt"),
            ping_interval: DEFAULT_PING_INTERVAL,
            request_timeout: None,
            user_agent: format!("nodelink-agent/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AgentConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url cannot be empty".to_string()));
        }
        if self.ip_service_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ip_service_url cannot be empty".to_string(),
            ));
        }
        if self.ping_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "ping_interval must be > 0".to_string(),
            ));
        }
        if self.ping_interval > MAX_PING_INTERVAL {
            return Err(ConfigError::Invalid(format!(
                "ping_interval must be at most {}s",
                MAX_PING_INTERVAL.as_secs()
            )));
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid(
                "request_timeout must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
