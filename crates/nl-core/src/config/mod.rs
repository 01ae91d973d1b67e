//! Configuration management for NodeLink

mod agent;
pub mod serde_utils;

pub use agent::{
    AgentConfig, DEFAULT_BASE_URL, DEFAULT_IP_SERVICE_URL, DEFAULT_PING_INTERVAL,
    MAX_PING_INTERVAL,
};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nodelink")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("agent.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let result: Result<AgentConfig, _> = load_config(&path);
        assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        std::fs::write(
            &path,
            "base_url = \"http://127.0.0.1:9000/api/v1\"\nping_interval = 15\nrequest_timeout = 5\n",
        )
        .unwrap();

        let loaded: AgentConfig = load_config(&path).unwrap();
        assert_eq!(loaded.base_url, "http://127.0.0.1:9000/api/v1");
        assert_eq!(loaded.ping_interval, Duration::from_secs(15));
        assert_eq!(loaded.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(loaded.ip_service_url, DEFAULT_IP_SERVICE_URL);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();

        let result: Result<AgentConfig, _> = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
