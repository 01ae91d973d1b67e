//! Core error types for NodeLink

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading local identity material
#[derive(Error, Debug)]
pub enum CoreError {
    /// A local file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identity line is not `<nodeId>:<hardwareId>`
    #[error("Malformed identity line {line:?}: expected <nodeId>:<hardwareId>")]
    MalformedIdentity { line: String },
}

impl CoreError {
    /// Wrap an I/O error with the path that produced it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
