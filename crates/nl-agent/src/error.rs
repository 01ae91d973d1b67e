//! Agent error types

use nl_core::CoreError;
use thiserror::Error;

/// Errors raised by gateway and IP discovery calls
#[derive(Error, Debug)]
pub enum AgentError {
    /// Identity or token could not be loaded
    #[error(transparent)]
    Core(#[from] CoreError),

    /// DNS, connection, TLS or timeout failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("Failed to decode response from {url} (status {status}): {source}")]
    Decode {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The IP discovery response had no `ip` string
    #[error("IP discovery response has no \"ip\" field: {body}")]
    MissingIp { body: serde_json::Value },

    /// The token cannot be sent as an HTTP header value
    #[error("Auth token contains characters not allowed in a header")]
    InvalidToken,
}
