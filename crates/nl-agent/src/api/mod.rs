//! Gateway API access
//!
//! All node calls share one shape: `POST {base}/nodes/{nodeId}{suffix}` with
//! `Authorization: Bearer <token>`, a JSON response body, and no special
//! handling of non-2xx statuses beyond a warning.

mod client;
mod models;

pub use client::GatewayClient;
pub use models::RegisterRequest;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;

/// Parsed JSON reply together with its HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Value,
}

impl GatewayResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Node operations exposed by the gateway
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Register the node with this host's public IP and hardware id
    async fn register_node(
        &self,
        node_id: &str,
        hardware_id: &str,
    ) -> Result<GatewayResponse, AgentError>;

    /// Open a session for the node
    async fn start_session(&self, node_id: &str) -> Result<GatewayResponse, AgentError>;

    /// Close the node's session. Not part of the default lifecycle.
    async fn stop_session(&self, node_id: &str) -> Result<GatewayResponse, AgentError>;

    /// Signal liveness
    async fn ping_node(&self, node_id: &str) -> Result<GatewayResponse, AgentError>;
}

/// Read a response body as JSON regardless of status
pub(crate) async fn read_json(
    url: &str,
    response: reqwest::Response,
) -> Result<GatewayResponse, AgentError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;

    let body = serde_json::from_slice(&bytes).map_err(|source| AgentError::Decode {
        url: url.to_string(),
        status,
        source,
    })?;

    Ok(GatewayResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = GatewayResponse {
            status: 204,
            body: Value::Null,
        };
        let err = GatewayResponse {
            status: 401,
            body: serde_json::json!({"error": "unauthorized"}),
        };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
