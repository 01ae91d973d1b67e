//! HTTP client for the gateway node API

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;

use nl_core::config::AgentConfig;
use nl_core::TokenProvider;

use super::models::RegisterRequest;
use super::{read_json, GatewayResponse, NodeApi};
use crate::error::AgentError;
use crate::ip::PublicIpResolver;

/// Authenticated client for `{base}/nodes/...`
pub struct GatewayClient<T> {
    http: Client,
    base_url: String,
    tokens: T,
    ip_resolver: PublicIpResolver,
}

impl<T: TokenProvider> GatewayClient<T> {
    /// Build a client from agent configuration.
    ///
    /// The same connection pool serves gateway calls and IP discovery.
    pub fn new(config: &AgentConfig, tokens: T) -> Result<Self, AgentError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let ip_resolver = PublicIpResolver::new(http.clone(), config.ip_service_url.clone());
        Ok(Self {
            http,
            base_url: config.api_base().to_string(),
            tokens,
            ip_resolver,
        })
    }

    /// Gateway base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn node_url(&self, node_id: &str, suffix: &str) -> String {
        format!("{}/nodes/{}{}", self.base_url, node_id, suffix)
    }

    /// Fetch the current token and turn it into an Authorization value
    async fn auth_header(&self) -> Result<HeaderValue, AgentError> {
        let token = self.tokens.current_token().await?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AgentError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }

    async fn post(
        &self,
        node_id: &str,
        suffix: &str,
        label: &str,
        auth: HeaderValue,
        body: Option<&RegisterRequest>,
    ) -> Result<GatewayResponse, AgentError> {
        let url = self.node_url(node_id, suffix);
        tracing::debug!("POST {}", url);

        let mut request = self.http.post(&url).header(AUTHORIZATION, auth);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = read_json(&url, response).await?;

        if !response.is_success() {
            tracing::warn!(
                "{} returned status {}: {}",
                label,
                response.status,
                response.body
            );
        }
        tracing::info!("{} response: {}", label, response.body);

        Ok(response)
    }
}

#[async_trait]
impl<T: TokenProvider> NodeApi for GatewayClient<T> {
    async fn register_node(
        &self,
        node_id: &str,
        hardware_id: &str,
    ) -> Result<GatewayResponse, AgentError> {
        // Token first, so a missing token file fails before any network call
        let auth = self.auth_header().await?;
        let ip_address = self.ip_resolver.resolve().await?;
        tracing::info!(
            "Registering node with IP: {}, Hardware ID: {}",
            ip_address,
            hardware_id
        );

        let body = RegisterRequest {
            ip_address,
            hardware_id: hardware_id.to_string(),
        };
        self.post(node_id, "", "Registration", auth, Some(&body))
            .await
    }

    async fn start_session(&self, node_id: &str) -> Result<GatewayResponse, AgentError> {
        tracing::info!("Starting session for node {}", node_id);
        let auth = self.auth_header().await?;
        self.post(node_id, "/start-session", "Start session", auth, None).await
    }

    async fn stop_session(&self, node_id: &str) -> Result<GatewayResponse, AgentError> {
        tracing::info!("Stopping session for node {}", node_id);
        let auth = self.auth_header().await?;
        self.post(node_id, "/stop-session", "Stop session", auth, None).await
    }

    async fn ping_node(&self, node_id: &str) -> Result<GatewayResponse, AgentError> {
        tracing::info!("Pinging node {}", node_id);
        let auth = self.auth_header().await?;
        self.post(node_id, "/ping", "Ping", auth, None).await
    }
}

impl<T> std::fmt::Debug for GatewayClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("ip_service_url", &self.ip_resolver.url())
            .finish()
    }
}
