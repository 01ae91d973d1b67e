//! Public IP discovery

use reqwest::Client;

use crate::api::read_json;
use crate::error::AgentError;

/// Asks an external echo service for this host's public IP
#[derive(Debug, Clone)]
pub struct PublicIpResolver {
    http: Client,
    url: String,
}

impl PublicIpResolver {
    /// Create a resolver querying `url` with the given HTTP client
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Discovery endpoint
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the public IP. The request is unauthenticated.
    pub async fn resolve(&self) -> Result<String, AgentError> {
        tracing::debug!("GET {}", self.url);

        let response = self.http.get(&self.url).send().await?;
        let response = read_json(&self.url, response).await?;
        tracing::info!("IP fetch response: {}", response.body);

        match response.body.get("ip").and_then(|ip| ip.as_str()) {
            Some(ip) => Ok(ip.to_string()),
            None => Err(AgentError::MissingIp {
                body: response.body,
            }),
        }
    }
}
