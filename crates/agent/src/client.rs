//! HTTP client for the external agent service.

use async_trait::async_trait;
use promptqa_core::{AgentDescriptor, AgentId, AgentPrompt};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Error type for agent service operations.
pub type Result<T> = std::result::Result<T, AgentServiceError>;

/// Errors that can occur talking to the agent service.
#[derive(Debug, thiserror::Error)]
pub enum AgentServiceError {
    /// Transport or decode error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the service
    #[error("Agent service error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },
}

/// A keyword/topic pair submitted for generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSpec {
    /// Target keyword
    pub keyword: String,

    /// Topic to generate content for
    pub topic: String,
}

/// Request body for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Agent to generate with
    pub agent_id: AgentId,

    /// Topics to generate content for
    pub topics: Vec<TopicSpec>,

    /// Number of items to generate
    pub batch_size: usize,
}

/// Response from a generation run.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Whether the run succeeded
    pub success: bool,

    /// Number of items generated
    #[serde(default)]
    pub generated: usize,

    /// Error description on failure
    #[serde(default)]
    pub error: Option<String>,

    /// Per-item results, shape owned by the service
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

/// Agent service abstraction.
///
/// The harness reaches the generation service only through this trait, which
/// keeps the battery testable against an in-memory fake.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Fetch an agent descriptor; `None` when the agent does not exist.
    async fn fetch_agent(&self, id: AgentId) -> Result<Option<AgentDescriptor>>;

    /// Trigger a generation run.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// List up to `limit` most recent prompts for an agent.
    async fn list_prompts(&self, agent_id: AgentId, limit: usize) -> Result<Vec<AgentPrompt>>;
}

/// Agent service reached over HTTP.
#[derive(Clone)]
pub struct HttpAgentService {
    /// HTTP client
    client: Client,

    /// Service base URL, without trailing slash
    base_url: String,
}

impl HttpAgentService {
    /// Create a client for a service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn error_for(response: reqwest::Response) -> AgentServiceError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        AgentServiceError::Api { status, message }
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn fetch_agent(&self, id: AgentId) -> Result<Option<AgentDescriptor>> {
        debug!("Fetching agent {}", id);

        let response = self
            .client
            .get(format!("{}/agent/{}", self.base_url, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        Ok(Some(response.json().await?))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        debug!(
            "Requesting generation of {} items for agent {}",
            request.batch_size, request.agent_id
        );

        let response = self
            .client
            .post(format!("{}/agent/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        Ok(response.json().await?)
    }

    async fn list_prompts(&self, agent_id: AgentId, limit: usize) -> Result<Vec<AgentPrompt>> {
        debug!("Listing up to {} prompts for agent {}", limit, agent_id);

        let response = self
            .client
            .get(format!("{}/agent/prompts", self.base_url))
            .query(&[
                ("agent_id", agent_id.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        #[derive(Deserialize)]
        struct Listing {
            prompts: Vec<AgentPrompt>,
        }

        let listing: Listing = response.json().await?;
        Ok(listing.prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let service = HttpAgentService::new("http://localhost:3000/");
        assert_eq!(service.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let request = GenerateRequest {
            agent_id: AgentId::new(),
            topics: vec![TopicSpec {
                keyword: "seo".to_string(),
                topic: "seo guide".to_string(),
            }],
            batch_size: 1,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["topics"][0]["keyword"], "seo");
        assert_eq!(value["batch_size"], 1);
    }

    #[test]
    fn test_generate_response_tolerates_minimal_body() {
        let response: GenerateResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.generated, 0);
        assert!(response.results.is_none());
    }
}
