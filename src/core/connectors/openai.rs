//! OpenAI-compatible connector
//!
//! Speaks `POST {endpoint}/chat/completions` with bearer authentication.
//! Any OpenAI-compatible server works by pointing `endpoint` at it.

use super::error::ConnectorError;
use super::shared::{
    base_url, build_client, chat_body, map_send_error, parse_chat_completion, probe, read_json,
    validate_chat_payload,
};
use super::{ConnectionTest, Connector, ConnectorFactory};
use crate::core::types::{Agent, AgentRequest, BackendType, ConnectorOutput};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
/// Model used when the agent names none
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat-completions connector
#[derive(Debug, Clone)]
pub struct OpenAiConnector {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiConnector {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConnectorError> {
        let endpoint: String = endpoint.into();
        Ok(Self {
            client: build_client(BackendType::OpenAi, timeout)?,
            endpoint: base_url(&endpoint).to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build from an agent's connection settings
    pub fn from_agent(agent: &Agent) -> Result<Self, ConnectorError> {
        let conn = &agent.connection;
        let api_key = conn.api_key.clone().ok_or_else(|| {
            ConnectorError::configuration(
                BackendType::OpenAi,
                format!("Agent {} has no api_key", agent.id),
            )
        })?;

        Self::new(
            conn.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
            api_key,
            conn.model.as_deref().unwrap_or(DEFAULT_MODEL),
            conn.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Connector for OpenAiConnector {
    fn backend_type(&self) -> BackendType {
        BackendType::OpenAi
    }

    fn validate_request(&self, request: &AgentRequest) -> bool {
        validate_chat_payload(request)
    }

    async fn process(&self, request: &AgentRequest) -> Result<ConnectorOutput, ConnectorError> {
        let backend = self.backend_type();
        let url = format!("{}/chat/completions", self.endpoint);
        let body = chat_body(request, Some(&self.model));

        debug!("OpenAI request {} to {}", request.request_id, url);
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(backend, e))?;

        let json = read_json(backend, response).await?;
        parse_chat_completion(backend, &json, start.elapsed())
    }

    async fn test_connection(&self) -> ConnectionTest {
        let request = self
            .client
            .get(format!("{}/models", self.endpoint))
            .bearer_auth(&self.api_key);
        probe(self.backend_type(), request).await
    }
}

/// Factory for [`OpenAiConnector`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiFactory;

impl ConnectorFactory for OpenAiFactory {
    fn create(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorError> {
        Ok(Arc::new(OpenAiConnector::from_agent(agent)?))
    }
}
