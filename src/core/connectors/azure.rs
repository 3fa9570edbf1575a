//! Azure OpenAI connector

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

/// API version used when the agent names none
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI deployment connector
///
/// The deployment, not a model name, selects the model.
#[derive(Debug, Clone)]
pub struct AzureConnector {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl AzureConnector {
    /// Build from an agent's connection settings
    ///
    /// `endpoint`, `api_key` and `deployment` are required. `model` is
    /// accepted as the deployment name when `deployment` is unset.
    pub fn from_agent(agent: &Agent) -> Result<Self, ConnectorError> {
        let backend = BackendType::Azure;
        let conn = &agent.connection;
        let missing = |field: &str| {
            ConnectorError::configuration(backend, format!("Agent {} has no {}", agent.id, field))
        };

        let endpoint = conn.endpoint.as_deref().ok_or_else(|| missing("endpoint"))?;
        let api_key = conn.api_key.clone().ok_or_else(|| missing("api_key"))?;
        let deployment = conn
            .deployment
            .clone()
            .or_else(|| conn.model.clone())
            .ok_or_else(|| missing("deployment"))?;

        Ok(Self {
            client: build_client(backend, conn.timeout_secs.map(Duration::from_secs))?,
            endpoint: base_url(endpoint).to_string(),
            api_key,
            deployment,
            api_version: conn
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl Connector for AzureConnector {
    fn backend_type(&self) -> BackendType {
        BackendType::Azure
    }

    fn validate_request(&self, request: &AgentRequest) -> bool {
        validate_chat_payload(request)
    }

    async fn process(&self, request: &AgentRequest) -> Result<ConnectorOutput, ConnectorError> {
        let backend = self.backend_type();
        let url = self.completions_url();

        debug!(
            "Azure request {} to deployment {}",
            request.request_id, self.deployment
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&chat_body(request, None))
            .send()
            .await
            .map_err(|e| map_send_error(backend, e))?;

        let json = read_json(backend, response).await?;
        parse_chat_completion(backend, &json, start.elapsed())
    }

    async fn test_connection(&self) -> ConnectionTest {
        let request = self
            .client
            .get(format!(
                "{}/openai/deployments?api-version={}",
                self.endpoint, self.api_version
            ))
            .header("api-key", &self.api_key);
        probe(self.backend_type(), request).await
    }
}

/// Factory for [`AzureConnector`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureFactory;

impl ConnectorFactory for AzureFactory {
    fn create(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorError> {
        Ok(Arc::new(AzureConnector::from_agent(agent)?))
    }
}
