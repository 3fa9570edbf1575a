//! Local model server connector
//!
//! Targets an Ollama-style API: `POST /api/generate` with `stream: false`
//! and `GET /api/tags` as the connectivity probe. No authentication.

use super::error::ConnectorError;
use super::shared::{base_url, build_client, map_send_error, probe, read_json};
use super::{ConnectionTest, Connector, ConnectorFactory};
use crate::core::types::{Agent, AgentRequest, BackendType, ConnectorOutput, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug, Clone)]
pub struct LocalConnector {
    client: Client,
    endpoint: String,
    model: String,
}

impl LocalConnector {
    pub fn from_agent(agent: &Agent) -> Result<Self, ConnectorError> {
        let conn = &agent.connection;
        Ok(Self {
            client: build_client(BackendType::Local, conn.timeout_secs.map(Duration::from_secs))?,
            endpoint: base_url(conn.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)).to_string(),
            model: conn.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    fn generate_body(&self, request: &AgentRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "prompt": request.input_text(),
            "stream": false,
        });
        if let Some(system) = request.payload.get("system") {
            body["system"] = system.clone();
        }
        if let Some(options) = request.payload.get("options") {
            body["options"] = options.clone();
        }
        body
    }
}

#[async_trait]
impl Connector for LocalConnector {
    fn backend_type(&self) -> BackendType {
        BackendType::Local
    }

    /// Local models only take a flat prompt
    fn validate_request(&self, request: &AgentRequest) -> bool {
        request.prompt().is_some_and(|p| !p.trim().is_empty())
    }

    async fn process(&self, request: &AgentRequest) -> Result<ConnectorOutput, ConnectorError> {
        let backend = self.backend_type();
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&self.generate_body(request))
            .send()
            .await
            .map_err(|e| map_send_error(backend, e))?;

        let json = read_json(backend, response).await?;
        let text = json
            .get("response")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectorError::malformed_response(backend, "Missing response field"))?;

        let count = |key: &str| json.get(key).and_then(Value::as_u64).unwrap_or(0) as u32;
        let token_usage = TokenUsage::new(count("prompt_eval_count"), count("eval_count"));

        Ok(ConnectorOutput::new(
            json!({ "text": text, "model": self.model }),
            token_usage,
            start.elapsed(),
        ))
    }

    async fn test_connection(&self) -> ConnectionTest {
        probe(
            self.backend_type(),
            self.client.get(format!("{}/api/tags", self.endpoint)),
        )
        .await
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFactory;

impl ConnectorFactory for LocalFactory {
    fn create(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorError> {
        Ok(Arc::new(LocalConnector::from_agent(agent)?))
    }
}
