//! Routing request types

use super::agent::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use uuid::Uuid;

/// Opaque request payload, interpreted by each connector
pub type Payload = Map<String, Value>;

/// A generic "do this with an AI backend" request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Request identifier carried into every interaction log entry
    pub request_id: String,
    /// Request type tag used for capability filtering
    pub request_type: String,
    /// Payload, opaque to the router
    #[serde(default)]
    pub payload: Payload,
    /// Explicit target agent (bypasses selection, no failover)
    #[serde(default)]
    pub target_agent: Option<AgentId>,
    /// Originating user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Caller-supplied dispatch timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl AgentRequest {
    /// Create a request with a fresh request id
    pub fn new(request_type: impl Into<String>, payload: Payload) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            request_type: request_type.into(),
            payload,
            target_agent: None,
            user_id: None,
            timeout_ms: None,
        }
    }

    /// Create a `text` request carrying a single prompt
    pub fn text(prompt: impl Into<String>) -> Self {
        let mut payload = Payload::new();
        payload.insert("prompt".to_string(), Value::String(prompt.into()));
        Self::new("text", payload)
    }

    /// Target a specific agent (builder pattern)
    pub fn with_target_agent(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.target_agent = Some(agent_id.into());
        self
    }

    /// Attach the originating user (builder pattern)
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the dispatch timeout (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Caller-supplied timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// The `prompt` payload field, if present
    pub fn prompt(&self) -> Option<&str> {
        self.payload.get("prompt").and_then(Value::as_str)
    }

    /// The `messages` payload field, if present
    pub fn messages(&self) -> Option<&Vec<Value>> {
        self.payload.get("messages").and_then(Value::as_array)
    }

    /// Flattened input text used for interaction logs and compliance scoring
    pub fn input_text(&self) -> String {
        if let Some(prompt) = self.prompt() {
            return prompt.to_string();
        }

        if let Some(messages) = self.messages() {
            return messages
                .iter()
                .filter_map(|m| m.get("content").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n");
        }

        Value::Object(self.payload.clone()).to_string()
    }
}
