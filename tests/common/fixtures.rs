//! Test fixtures and data factories
//!
//! Agents built here point at `wiremock` servers, so routing exercises the
//! shipped connectors end to end.

use agent_gateway::core::types::ConnectionSettings;
use agent_gateway::{Agent, BackendType};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Factory for agents targeting mock backends
pub struct AgentFactory;

impl AgentFactory {
    /// OpenAI-compatible agent serving `text`
    pub fn openai(id: &str, priority: i32, endpoint: &str) -> Agent {
        Agent::new(id, BackendType::OpenAi)
            .with_priority(priority)
            .with_capabilities(["text"])
            .with_cost_per_unit(0.002)
            .with_connection(ConnectionSettings {
                endpoint: Some(endpoint.to_string()),
                api_key: Some("sk-test".to_string()),
                model: Some("gpt-4o-mini".to_string()),
                ..Default::default()
            })
    }

    /// Local model server agent serving `text`
    pub fn local(id: &str, priority: i32, endpoint: &str) -> Agent {
        Agent::new(id, BackendType::Local)
            .with_priority(priority)
            .with_capabilities(["text"])
            .with_connection(ConnectionSettings {
                endpoint: Some(endpoint.to_string()),
                model: Some("llama3".to_string()),
                ..Default::default()
            })
    }
}

/// Mock backend server
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer chat completions with `text`
    pub async fn chat_ok(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-4o-mini",
                "choices": [{
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 8 }
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail chat completions with the given status
    pub async fn chat_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Answer local generate calls with `text`
    pub async fn generate_ok(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "response": text,
                "done": true,
                "prompt_eval_count": 4,
                "eval_count": 6
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer the connectivity probes of both API shapes
    pub async fn probes_ok(&self) {
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
            .mount(&self.server)
            .await;
    }
}
