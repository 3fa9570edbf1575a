//! Shared helpers for the HTTP connectors
//!
//! Client construction, error mapping and the chat-completion wire format
//! spoken by both the OpenAI and Azure adapters.

use super::ConnectionTest;
use super::error::ConnectorError;
use crate::core::types::{AgentRequest, BackendType, ConnectorOutput, TokenUsage};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};
use tracing::warn;

/// Sampling parameters forwarded verbatim from the payload
const PASSTHROUGH_PARAMS: [&str; 5] = ["temperature", "max_tokens", "top_p", "stop", "seed"];

/// Build an HTTP client
pub fn build_client(backend: BackendType, timeout: Option<Duration>) -> Result<Client, ConnectorError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ConnectorError::configuration(backend, format!("Failed to build HTTP client: {}", e)))
}

/// Map a transport failure
pub fn map_send_error(backend: BackendType, err: reqwest::Error) -> ConnectorError {
    if err.is_timeout() {
        ConnectorError::timeout(backend, err.to_string())
    } else {
        ConnectorError::network(backend, err.to_string())
    }
}

/// Check the status and decode a JSON body
pub async fn read_json(backend: BackendType, response: Response) -> Result<Value, ConnectorError> {
    let status = response.status();

    if !status.is_success() {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        return Err(match ConnectorError::from_status(backend, status.as_u16(), &body) {
            ConnectorError::RateLimit { backend, message, .. } => ConnectorError::RateLimit {
                backend,
                message,
                retry_after,
            },
            other => other,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_send_error(backend, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ConnectorError::malformed_response(backend, format!("Invalid JSON: {}", e)))
}

/// Structural check shared by the chat-style connectors
///
/// Accepts either a non-empty `prompt` string or a non-empty `messages`
/// array whose entries all carry string `role` and `content` fields.
pub fn validate_chat_payload(request: &AgentRequest) -> bool {
    if let Some(prompt) = request.prompt() {
        return !prompt.trim().is_empty();
    }

    match request.messages() {
        Some(messages) if !messages.is_empty() => messages.iter().all(|m| {
            m.get("role").and_then(Value::as_str).is_some()
                && m.get("content").and_then(Value::as_str).is_some()
        }),
        _ => false,
    }
}

/// Chat messages for the request, wrapping a bare prompt as a user message
pub fn chat_messages(request: &AgentRequest) -> Vec<Value> {
    if let Some(messages) = request.messages() {
        return messages.clone();
    }

    let mut messages = Vec::new();
    if let Some(system) = request.payload.get("system").and_then(Value::as_str) {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": request.prompt().unwrap_or_default() }));
    messages
}

/// Chat-completion request body
pub fn chat_body(request: &AgentRequest, model: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(model) = model {
        body.insert("model".to_string(), Value::String(model.to_string()));
    }
    body.insert("messages".to_string(), Value::Array(chat_messages(request)));

    for key in PASSTHROUGH_PARAMS {
        if let Some(value) = request.payload.get(key) {
            body.insert(key.to_string(), value.clone());
        }
    }

    Value::Object(body)
}

/// Parse an OpenAI-style chat-completion response
pub fn parse_chat_completion(
    backend: BackendType,
    body: &Value,
    latency: Duration,
) -> Result<ConnectorOutput, ConnectorError> {
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| ConnectorError::malformed_response(backend, "Response has no choices"))?;

    let text = choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectorError::malformed_response(backend, "Choice has no message content"))?;

    let usage = body.get("usage");
    let token_usage = TokenUsage::new(
        usage_field(usage, "prompt_tokens"),
        usage_field(usage, "completion_tokens"),
    );

    let mut output = json!({ "text": text });
    if let Some(model) = body.get("model") {
        output["model"] = model.clone();
    }
    if let Some(reason) = choice.get("finish_reason") {
        output["finish_reason"] = reason.clone();
    }

    Ok(ConnectorOutput::new(output, token_usage, latency))
}

fn usage_field(usage: Option<&Value>, key: &str) -> u32 {
    usage
        .and_then(|u| u.get(key))
        .and_then(Value::as_u64)
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

/// Send a lightweight probe and report the outcome
pub async fn probe(backend: BackendType, request: RequestBuilder) -> ConnectionTest {
    let start = Instant::now();
    let result = request.send().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(response) if response.status().is_success() => {
            ConnectionTest::success(format!("{} backend reachable", backend), latency_ms)
        }
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let err = ConnectorError::from_status(backend, status, &body);
            warn!("Connection test for {} failed: {}", backend, err);
            ConnectionTest::failure(err.to_string(), latency_ms)
        }
        Err(e) => {
            let err = map_send_error(backend, e);
            warn!("Connection test for {} failed: {}", backend, err);
            ConnectionTest::failure(err.to_string(), latency_ms)
        }
    }
}

/// Trim a trailing slash from a configured base URL
pub fn base_url(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}
