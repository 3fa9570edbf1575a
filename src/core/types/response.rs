//! Connector output types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Token usage reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the input
    pub input_tokens: u32,
    /// Tokens produced in the output
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens
    pub fn total(&self) -> u64 {
        self.input_tokens as u64 + self.output_tokens as u64
    }
}

/// Successful connector result
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorOutput {
    /// Backend output, usually `{"text": ...}` plus backend-specific fields
    pub output: Value,
    /// Token usage
    pub token_usage: TokenUsage,
    /// Latency as measured by the connector
    pub latency: Duration,
}

impl ConnectorOutput {
    pub fn new(output: Value, token_usage: TokenUsage, latency: Duration) -> Self {
        Self {
            output,
            token_usage,
            latency,
        }
    }

    /// Output text for logs and compliance scoring
    pub fn text(&self) -> String {
        match &self.output {
            Value::String(s) => s.clone(),
            other => other
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        }
    }
}
