//! Failover records and route results
//!
//! This module defines the history a routed request carries back to the
//! caller: the failed attempts, the failover events, and the final result.

use crate::core::connectors::{ConnectorError, ConnectorErrorKind};
use crate::core::types::{AgentId, TokenUsage};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One failover event, created when a replacement agent is chosen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailoverRecord {
    /// Agent that failed
    pub from_agent: AgentId,
    /// Replacement agent
    pub to_agent: AgentId,
    /// Triggering error text
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl FailoverRecord {
    pub fn new(
        from_agent: impl Into<AgentId>,
        to_agent: impl Into<AgentId>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A failed dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptFailure {
    pub agent_id: AgentId,
    #[serde(serialize_with = "serialize_error")]
    pub error: ConnectorError,
}

impl AttemptFailure {
    pub fn new(agent_id: impl Into<AgentId>, error: ConnectorError) -> Self {
        Self {
            agent_id: agent_id.into(),
            error,
        }
    }

    pub fn kind(&self) -> ConnectorErrorKind {
        self.error.kind()
    }
}

fn serialize_error<S: Serializer>(error: &ConnectorError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// Successful routing result with metadata
///
/// `attempts` counts every dispatch, including the successful one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub request_id: String,
    /// Connector output
    pub output: Value,
    /// Agent that produced the output
    pub agent_used: AgentId,
    pub token_usage: TokenUsage,
    /// Latency of the successful dispatch
    pub latency_ms: u64,
    /// Latency across all attempts
    pub total_latency_ms: u64,
    pub attempts: u32,
    /// Earlier failed attempts, in order
    pub failed_attempts: Vec<AttemptFailure>,
    /// Failover events, in order
    pub failovers: Vec<FailoverRecord>,
}

impl RouteResult {
    /// Whether a failover agent produced the result
    pub fn used_failover(&self) -> bool {
        !self.failovers.is_empty()
    }
}
