//! Execution helpers for router operations
//!
//! Timeout resolution, interaction record construction and result assembly
//! shared by the routed and explicit-agent paths.

use super::config::RouterConfig;
use super::error::RouterError;
use super::fallback::{AttemptFailure, FailoverRecord, RouteResult};
use crate::core::analytics::InteractionRecord;
use crate::core::connectors::ConnectorError;
use crate::core::types::{Agent, AgentRequest, ConnectorOutput, TokenUsage, UserContext};
use chrono::Utc;
use std::time::{Duration, Instant};

/// Why a single dispatch did not produce output
#[derive(Debug)]
pub enum DispatchError {
    /// Backend failure; logged, and eligible for failover on the routed path
    Connector(ConnectorError),
    /// Terminal for the whole call (validation, configuration, cancellation)
    Rejected(RouterError),
}

/// Output of one successful dispatch
#[derive(Debug)]
pub struct DispatchOutcome {
    pub output: ConnectorOutput,
    /// Wall-clock latency measured around the connector call
    pub latency_ms: u64,
}

/// Failure history accumulated across the attempts of one call
#[derive(Debug, Default)]
pub struct AttemptHistory {
    pub failures: Vec<AttemptFailure>,
    pub failovers: Vec<FailoverRecord>,
}

impl AttemptHistory {
    /// Number of dispatches made so far, counting failures only
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn into_error(self) -> RouterError {
        RouterError::AllAgentsFailed {
            attempts: self.failures,
        }
    }
}

/// Dispatch timeout: request, then agent, then router default
pub fn effective_timeout(request: &AgentRequest, agent: &Agent, config: &RouterConfig) -> Duration {
    request
        .timeout()
        .or_else(|| agent.connection.timeout_secs.map(Duration::from_secs))
        .unwrap_or_else(|| Duration::from_secs(config.timeout_secs))
}

/// Cost of a dispatch at the agent's per-1K-token rate
pub fn attempt_cost(agent: &Agent, usage: &TokenUsage) -> f64 {
    usage.total() as f64 / 1000.0 * agent.cost_per_unit
}

/// User id an attempt is logged under
///
/// The request's own `user_id` wins; otherwise the routing context's id,
/// unless that is empty.
pub fn logged_user_id(request: &AgentRequest, user: &UserContext) -> Option<String> {
    request
        .user_id
        .clone()
        .or_else(|| (!user.user_id.is_empty()).then(|| user.user_id.clone()))
}

/// Build the interaction log entry for one terminal attempt
pub fn interaction_record(
    request: &AgentRequest,
    agent: &Agent,
    user_id: Option<String>,
    result: &Result<ConnectorOutput, ConnectorError>,
    latency_ms: u64,
) -> InteractionRecord {
    let (output_text, usage, error) = match result {
        Ok(output) => (Some(output.text()), output.token_usage, None),
        Err(err) => (None, TokenUsage::default(), Some(err.to_string())),
    };

    InteractionRecord {
        request_id: request.request_id.clone(),
        agent_id: agent.id.clone(),
        user_id,
        request_type: request.request_type.clone(),
        input_text: request.input_text(),
        output_text,
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        latency_ms,
        cost: attempt_cost(agent, &usage),
        success: result.is_ok(),
        error,
        timestamp: Utc::now(),
    }
}

/// Build the route result from a successful dispatch
pub fn build_route_result(
    request: &AgentRequest,
    agent: &Agent,
    outcome: DispatchOutcome,
    history: AttemptHistory,
    started: Instant,
) -> RouteResult {
    RouteResult {
        request_id: request.request_id.clone(),
        output: outcome.output.output,
        agent_used: agent.id.clone(),
        token_usage: outcome.output.token_usage,
        latency_ms: outcome.latency_ms,
        total_latency_ms: started.elapsed().as_millis() as u64,
        attempts: history.failed_count() as u32 + 1,
        failed_attempts: history.failures,
        failovers: history.failovers,
    }
}
