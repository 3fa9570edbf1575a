//! Router error types
//!
//! Only `Backend` failures on the routed path are converted into failover.
//! Every other variant reaches the caller without consuming an attempt.

use super::fallback::AttemptFailure;
use crate::core::connectors::ConnectorError;
use crate::core::types::AgentId;
use crate::utils::error::GatewayError;

/// Router error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouterError {
    /// Malformed request, rejected before dispatch
    #[error("Validation failed for agent {agent_id}: {message}")]
    Validation { agent_id: AgentId, message: String },

    /// Explicitly requested agent is disabled
    #[error("Agent is disabled: {0}")]
    AgentDisabled(AgentId),

    /// Explicitly requested agent does not exist
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Nothing survived capability and policy filtering
    #[error("No eligible agent for request type: {request_type}")]
    NoEligibleAgent { request_type: String },

    /// Connector failure on the explicit-agent path
    #[error("Agent {agent_id} failed: {source}")]
    Backend {
        agent_id: AgentId,
        #[source]
        source: ConnectorError,
    },

    /// Every attempt failed; carries the full history in attempt order
    #[error("All agents failed: {}", summarize(.attempts))]
    AllAgentsFailed { attempts: Vec<AttemptFailure> },

    /// Missing connector factory or unusable agent configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Agent or preference repository failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// Caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,
}

impl RouterError {
    /// Agents attempted before the terminal failure
    pub fn attempted_agents(&self) -> Vec<&str> {
        match self {
            RouterError::AllAgentsFailed { attempts } => {
                attempts.iter().map(|a| a.agent_id.as_str()).collect()
            }
            RouterError::Backend { agent_id, .. } => vec![agent_id.as_str()],
            _ => Vec::new(),
        }
    }
}

impl From<GatewayError> for RouterError {
    fn from(err: GatewayError) -> Self {
        RouterError::Repository(err.to_string())
    }
}

fn summarize(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.agent_id, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}
