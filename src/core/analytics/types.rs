//! Analytics types and data structures

use crate::core::types::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interaction log identifier, assigned by the log repository
pub type LogId = u64;

/// One terminal dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Request the attempt belongs to
    pub request_id: String,
    /// Agent that was dispatched to
    pub agent_id: AgentId,
    /// Originating user
    pub user_id: Option<String>,
    /// Request type tag
    pub request_type: String,
    /// Flattened input text
    pub input_text: String,
    /// Output text (successful attempts only)
    pub output_text: Option<String>,
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
    /// Wall-clock latency in milliseconds
    pub latency_ms: u64,
    /// Tokens priced at the agent's `cost_per_unit` (per 1K tokens)
    #[serde(default)]
    pub cost: f64,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Error text (failed attempts only)
    pub error: Option<String>,
    /// When the attempt finished
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Total tokens
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens as u64 + self.output_tokens as u64
    }
}

/// Result of an external compliance scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub is_compliant: bool,
    pub score: f64,
    pub category: String,
}

/// Persisted interaction log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub log_id: LogId,
    #[serde(flatten)]
    pub record: InteractionRecord,
    /// `None` until the entry has been scored
    pub compliance: Option<ComplianceAssessment>,
}

impl InteractionLog {
    pub fn is_analyzed(&self) -> bool {
        self.compliance.is_some()
    }
}

/// Log query filter
///
/// Unset fields match everything. Time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    pub agent_id: Option<AgentId>,
    pub user_id: Option<String>,
    pub request_type: Option<String>,
    pub success: Option<bool>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LogFilter {
    /// Filter on one agent
    pub fn for_agent(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            ..Default::default()
        }
    }

    /// Filter on one user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, log: &InteractionLog) -> bool {
        let r = &log.record;
        self.agent_id.as_ref().is_none_or(|a| *a == r.agent_id)
            && self
                .user_id
                .as_ref()
                .is_none_or(|u| r.user_id.as_ref() == Some(u))
            && self
                .request_type
                .as_ref()
                .is_none_or(|t| *t == r.request_type)
            && self.success.is_none_or(|s| s == r.success)
            && self.since.is_none_or(|since| r.timestamp >= since)
            && self.until.is_none_or(|until| r.timestamp <= until)
    }
}

/// Per-agent usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUsageStats {
    pub total_interactions: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Mean latency over all attempts
    pub avg_latency_ms: f64,
    pub total_cost: f64,
}

impl AgentUsageStats {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_interactions == 0 {
            0.0
        } else {
            self.success_count as f64 / self.total_interactions as f64
        }
    }
}

/// Usage report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub total_interactions: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub per_agent: BTreeMap<AgentId, AgentUsageStats>,
    pub generated_at: DateTime<Utc>,
}

/// Compliance report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub total_interactions: u64,
    /// Entries that carry a compliance assessment
    pub analyzed_count: u64,
    pub compliant_count: u64,
    /// `compliant_count / analyzed_count`, zero when nothing was analyzed
    pub compliance_rate: f64,
    pub average_score: Option<f64>,
    /// Analyzed entries per compliance category
    pub per_category: BTreeMap<String, u64>,
    pub generated_at: DateTime<Utc>,
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    Info,
    Warning,
    Critical,
}

/// Usage recommendation for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Rule that produced the recommendation
    pub rule: String,
    pub level: RecommendationLevel,
    pub message: String,
}

/// Per-user behavior analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBehaviorReport {
    pub user_id: String,
    pub total_interactions: u64,
    pub success_count: u64,
    /// Interactions per request type
    pub per_category: BTreeMap<String, u64>,
    /// Interactions per agent
    pub per_agent: BTreeMap<AgentId, u64>,
    pub total_tokens: u64,
    pub non_compliant_count: u64,
    pub recommendations: Vec<Recommendation>,
}
