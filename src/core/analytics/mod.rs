//! Usage and compliance analytics
//!
//! Records every dispatch attempt, aggregates per-agent and per-user
//! statistics, and optionally forwards completed interactions to an
//! external compliance scorer.

mod analyzer;
mod compliance;
mod config;
mod optimizer;
mod reports;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::UsageAnalyzer;
pub use compliance::{ComplianceError, ComplianceScorer};
pub use config::{AnalyticsConfig, ComplianceMode};
pub use optimizer::{RuleCheck, UsageOptimizer, UsageRule};
pub use types::{
    AgentUsageStats, ComplianceAssessment, ComplianceReport, InteractionLog, InteractionRecord,
    LogFilter, LogId, Recommendation, RecommendationLevel, UsageReport, UserBehaviorReport,
};
