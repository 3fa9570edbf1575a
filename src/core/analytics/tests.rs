//! Tests for analytics module

use super::analyzer::UsageAnalyzer;
use super::compliance::{ComplianceError, MockComplianceScorer};
use super::config::{AnalyticsConfig, ComplianceMode};
use super::optimizer::UsageOptimizer;
use super::types::{
    ComplianceAssessment, InteractionLog, InteractionRecord, LogFilter, LogId, RecommendationLevel,
};
use crate::core::router::FailoverRecord;
use crate::storage::{InMemoryLogStore, LogRepository};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

fn record(agent: &str, user: Option<&str>, success: bool) -> InteractionRecord {
    InteractionRecord {
        request_id: uuid::Uuid::new_v4().to_string(),
        agent_id: agent.to_string(),
        user_id: user.map(str::to_string),
        request_type: "text".to_string(),
        input_text: "summarize Q3".to_string(),
        output_text: success.then(|| "Q3 was fine".to_string()),
        input_tokens: 10,
        output_tokens: 5,
        latency_ms: 100,
        cost: 0.5,
        success,
        error: (!success).then(|| "Timeout for openai: deadline elapsed".to_string()),
        timestamp: Utc::now(),
    }
}

fn compliant(category: &str) -> ComplianceAssessment {
    ComplianceAssessment {
        is_compliant: true,
        score: 0.9,
        category: category.to_string(),
    }
}

fn analyzer_with(mode: ComplianceMode, scorer: MockComplianceScorer) -> (Arc<InMemoryLogStore>, UsageAnalyzer) {
    let store = Arc::new(InMemoryLogStore::new());
    let config = AnalyticsConfig {
        compliance_mode: mode,
        ..Default::default()
    };
    let analyzer = UsageAnalyzer::new(store.clone(), config).with_scorer(Arc::new(scorer));
    (store, analyzer)
}

/// Log repository that rejects every write
struct BrokenLogStore;

#[async_trait]
impl LogRepository for BrokenLogStore {
    async fn append_log(&self, _record: InteractionRecord) -> Result<LogId> {
        Err(GatewayError::storage("disk full"))
    }

    async fn query_logs(&self, _filter: &LogFilter) -> Result<Vec<InteractionLog>> {
        Err(GatewayError::storage("disk full"))
    }

    async fn record_compliance(&self, _log_id: LogId, _a: ComplianceAssessment) -> Result<()> {
        Err(GatewayError::storage("disk full"))
    }
}

#[tokio::test]
async fn test_log_interaction_assigns_ids() {
    let store = Arc::new(InMemoryLogStore::new());
    let analyzer = UsageAnalyzer::new(store.clone(), AnalyticsConfig::default());

    assert_eq!(analyzer.log_interaction(record("a", None, true)).await, Some(1));
    assert_eq!(analyzer.log_interaction(record("b", None, false)).await, Some(2));
    assert_eq!(store.len(), 2);
    assert_eq!(analyzer.log_error_count(), 0);
}

#[tokio::test]
async fn test_log_failure_is_swallowed_and_counted() {
    let analyzer = UsageAnalyzer::new(Arc::new(BrokenLogStore), AnalyticsConfig::default());

    assert_eq!(analyzer.log_interaction(record("a", None, true)).await, None);
    assert_eq!(analyzer.log_interaction(record("a", None, true)).await, None);
    assert_eq!(analyzer.log_error_count(), 2);

    // Reports still surface the repository failure
    assert!(analyzer.generate_usage_report(&LogFilter::default()).await.is_err());
}

#[tokio::test]
async fn test_usage_report_per_agent() {
    let store = Arc::new(InMemoryLogStore::new());
    let analyzer = UsageAnalyzer::new(store, AnalyticsConfig::default());

    analyzer.log_interaction(record("a", None, true)).await;
    analyzer.log_interaction(record("a", None, false)).await;
    analyzer.log_interaction(record("b", None, true)).await;

    let report = analyzer.generate_usage_report(&LogFilter::default()).await.unwrap();
    assert_eq!(report.total_interactions, 3);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.total_tokens, 45);
    assert!((report.total_cost - 1.5).abs() < f64::EPSILON);

    let a = &report.per_agent["a"];
    assert_eq!(a.total_interactions, 2);
    assert_eq!(a.failure_count, 1);
    assert_eq!(a.success_rate(), 0.5);
    assert_eq!(a.avg_latency_ms, 100.0);

    let only_b = analyzer
        .generate_usage_report(&LogFilter::for_agent("b"))
        .await
        .unwrap();
    assert_eq!(only_b.total_interactions, 1);
    assert!(!only_b.per_agent.contains_key("a"));
}

#[tokio::test]
async fn test_inline_compliance_scoring() {
    let mut scorer = MockComplianceScorer::new();
    scorer
        .expect_analyze()
        .times(1)
        .returning(|_, _| Ok(compliant("finance")));
    let (store, analyzer) = analyzer_with(ComplianceMode::Inline, scorer);

    let id = analyzer.log_interaction(record("a", None, true)).await.unwrap();
    // Failed interactions are never scored
    analyzer.log_interaction(record("a", None, false)).await;

    let logs = store.snapshot();
    assert_eq!(logs[(id - 1) as usize].compliance, Some(compliant("finance")));
    assert!(logs[1].compliance.is_none());

    let report = analyzer
        .generate_compliance_report(&LogFilter::default())
        .await
        .unwrap();
    assert_eq!(report.total_interactions, 2);
    assert_eq!(report.analyzed_count, 1);
    assert_eq!(report.compliant_count, 1);
    assert_eq!(report.compliance_rate, 1.0);
    assert_eq!(report.per_category["finance"], 1);
}

#[tokio::test]
async fn test_compliance_off_never_calls_scorer() {
    let mut scorer = MockComplianceScorer::new();
    scorer.expect_analyze().times(0);
    let (store, analyzer) = analyzer_with(ComplianceMode::Off, scorer);

    analyzer.log_interaction(record("a", None, true)).await;
    assert!(store.snapshot()[0].compliance.is_none());
}

#[tokio::test]
async fn test_scorer_failure_leaves_entry_unanalyzed_then_backfill() {
    let mut scorer = MockComplianceScorer::new();
    let mut seq = mockall::Sequence::new();
    scorer
        .expect_analyze()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(ComplianceError::Unavailable("503".to_string())));
    scorer
        .expect_analyze()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(compliant("general")));
    let (store, analyzer) = analyzer_with(ComplianceMode::Inline, scorer);

    let id = analyzer.log_interaction(record("a", None, true)).await;
    assert!(id.is_some());
    assert!(store.snapshot()[0].compliance.is_none());
    assert_eq!(analyzer.compliance_error_count(), 1);

    assert_eq!(analyzer.analyze_pending().await.unwrap(), 1);
    assert_eq!(store.snapshot()[0].compliance, Some(compliant("general")));

    // Nothing left to do
    assert_eq!(analyzer.analyze_pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_background_compliance_scoring() {
    let mut scorer = MockComplianceScorer::new();
    scorer.expect_analyze().returning(|_, _| Ok(compliant("hr")));
    let (store, analyzer) = analyzer_with(ComplianceMode::Background, scorer);

    analyzer.log_interaction(record("a", None, true)).await;

    for _ in 0..50 {
        if store.snapshot()[0].is_analyzed() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.snapshot()[0].compliance, Some(compliant("hr")));
}

#[tokio::test]
async fn test_user_behavior_with_recommendations() {
    let mut scorer = MockComplianceScorer::new();
    scorer.expect_analyze().returning(|_, _| {
        Ok(ComplianceAssessment {
            is_compliant: false,
            score: 0.2,
            category: "pii".to_string(),
        })
    });
    let (_store, analyzer) = analyzer_with(ComplianceMode::Inline, scorer);

    analyzer.log_interaction(record("a", Some("alice"), true)).await;
    for _ in 0..3 {
        analyzer.log_interaction(record("b", Some("alice"), false)).await;
    }
    analyzer.log_interaction(record("a", Some("bob"), true)).await;

    let report = analyzer.analyze_user_behavior("alice").await.unwrap();
    assert_eq!(report.total_interactions, 4);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.per_category["text"], 4);
    assert_eq!(report.per_agent["b"], 3);
    assert_eq!(report.non_compliant_count, 1);

    let rules: Vec<_> = report.recommendations.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(rules, vec!["non_compliant_content", "high_failure_rate"]);
    assert_eq!(report.recommendations[0].level, RecommendationLevel::Critical);
}

#[tokio::test]
async fn test_unknown_user_has_no_activity() {
    let analyzer = UsageAnalyzer::new(Arc::new(InMemoryLogStore::new()), AnalyticsConfig::default());
    let report = analyzer.analyze_user_behavior("nobody").await.unwrap();
    assert_eq!(report.total_interactions, 0);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].rule, "no_activity");
}

#[test]
fn test_failover_history_is_bounded() {
    let config = AnalyticsConfig {
        failover_history_capacity: 2,
        ..Default::default()
    };
    let analyzer = UsageAnalyzer::new(Arc::new(InMemoryLogStore::new()), config);

    for to in ["b", "c", "d"] {
        analyzer.record_failover(FailoverRecord::new("a", to, "boom"));
    }

    let history = analyzer.failover_records();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].to_agent, "c");
    assert_eq!(history[1].to_agent, "d");
}

#[test]
fn test_failover_history_disabled() {
    let config = AnalyticsConfig {
        failover_history_capacity: 0,
        ..Default::default()
    };
    let analyzer = UsageAnalyzer::new(Arc::new(InMemoryLogStore::new()), config);
    analyzer.record_failover(FailoverRecord::new("a", "b", "boom"));
    assert!(analyzer.failover_records().is_empty());
}

#[test]
fn test_default_optimizer_rules() {
    let optimizer = UsageOptimizer::new();
    assert_eq!(optimizer.rules().len(), 5);
}

#[test]
fn test_compliance_mode_parsing() {
    assert_eq!("inline".parse::<ComplianceMode>(), Ok(ComplianceMode::Inline));
    assert_eq!("Background".parse::<ComplianceMode>(), Ok(ComplianceMode::Background));
    assert!("sometimes".parse::<ComplianceMode>().is_err());
}
