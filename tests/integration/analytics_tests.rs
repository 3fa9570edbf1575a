//! Analytics integration tests
//!
//! Reports and compliance scoring over traffic routed through the router.

#[cfg(test)]
mod tests {
    use crate::common::{AgentFactory, MockBackend};
    use agent_gateway::core::analytics::{ComplianceAssessment, ComplianceError};
    use agent_gateway::storage::{InMemoryAgentStore, InMemoryLogStore};
    use agent_gateway::{
        AgentRequest, AnalyticsConfig, ComplianceMode, ComplianceScorer, LogFilter, Router,
        UsageAnalyzer,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Flags any output mentioning "secret"
    struct KeywordScorer;

    #[async_trait]
    impl ComplianceScorer for KeywordScorer {
        async fn analyze(
            &self,
            _input: &str,
            output: &str,
        ) -> Result<ComplianceAssessment, ComplianceError> {
            let leaked = output.contains("secret");
            Ok(ComplianceAssessment {
                is_compliant: !leaked,
                score: if leaked { 0.1 } else { 0.95 },
                category: if leaked { "data_leak" } else { "general" }.to_string(),
            })
        }
    }

    /// Test usage and compliance reports after routed traffic
    #[tokio::test]
    async fn test_reports_over_routed_traffic() {
        let safe = MockBackend::start().await;
        safe.chat_ok("all good").await;
        let leaky = MockBackend::start().await;
        leaky.chat_ok("the secret is 42").await;

        let logs = Arc::new(InMemoryLogStore::new());
        let analyzer = Arc::new(
            UsageAnalyzer::new(
                logs.clone(),
                AnalyticsConfig {
                    compliance_mode: ComplianceMode::Inline,
                    ..Default::default()
                },
            )
            .with_scorer(Arc::new(KeywordScorer)),
        );

        let router = Router::builder(Arc::new(InMemoryAgentStore::with_agents(vec![
            AgentFactory::openai("safe", 10, &safe.uri()),
            AgentFactory::openai("leaky", 5, &leaky.uri()),
        ])))
        .analyzer(analyzer.clone())
        .build()
        .await
        .unwrap();

        for _ in 0..2 {
            router
                .route(&AgentRequest::text("status?").with_user("alice"))
                .await
                .unwrap();
        }
        router
            .process_with_agent(&AgentRequest::text("tell me").with_user("alice"), "leaky")
            .await
            .unwrap();

        let usage = analyzer.generate_usage_report(&LogFilter::default()).await.unwrap();
        assert_eq!(usage.total_interactions, 3);
        assert_eq!(usage.per_agent["safe"].total_interactions, 2);
        assert_eq!(usage.per_agent["leaky"].total_interactions, 1);
        assert_eq!(usage.total_tokens, 60);

        let compliance = analyzer
            .generate_compliance_report(&LogFilter::default())
            .await
            .unwrap();
        assert_eq!(compliance.analyzed_count, 3);
        assert_eq!(compliance.compliant_count, 2);
        assert_eq!(compliance.per_category["data_leak"], 1);

        let behavior = analyzer.analyze_user_behavior("alice").await.unwrap();
        assert_eq!(behavior.total_interactions, 3);
        assert_eq!(behavior.non_compliant_count, 1);
        assert!(
            behavior
                .recommendations
                .iter()
                .any(|r| r.rule == "non_compliant_content")
        );
    }

    /// Test that failed attempts are logged but never scored
    #[tokio::test]
    async fn test_failed_attempts_are_not_scored() {
        let down = MockBackend::start().await;
        down.chat_status(500).await;
        let up = MockBackend::start().await;
        up.chat_ok("fine").await;

        let logs = Arc::new(InMemoryLogStore::new());
        let analyzer = Arc::new(
            UsageAnalyzer::new(
                logs.clone(),
                AnalyticsConfig {
                    compliance_mode: ComplianceMode::Inline,
                    ..Default::default()
                },
            )
            .with_scorer(Arc::new(KeywordScorer)),
        );

        let router = Router::builder(Arc::new(InMemoryAgentStore::with_agents(vec![
            AgentFactory::openai("down", 10, &down.uri()),
            AgentFactory::openai("up", 5, &up.uri()),
        ])))
        .analyzer(analyzer.clone())
        .build()
        .await
        .unwrap();

        router.route(&AgentRequest::text("hi")).await.unwrap();

        let entries = logs.snapshot();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_analyzed());
        assert!(entries[1].is_analyzed());
        assert_eq!(analyzer.failover_records().len(), 1);

        let usage = analyzer.generate_usage_report(&LogFilter::for_agent("down")).await.unwrap();
        assert_eq!(usage.failure_count, 1);
    }
}
