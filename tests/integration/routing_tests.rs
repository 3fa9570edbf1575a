//! Routing integration tests
//!
//! Route requests through the shipped connectors against mock backends.

#[cfg(test)]
mod tests {
    use crate::common::{AgentFactory, MockBackend};
    use agent_gateway::core::connectors::ConnectorErrorKind;
    use agent_gateway::storage::{InMemoryAgentStore, InMemoryLogStore, InMemoryPreferenceStore};
    use agent_gateway::{
        AgentRequest, AnalyticsConfig, Router, RouterConfig, RouterError, RoutingStrategy,
        UsageAnalyzer, UserContext, UserPreference,
    };
    use std::sync::Arc;

    async fn router_for(
        agents: Vec<agent_gateway::Agent>,
        config: RouterConfig,
    ) -> (Router, Arc<InMemoryLogStore>) {
        let logs = Arc::new(InMemoryLogStore::new());
        let analyzer = Arc::new(UsageAnalyzer::new(logs.clone(), AnalyticsConfig::default()));
        let router = Router::builder(Arc::new(InMemoryAgentStore::with_agents(agents)))
            .analyzer(analyzer)
            .config(config)
            .build()
            .await
            .expect("router should build");
        (router, logs)
    }

    /// Test routing to the highest priority backend
    #[tokio::test]
    async fn test_route_to_openai_backend() {
        let primary = MockBackend::start().await;
        primary.chat_ok("Paris").await;
        let secondary = MockBackend::start().await;
        secondary.chat_ok("Lyon").await;

        let (router, logs) = router_for(
            vec![
                AgentFactory::openai("primary", 10, &primary.uri()),
                AgentFactory::openai("secondary", 5, &secondary.uri()),
            ],
            RouterConfig::default(),
        )
        .await;

        let result = router
            .route_request(&AgentRequest::text("Capital of France?"), &UserContext::default())
            .await
            .unwrap();

        assert_eq!(result.agent_used, "primary");
        assert_eq!(result.output["text"], "Paris");
        assert_eq!(result.token_usage.input_tokens, 12);
        assert_eq!(result.token_usage.output_tokens, 8);

        let entries = logs.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.output_text.as_deref(), Some("Paris"));
        assert!((entries[0].record.cost - 0.00004).abs() < 1e-12);
    }

    /// Test failover from a failing cloud backend to a local model
    #[tokio::test]
    async fn test_failover_from_openai_to_local() {
        let cloud = MockBackend::start().await;
        cloud.chat_status(503).await;
        let local = MockBackend::start().await;
        local.generate_ok("Bonjour").await;

        let (router, logs) = router_for(
            vec![
                AgentFactory::openai("cloud", 10, &cloud.uri()),
                AgentFactory::local("local", 1, &local.uri()),
            ],
            RouterConfig::default(),
        )
        .await;

        let result = router
            .route_request(&AgentRequest::text("Say hello"), &UserContext::default())
            .await
            .unwrap();

        assert_eq!(result.agent_used, "local");
        assert_eq!(result.output["text"], "Bonjour");
        assert_eq!(result.failovers.len(), 1);
        assert_eq!(result.failovers[0].from_agent, "cloud");
        assert_eq!(result.failovers[0].to_agent, "local");
        assert_eq!(result.failed_attempts[0].kind(), ConnectorErrorKind::Api);

        let entries = logs.snapshot();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].record.success);
        assert!(entries[1].record.success);
    }

    /// Test that exhausting agents reports every failure
    #[tokio::test]
    async fn test_all_backends_failing() {
        let a = MockBackend::start().await;
        a.chat_status(429).await;
        let b = MockBackend::start().await;
        b.chat_status(401).await;

        let (router, _) = router_for(
            vec![
                AgentFactory::openai("a", 10, &a.uri()),
                AgentFactory::openai("b", 5, &b.uri()),
            ],
            RouterConfig::default(),
        )
        .await;

        let err = router
            .route_request(&AgentRequest::text("hi"), &UserContext::default())
            .await
            .unwrap_err();

        match err {
            RouterError::AllAgentsFailed { attempts } => {
                let kinds: Vec<_> = attempts.iter().map(|a| a.kind()).collect();
                assert_eq!(
                    kinds,
                    vec![ConnectorErrorKind::RateLimit, ConnectorErrorKind::Authentication]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// Test round-robin across two live backends
    #[tokio::test]
    async fn test_round_robin_across_backends() {
        let a = MockBackend::start().await;
        a.chat_ok("from a").await;
        let b = MockBackend::start().await;
        b.chat_ok("from b").await;

        let config = RouterConfig {
            routing_strategy: RoutingStrategy::RoundRobin,
            ..Default::default()
        };
        let (router, _) = router_for(
            vec![
                AgentFactory::openai("a", 0, &a.uri()),
                AgentFactory::openai("b", 0, &b.uri()),
            ],
            config,
        )
        .await;

        let mut texts = Vec::new();
        for _ in 0..4 {
            let result = router
                .route_request(&AgentRequest::text("hi"), &UserContext::default())
                .await
                .unwrap();
            texts.push(result.output["text"].as_str().unwrap_or_default().to_string());
        }
        assert_eq!(texts, vec!["from a", "from b", "from a", "from b"]);
    }

    /// Test user preferences resolved from the preference store
    #[tokio::test]
    async fn test_route_with_stored_preferences() {
        let a = MockBackend::start().await;
        a.chat_ok("from a").await;
        let b = MockBackend::start().await;
        b.chat_ok("from b").await;

        let preferences = Arc::new(InMemoryPreferenceStore::new());
        preferences.set("alice", UserPreference::default().prefer("b"));

        let router = Router::builder(Arc::new(InMemoryAgentStore::with_agents(vec![
            AgentFactory::openai("a", 10, &a.uri()),
            AgentFactory::openai("b", 5, &b.uri()),
        ])))
        .preferences(preferences)
        .build()
        .await
        .unwrap();

        let result = router
            .route(&AgentRequest::text("hi").with_user("alice"))
            .await
            .unwrap();
        assert_eq!(result.agent_used, "b");

        let result = router.route(&AgentRequest::text("hi")).await.unwrap();
        assert_eq!(result.agent_used, "a");
    }

    /// Test connection sweep against live and dead backends
    #[tokio::test]
    async fn test_connection_sweep() {
        let live = MockBackend::start().await;
        live.probes_ok().await;

        let (router, _) = router_for(
            vec![
                AgentFactory::openai("cloud", 1, &live.uri()),
                AgentFactory::local("local", 1, &live.uri()),
                AgentFactory::local("dead", 1, "http://127.0.0.1:9"),
            ],
            RouterConfig::default(),
        )
        .await;

        let mut statuses = router.test_connections().await.unwrap();
        statuses.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));

        let summary: Vec<_> = statuses
            .iter()
            .map(|s| (s.agent_id.as_str(), s.result.ok))
            .collect();
        assert_eq!(summary, vec![("cloud", true), ("dead", false), ("local", true)]);
    }
}
