//! Configuration integration tests
//!
//! Load YAML configuration from disk and drive a router with it.

#[cfg(test)]
mod tests {
    use crate::common::MockBackend;
    use agent_gateway::{AgentRequest, Config, Router, RouterError, RoutingStrategy};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    async fn router_from(config: &Config) -> Result<Router, RouterError> {
        Router::builder(Arc::new(config.agent_store()))
            .preferences(Arc::new(config.preference_store()))
            .config(config.router.clone())
            .build()
            .await
    }

    /// Test that a config file fully describes a working router
    #[tokio::test]
    async fn test_router_from_config_file() {
        let backend = MockBackend::start().await;
        backend.chat_ok("configured").await;
        backend.generate_ok("local answer").await;

        let file = write_config(&format!(
            r#"
router:
  routing_strategy: priority
  max_failover_hops: 1
  timeout_secs: 5
agents:
  - id: cloud
    backend_type: openai
    priority: 10
    capabilities: [text]
    connection:
      endpoint: "{uri}"
      api_key: sk-test
  - id: local
    backend_type: local
    priority: 1
    capabilities: ["*"]
    connection:
      endpoint: "{uri}"
users:
  - user_id: frugal
    preferred_agent: local
"#,
            uri = backend.uri()
        ));

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.router.routing_strategy, RoutingStrategy::Priority);
        assert_eq!(config.router.timeout_secs, 5);

        let router = router_from(&config).await.unwrap();

        let result = router.route(&AgentRequest::text("hi")).await.unwrap();
        assert_eq!(result.agent_used, "cloud");
        assert_eq!(result.output["text"], "configured");

        let result = router
            .route(&AgentRequest::text("hi").with_user("frugal"))
            .await
            .unwrap();
        assert_eq!(result.agent_used, "local");
        assert_eq!(result.output["text"], "local answer");
    }

    /// Test that invalid files are rejected before a router is built
    #[tokio::test]
    async fn test_invalid_config_file() {
        let file = write_config(
            r#"
agents:
  - id: broken
    backend_type: openai
    capabilities: []
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("declares no capabilities"), "{}", err);
    }

    /// Test that a missing api key surfaces as a failed attempt, not a panic
    #[tokio::test]
    async fn test_agent_without_credentials_fails_over() {
        let backend = MockBackend::start().await;
        backend.generate_ok("fallback").await;

        let config = Config::from_yaml_str(&format!(
            r#"
agents:
  - id: keyless
    backend_type: openai
    priority: 10
    capabilities: [text]
  - id: local
    backend_type: local
    capabilities: [text]
    connection:
      endpoint: "{}"
"#,
            backend.uri()
        ))
        .unwrap();

        let router = router_from(&config).await.unwrap();
        let result = router.route(&AgentRequest::text("hi")).await.unwrap();

        assert_eq!(result.agent_used, "local");
        assert_eq!(result.failed_attempts.len(), 1);
        assert!(
            result.failed_attempts[0]
                .error
                .to_string()
                .contains("has no api_key")
        );
    }
}
