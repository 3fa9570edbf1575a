//! Scripted connectors and router fixtures shared by the router tests

use crate::core::analytics::{AnalyticsConfig, UsageAnalyzer};
use crate::core::connectors::{
    ConnectionTest, Connector, ConnectorError, ConnectorFactory, ConnectorRegistry,
};
use crate::core::router::config::RouterConfig;
use crate::core::router::router::Router;
use crate::core::types::{
    Agent, AgentId, AgentRequest, BackendType, ConnectorOutput, TokenUsage,
};
use crate::storage::{
    AgentRepository, InMemoryAgentStore, InMemoryLogStore, InMemoryPreferenceStore,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted agent does when called
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Succeed,
    Fail(ConnectorError),
    Hang,
    Reject,
}

/// Shared script: per-agent behavior and call counts
#[derive(Debug, Clone, Default)]
pub(crate) struct Script {
    behaviors: Arc<DashMap<AgentId, Behavior>>,
    calls: Arc<DashMap<AgentId, AtomicUsize>>,
}

impl Script {
    pub(crate) fn set(&self, agent_id: &str, behavior: Behavior) {
        self.behaviors.insert(agent_id.to_string(), behavior);
    }

    pub(crate) fn calls(&self, agent_id: &str) -> usize {
        self.calls
            .get(agent_id)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    fn behavior(&self, agent_id: &str) -> Behavior {
        self.behaviors
            .get(agent_id)
            .map(|b| b.clone())
            .unwrap_or(Behavior::Succeed)
    }

    fn record_call(&self, agent_id: &str) {
        self.calls
            .entry(agent_id.to_string())
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedConnector {
    agent_id: AgentId,
    script: Script,
}

#[async_trait]
impl Connector for ScriptedConnector {
    fn backend_type(&self) -> BackendType {
        BackendType::OpenAi
    }

    fn validate_request(&self, _request: &AgentRequest) -> bool {
        !matches!(self.script.behavior(&self.agent_id), Behavior::Reject)
    }

    async fn process(&self, request: &AgentRequest) -> Result<ConnectorOutput, ConnectorError> {
        self.script.record_call(&self.agent_id);
        match self.script.behavior(&self.agent_id) {
            Behavior::Succeed | Behavior::Reject => Ok(ConnectorOutput::new(
                json!({ "text": format!("{} says hi to {}", self.agent_id, request.input_text()) }),
                TokenUsage::new(10, 5),
                Duration::from_millis(1),
            )),
            Behavior::Fail(err) => Err(err),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ConnectorError::network(BackendType::OpenAi, "woke up"))
            }
        }
    }

    async fn test_connection(&self) -> ConnectionTest {
        match self.script.behavior(&self.agent_id) {
            Behavior::Fail(err) => ConnectionTest::failure(err.to_string(), 1),
            _ => ConnectionTest::success("ok", 1),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedFactory {
    script: Script,
}

impl ConnectorFactory for ScriptedFactory {
    fn create(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorError> {
        Ok(Arc::new(ScriptedConnector {
            agent_id: agent.id.clone(),
            script: self.script.clone(),
        }))
    }
}

/// Enabled OpenAI-typed agent serving "text"
pub(crate) fn text_agent(id: &str, priority: i32) -> Agent {
    Agent::new(id, BackendType::OpenAi)
        .with_priority(priority)
        .with_capabilities(["text"])
}

/// Everything a router test needs to drive and inspect a router
pub(crate) struct Harness {
    pub router: Router,
    pub agents: Arc<InMemoryAgentStore>,
    pub preferences: Arc<InMemoryPreferenceStore>,
    pub logs: Arc<InMemoryLogStore>,
    pub script: Script,
}

pub(crate) fn harness(agents: Vec<Agent>, config: RouterConfig) -> Harness {
    harness_with_repository(agents, config, |store| store as Arc<dyn AgentRepository>)
}

/// Like [`harness`], but the router reads agents through `wrap(store)`
pub(crate) fn harness_with_repository(
    agents: Vec<Agent>,
    config: RouterConfig,
    wrap: impl FnOnce(Arc<InMemoryAgentStore>) -> Arc<dyn AgentRepository>,
) -> Harness {
    let script = Script::default();
    let agent_store = Arc::new(InMemoryAgentStore::with_agents(agents));
    let preferences = Arc::new(InMemoryPreferenceStore::new());
    let logs = Arc::new(InMemoryLogStore::new());
    let analyzer = Arc::new(UsageAnalyzer::new(logs.clone(), AnalyticsConfig::default()));

    let connectors = ConnectorRegistry::new().register(
        BackendType::OpenAi,
        ScriptedFactory {
            script: script.clone(),
        },
    );

    let router = Router::builder(wrap(agent_store.clone()))
        .config(config)
        .preferences(preferences.clone())
        .connectors(connectors)
        .analyzer(analyzer)
        .build_unchecked();

    Harness {
        router,
        agents: agent_store,
        preferences,
        logs,
        script,
    }
}
