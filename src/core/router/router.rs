//! Router core structure
//!
//! The router owns the load balancer, the connector registry and a handle
//! to the usage analyzer. It is built once and shared behind an `Arc`.

use super::config::RouterConfig;
use super::error::RouterError;
use super::load_balancer::LoadBalancer;
use crate::core::analytics::{AnalyticsConfig, UsageAnalyzer};
use crate::core::connectors::{ConnectionTest, ConnectorLookupError, ConnectorRegistry};
use crate::core::types::{AgentId, BackendType, UserContext};
use crate::storage::{AgentRepository, InMemoryLogStore, InMemoryPreferenceStore, PreferenceRepository};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Connectivity result for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentConnectionStatus {
    pub agent_id: AgentId,
    pub backend_type: BackendType,
    #[serde(flatten)]
    pub result: ConnectionTest,
}

/// Request router
///
/// Resolves requests to agents, dispatches through connectors, logs every
/// attempt and fails over to other agents on backend errors.
pub struct Router {
    pub(crate) load_balancer: LoadBalancer,
    pub(crate) preferences: Arc<dyn PreferenceRepository>,
    pub(crate) connectors: ConnectorRegistry,
    pub(crate) analyzer: Arc<UsageAnalyzer>,
    pub(crate) config: RouterConfig,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("load_balancer", &self.load_balancer)
            .field("connectors", &self.connectors.backend_types())
            .finish()
    }
}

impl Router {
    /// Start building a router over an agent repository
    pub fn builder(agents: Arc<dyn AgentRepository>) -> RouterBuilder {
        RouterBuilder::new(agents)
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn load_balancer(&self) -> &LoadBalancer {
        &self.load_balancer
    }

    pub fn analyzer(&self) -> &Arc<UsageAnalyzer> {
        &self.analyzer
    }

    pub fn connectors(&self) -> &ConnectorRegistry {
        &self.connectors
    }

    /// Resolve a user's preferences into a routing context
    pub async fn user_context(&self, user_id: &str) -> Result<UserContext, RouterError> {
        let preference = self.preferences.get_user_preferences(user_id).await?;
        Ok(UserContext::new(user_id).with_preference(preference))
    }

    /// Check that every enabled agent has a registered connector factory
    pub async fn verify_agents(&self) -> Result<(), RouterError> {
        let agents = self.load_balancer.agents().list_enabled_agents().await?;

        let mut missing: BTreeMap<BackendType, Vec<AgentId>> = BTreeMap::new();
        for agent in agents {
            if !self.connectors.supports(agent.backend_type) {
                missing.entry(agent.backend_type).or_default().push(agent.id);
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        let detail = missing
            .iter()
            .map(|(backend, ids)| format!("{} (agents: {})", backend, ids.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        Err(RouterError::Configuration(format!(
            "No connector registered for backend type {}",
            detail
        )))
    }

    /// Run every enabled agent's connection self-test concurrently
    pub async fn test_connections(&self) -> Result<Vec<AgentConnectionStatus>, RouterError> {
        let agents = self.load_balancer.agents().list_enabled_agents().await?;

        let probes = agents.into_iter().map(|agent| async move {
            let result = match self.connectors.connector_for(&agent) {
                Ok(connector) => connector.test_connection().await,
                Err(ConnectorLookupError::Unsupported(backend)) => {
                    ConnectionTest::failure(format!("No connector registered for {}", backend), 0)
                }
                Err(ConnectorLookupError::Creation(e)) => ConnectionTest::failure(e.to_string(), 0),
            };

            if !result.ok {
                warn!("Connection test failed for agent {}: {}", agent.id, result.message);
            }

            AgentConnectionStatus {
                agent_id: agent.id,
                backend_type: agent.backend_type,
                result,
            }
        });

        Ok(join_all(probes).await)
    }
}

/// Builder for [`Router`]
pub struct RouterBuilder {
    agents: Arc<dyn AgentRepository>,
    preferences: Option<Arc<dyn PreferenceRepository>>,
    connectors: Option<ConnectorRegistry>,
    analyzer: Option<Arc<UsageAnalyzer>>,
    config: RouterConfig,
}

impl RouterBuilder {
    pub fn new(agents: Arc<dyn AgentRepository>) -> Self {
        Self {
            agents,
            preferences: None,
            connectors: None,
            analyzer: None,
            config: RouterConfig::default(),
        }
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preferences(mut self, preferences: Arc<dyn PreferenceRepository>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Use a custom connector registry instead of the shipped adapters
    pub fn connectors(mut self, connectors: ConnectorRegistry) -> Self {
        self.connectors = Some(connectors);
        self
    }

    pub fn analyzer(mut self, analyzer: Arc<UsageAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Build without checking agents against the connector registry
    pub fn build_unchecked(self) -> Router {
        let load_balancer = LoadBalancer::new(self.agents, self.config.routing_strategy)
            .with_priority_order(self.config.priority_order);

        Router {
            load_balancer,
            preferences: self
                .preferences
                .unwrap_or_else(|| Arc::new(InMemoryPreferenceStore::new())),
            connectors: self.connectors.unwrap_or_else(ConnectorRegistry::with_defaults),
            analyzer: self.analyzer.unwrap_or_else(|| {
                Arc::new(UsageAnalyzer::new(
                    Arc::new(InMemoryLogStore::new()),
                    AnalyticsConfig::default(),
                ))
            }),
            config: self.config,
        }
    }

    /// Build and verify that every enabled agent has a connector factory
    pub async fn build(self) -> Result<Router, RouterError> {
        let router = self.build_unchecked();
        router.verify_agents().await?;
        info!(
            "Router ready: strategy={}, max_failover_hops={}, backends={:?}",
            router.config.routing_strategy,
            router.config.max_failover_hops,
            router.connectors.backend_types()
        );
        Ok(router)
    }
}
