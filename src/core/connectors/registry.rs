//! Connector registry
//!
//! Maps backend types to connector factories and caches one connector
//! instance per agent.

use super::azure::AzureFactory;
use super::error::ConnectorError;
use super::local::LocalFactory;
use super::openai::OpenAiFactory;
use super::{Connector, ConnectorFactory};
use crate::core::types::{Agent, AgentId, BackendType, ConnectionSettings};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Connector resolution failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectorLookupError {
    /// No factory registered for the backend type
    #[error("No connector registered for backend type: {0}")]
    Unsupported(BackendType),

    /// The factory rejected the agent's connection settings
    #[error(transparent)]
    Creation(#[from] ConnectorError),
}

#[derive(Debug)]
struct CachedConnector {
    backend_type: BackendType,
    connection: ConnectionSettings,
    connector: Arc<dyn Connector>,
}

/// Connector registry
///
/// Built once at startup. Instance lookups are lock-free.
#[derive(Debug, Default)]
pub struct ConnectorRegistry {
    factories: HashMap<BackendType, Arc<dyn ConnectorFactory>>,
    instances: DashMap<AgentId, CachedConnector>,
}

impl ConnectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the shipped OpenAI, Azure and local adapters
    pub fn with_defaults() -> Self {
        Self::new()
            .register(BackendType::OpenAi, OpenAiFactory)
            .register(BackendType::Azure, AzureFactory)
            .register(BackendType::Local, LocalFactory)
    }

    /// Register a factory for a backend type (builder pattern)
    ///
    /// Replaces any factory previously registered for the same type.
    pub fn register(
        mut self,
        backend_type: BackendType,
        factory: impl ConnectorFactory + 'static,
    ) -> Self {
        self.factories.insert(backend_type, Arc::new(factory));
        self
    }

    /// Check if a factory is registered
    pub fn supports(&self, backend_type: BackendType) -> bool {
        self.factories.contains_key(&backend_type)
    }

    /// Registered backend types
    pub fn backend_types(&self) -> Vec<BackendType> {
        let mut types: Vec<_> = self.factories.keys().copied().collect();
        types.sort();
        types
    }

    /// Resolve the connector for an agent
    ///
    /// Cached instances are reused until the agent's backend type or
    /// connection settings change.
    pub fn connector_for(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorLookupError> {
        if let Some(cached) = self.instances.get(&agent.id) {
            if cached.backend_type == agent.backend_type && cached.connection == agent.connection {
                return Ok(cached.connector.clone());
            }
        }

        let factory = self
            .factories
            .get(&agent.backend_type)
            .ok_or(ConnectorLookupError::Unsupported(agent.backend_type))?;

        debug!(
            "Creating {} connector for agent {}",
            agent.backend_type, agent.id
        );
        let connector = factory.create(agent)?;

        self.instances.insert(
            agent.id.clone(),
            CachedConnector {
                backend_type: agent.backend_type,
                connection: agent.connection.clone(),
                connector: connector.clone(),
            },
        );

        Ok(connector)
    }

    /// Drop the cached connector for an agent
    pub fn evict(&self, agent_id: &str) -> bool {
        self.instances.remove(agent_id).is_some()
    }

    /// Number of cached connector instances
    pub fn cached_count(&self) -> usize {
        self.instances.len()
    }
}
