//! Configuration management for the gateway
//!
//! This module handles loading, validation, and management of the router,
//! analytics and logging settings plus the agent and user seed data.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::analytics::AnalyticsConfig;
use crate::core::router::RouterConfig;
use crate::core::types::Agent;
use crate::storage::{InMemoryAgentStore, InMemoryPreferenceStore};
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Routing behaviour
    pub router: RouterConfig,
    /// Interaction logging and compliance scoring
    pub analytics: AnalyticsConfig,
    pub logging: LoggingConfig,
    /// Agent records seeded into the in-memory agent store
    pub agents: Vec<Agent>,
    /// Per-user routing preferences
    pub users: Vec<UserPreferenceEntry>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.router.check()?;
        self.analytics.check()?;
        self.logging.check()?;

        validation::validate_agent_set(&self.agents).map_err(|e| {
            GatewayError::Config(format!("{} config error: {}", Agent::SECTION, e))
        })?;

        for user in &self.users {
            user.check()?;
        }

        Ok(())
    }

    /// Agent store seeded with the configured agents
    pub fn agent_store(&self) -> InMemoryAgentStore {
        InMemoryAgentStore::with_agents(self.agents.iter().cloned())
    }

    /// Preference store seeded with the configured users
    pub fn preference_store(&self) -> InMemoryPreferenceStore {
        let store = InMemoryPreferenceStore::new();
        for entry in &self.users {
            store.set(entry.user_id.clone(), entry.preference.clone());
        }
        store
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
