//! Agent configuration records
//!
//! Agents are owned by the persistence collaborator and are read-only to the
//! routing core. Each agent names the backend type whose connector serves it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agent identifier (unique among all agents known to the load balancer)
pub type AgentId = String;

/// Capability tag that matches every request type
pub const ANY_CAPABILITY: &str = "*";

/// Backend type enumeration
///
/// Selects the connector factory used to build an agent's connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BackendType {
    /// OpenAI-compatible chat completions API
    #[serde(rename = "openai", alias = "open_ai")]
    OpenAi,
    /// Azure OpenAI deployments
    #[serde(rename = "azure", alias = "azure_openai")]
    Azure,
    /// Locally hosted model server (Ollama-style API)
    #[serde(rename = "local", alias = "ollama")]
    Local,
}

impl BackendType {
    /// All known backend types
    pub const ALL: [BackendType; 3] = [BackendType::OpenAi, BackendType::Azure, BackendType::Local];

    /// Stable string tag
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::OpenAi => "openai",
            BackendType::Azure => "azure",
            BackendType::Local => "local",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown backend type tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown backend type: {0}")]
pub struct UnknownBackendType(pub String);

impl FromStr for BackendType {
    type Err = UnknownBackendType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" | "open-ai" => Ok(BackendType::OpenAi),
            "azure" | "azure_openai" | "azure-openai" => Ok(BackendType::Azure),
            "local" | "ollama" => Ok(BackendType::Local),
            _ => Err(UnknownBackendType(s.to_string())),
        }
    }
}

/// Connection settings consumed by the backend connectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Base URL of the backend API
    pub endpoint: Option<String>,
    /// API key or token
    pub api_key: Option<String>,
    /// Model name sent to the backend
    pub model: Option<String>,
    /// Azure deployment name
    pub deployment: Option<String>,
    /// Azure API version
    pub api_version: Option<String>,
    /// Per-agent call timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Agent configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier
    pub id: AgentId,
    /// Human readable name
    #[serde(default)]
    pub name: Option<String>,
    /// Backend type selecting the connector implementation
    pub backend_type: BackendType,
    /// Disabled agents are never selected or retried into
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Selection priority (direction set by the router's priority order)
    #[serde(default)]
    pub priority: i32,
    /// Request types this agent serves, in declaration order
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Cost per unit of usage
    #[serde(default)]
    pub cost_per_unit: f64,
    /// Backend connection settings
    #[serde(default)]
    pub connection: ConnectionSettings,
}

fn default_enabled() -> bool {
    true
}

impl Agent {
    /// Create an enabled agent with default priority and no capabilities
    pub fn new(id: impl Into<AgentId>, backend_type: BackendType) -> Self {
        Self {
            id: id.into(),
            name: None,
            backend_type,
            enabled: true,
            priority: 0,
            capabilities: Vec::new(),
            cost_per_unit: 0.0,
            connection: ConnectionSettings::default(),
        }
    }

    /// Set the priority (builder pattern)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the capability tags (builder pattern)
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Set the enabled flag (builder pattern)
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the cost per unit (builder pattern)
    pub fn with_cost_per_unit(mut self, cost: f64) -> Self {
        self.cost_per_unit = cost;
        self
    }

    /// Set the connection settings (builder pattern)
    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Whether this agent can serve the given request type
    pub fn supports(&self, request_type: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c == request_type || c == ANY_CAPABILITY)
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
