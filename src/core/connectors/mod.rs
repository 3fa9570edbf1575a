//! Backend connectors
//!
//! A connector adapts one backend family (OpenAI-compatible, Azure, local
//! model server) to the routing core. Connectors are built per agent by a
//! [`ConnectorFactory`] registered against a [`BackendType`] in the
//! [`ConnectorRegistry`].
//!
//! ## Module Structure
//!
//! - `error` - Connector error taxonomy and HTTP status mapping
//! - `registry` - Backend type to factory mapping and per-agent instance cache
//! - `shared` - HTTP client and chat-completion helpers shared by the adapters
//! - `openai`, `azure`, `local` - Shipped adapters

pub mod azure;
pub mod error;
pub mod local;
pub mod openai;
pub mod registry;
pub mod shared;

pub use azure::{AzureConnector, AzureFactory};
pub use error::{ConnectorError, ConnectorErrorKind};
pub use local::{LocalConnector, LocalFactory};
pub use openai::{OpenAiConnector, OpenAiFactory};
pub use registry::{ConnectorLookupError, ConnectorRegistry};

use crate::core::types::{Agent, AgentRequest, BackendType, ConnectorOutput};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Result of a connectivity self-test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTest {
    /// Whether the backend answered as expected
    pub ok: bool,
    /// Human readable detail
    pub message: String,
    /// Round-trip time of the probe
    pub latency_ms: u64,
}

impl ConnectionTest {
    pub fn success(message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            ok: true,
            message: message.into(),
            latency_ms,
        }
    }

    pub fn failure(message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            ok: false,
            message: message.into(),
            latency_ms,
        }
    }
}

/// Backend adapter
///
/// Implementations must be cheap to share (`Arc<dyn Connector>`) and safe to
/// call concurrently from many routing tasks.
#[async_trait]
pub trait Connector: Send + Sync + Debug {
    /// Backend family this connector speaks to
    fn backend_type(&self) -> BackendType;

    /// Cheap structural check of the request
    ///
    /// # Returns
    /// `false` if the request is malformed for this backend. The router then
    /// fails fast with a validation error and never calls [`Connector::process`].
    fn validate_request(&self, request: &AgentRequest) -> bool;

    /// Execute the request against the backend
    ///
    /// # Note
    /// Never retries internally. Retrying on another backend is the router's job.
    async fn process(&self, request: &AgentRequest) -> Result<ConnectorOutput, ConnectorError>;

    /// Probe backend connectivity (admin and health checks only)
    async fn test_connection(&self) -> ConnectionTest;
}

/// Builds a connector for one agent
pub trait ConnectorFactory: Send + Sync + Debug {
    /// Create a connector from the agent's connection settings
    fn create(&self, agent: &Agent) -> Result<Arc<dyn Connector>, ConnectorError>;
}
