//! # agent-gateway
//!
//! Request-routing core for AI agent backends.
//!
//! ## Features
//!
//! - **Capability and policy aware selection**: Only enabled agents that serve
//!   the request type and that the user's preferences permit are considered
//! - **Routing strategies**: Deterministic priority or per-request-type round-robin
//! - **Pluggable connectors**: OpenAI-compatible, Azure OpenAI and local
//!   (Ollama-style) adapters behind one `Connector` trait
//! - **Bounded failover**: Backend failures move the request to another
//!   eligible agent, with a record of every hop
//! - **Usage analytics**: Every attempt is logged; usage, compliance and
//!   per-user behaviour reports are derived from the log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_gateway::{AgentRequest, Config, Router};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/agent-gateway.yaml").await?;
//!     let router = Router::builder(Arc::new(config.agent_store()))
//!         .preferences(Arc::new(config.preference_store()))
//!         .config(config.router.clone())
//!         .build()
//!         .await?;
//!
//!     let result = router.route(&AgentRequest::text("Hello").with_user("alice")).await?;
//!     println!("{} answered: {}", result.agent_used, result.output);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::analytics::{
    AnalyticsConfig, ComplianceMode, ComplianceScorer, InteractionLog, InteractionRecord,
    LogFilter, UsageAnalyzer, UsageReport,
};
pub use core::connectors::{
    ConnectionTest, Connector, ConnectorError, ConnectorFactory, ConnectorRegistry,
};
pub use core::router::{
    FailoverRecord, LoadBalancer, RouteResult, Router, RouterBuilder, RouterConfig, RouterError,
    RoutingStrategy,
};
pub use core::types::{
    Agent, AgentId, AgentRequest, BackendType, ConnectorOutput, TokenUsage, UserContext,
    UserPreference,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information captured by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
