//! Request router for AI agent backends
//!
//! Selects an agent for each request, dispatches it through the agent's
//! connector, logs every attempt and fails over on backend errors.
//!
//! ## Module Structure
//!
//! - `config` - Router configuration and routing strategy definitions
//! - `error` - Router error types
//! - `fallback` - Failover records and route results
//! - `load_balancer` - Eligibility filtering and agent selection
//! - `router` - Core Router struct and builder
//! - `strategy_impl` - Priority and round-robin strategies
//! - `execution` - Execution helpers shared by the dispatch paths
//! - `execute_impl` - route_request and process_with_agent

pub mod config;
pub mod error;
pub mod execute_impl;
pub mod execution;
pub mod fallback;
pub mod load_balancer;
pub mod router;
pub mod strategy_impl;

#[cfg(test)]
mod tests;

pub use config::{PriorityOrder, RouterConfig, RoutingStrategy};
pub use error::RouterError;
pub use fallback::{AttemptFailure, FailoverRecord, RouteResult};
pub use load_balancer::{LoadBalancer, eligible_agents};
pub use router::{AgentConnectionStatus, Router, RouterBuilder};
