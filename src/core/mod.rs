//! Core functionality for the gateway
//!
//! - `types` - Agents, requests, user preferences and connector output
//! - `connectors` - Backend adapters and the connector registry
//! - `router` - Load balancer, routing and failover
//! - `analytics` - Interaction logging, compliance scoring and reports

pub mod analytics;
pub mod connectors;
pub mod router;
pub mod types;
