//! Core domain types
//!
//! Agents, routing requests, user preferences and connector outputs.

pub mod agent;
pub mod preference;
pub mod request;
pub mod response;

pub use agent::{ANY_CAPABILITY, Agent, AgentId, BackendType, ConnectionSettings, UnknownBackendType};
pub use preference::{UserContext, UserPreference};
pub use request::{AgentRequest, Payload};
pub use response::{ConnectorOutput, TokenUsage};
