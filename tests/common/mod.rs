//! Common test utilities for agent-gateway
//!
//! - Agent fixtures pointing at mock backends
//! - Mock OpenAI-compatible and local model servers

pub mod fixtures;

pub use fixtures::{AgentFactory, MockBackend};
