//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `router_validators`: Router and analytics section validators
//! - `agent_validators`: Agent and user preference validators
//! - `tests`: Test suite for all validators

mod agent_validators;
mod router_validators;
mod trait_def;

pub use agent_validators::validate_agent_set;
pub use trait_def::Validate;
