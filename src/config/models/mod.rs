//! Configuration data models
//!
//! Section types owned by other modules (router, analytics, logging, agents)
//! are used directly; this module holds the shapes that only exist in the
//! configuration file.

pub mod users;

pub use users::*;

/// Default environment variable prefix
pub fn default_env_prefix() -> &'static str {
    "AGENT_GATEWAY"
}
