//! Shared utilities
//!
//! Error types and logging setup used across the crate.

pub mod error;
pub mod logging;

pub use error::{GatewayError, Result};
pub use logging::{LogFormat, LoggingConfig, init_logging};
