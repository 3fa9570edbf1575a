//! Configuration loading utilities
//!
//! Environment overrides read `AGENT_GATEWAY_*` variables through a lookup
//! function so they can be exercised without touching the process
//! environment.

use super::Config;
use super::models::default_env_prefix;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::LogFormat;
use std::str::FromStr;
use tracing::debug;

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| GatewayError::Config(format!("Invalid {}: {}", key, e)))
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.trim().to_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(GatewayError::Config(format!("Invalid log format: {}", other))),
    }
}

impl Config {
    /// Apply `AGENT_GATEWAY_*` overrides on top of this configuration
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = default_env_prefix();
        let var = |key: &str| lookup(&format!("{}_{}", prefix, key));

        if let Some(value) = var("ROUTING_STRATEGY") {
            self.router.routing_strategy = parse("routing strategy", &value)?;
        }
        if let Some(value) = var("PRIORITY_ORDER") {
            self.router.priority_order = parse("priority order", &value)?;
        }
        if let Some(value) = var("MAX_FAILOVER_HOPS") {
            self.router.max_failover_hops = parse("max failover hops", &value)?;
        }
        if let Some(value) = var("TIMEOUT_SECS") {
            self.router.timeout_secs = parse("timeout", &value)?;
        }
        if let Some(value) = var("COMPLIANCE_MODE") {
            self.analytics.compliance_mode = parse("compliance mode", &value)?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = var("LOG_FORMAT") {
            self.logging.format = parse_log_format(&value)?;
        }

        debug!("Applied environment overrides");
        Ok(())
    }
}
