//! Router configuration validators

use super::trait_def::Validate;
use crate::core::analytics::AnalyticsConfig;
use crate::core::router::RouterConfig;
use crate::utils::logging::LoggingConfig;
use tracing::debug;

impl Validate for RouterConfig {
    const SECTION: &'static str = "Router";

    fn validate(&self) -> Result<(), String> {
        debug!("Validating router configuration");

        if self.timeout_secs == 0 {
            return Err("Router timeout must be greater than 0".to_string());
        }

        if self.max_failover_hops > 16 {
            return Err(format!(
                "Router max_failover_hops must be at most 16, got {}",
                self.max_failover_hops
            ));
        }

        Ok(())
    }
}

impl Validate for AnalyticsConfig {
    const SECTION: &'static str = "Analytics";

    fn validate(&self) -> Result<(), String> {
        if self.failover_history_capacity > 1_000_000 {
            return Err(format!(
                "Failover history capacity must be at most 1000000, got {}",
                self.failover_history_capacity
            ));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    const SECTION: &'static str = "Logging";

    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
