//! Agent configuration validators

use super::trait_def::Validate;
use crate::config::models::UserPreferenceEntry;
use crate::core::types::{Agent, BackendType};
use std::collections::HashSet;

impl Validate for Agent {
    const SECTION: &'static str = "Agent";

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Agent id cannot be empty".to_string());
        }

        if self.capabilities.is_empty() {
            return Err(format!("Agent {} declares no capabilities", self.id));
        }

        if !self.cost_per_unit.is_finite() || self.cost_per_unit < 0.0 {
            return Err(format!(
                "Agent {} has invalid cost_per_unit: {}",
                self.id, self.cost_per_unit
            ));
        }

        if let Some(endpoint) = self.connection.endpoint.as_deref() {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(format!(
                    "Agent {} endpoint must use http:// or https://, got: {}",
                    self.id, endpoint
                ));
            }
        }

        if self.connection.timeout_secs == Some(0) {
            return Err(format!("Agent {} timeout must be greater than 0", self.id));
        }

        if self.backend_type == BackendType::Azure && self.connection.endpoint.is_none() {
            return Err(format!("Azure agent {} requires an endpoint", self.id));
        }

        Ok(())
    }
}

impl Validate for UserPreferenceEntry {
    const SECTION: &'static str = "User";

    fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("User id cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Validate each agent and reject duplicate ids
pub fn validate_agent_set(agents: &[Agent]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for agent in agents {
        agent.validate()?;
        if !seen.insert(agent.id.as_str()) {
            return Err(format!("Duplicate agent id: {}", agent.id));
        }
    }
    Ok(())
}
