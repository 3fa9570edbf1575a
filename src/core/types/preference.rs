//! Per-user agent policy

use super::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User agent preferences
///
/// The preferred agent is a tie-break, not an override: it is only honored
/// when it also passes the allow-list and exclusion filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreference {
    /// Agent to pick first when eligible
    pub preferred_agent: Option<AgentId>,
    /// Agents never selected for this user
    pub excluded_agents: BTreeSet<AgentId>,
    /// If non-empty, only these agents are eligible
    pub allowed_agents: BTreeSet<AgentId>,
}

impl UserPreference {
    /// Set the preferred agent (builder pattern)
    pub fn prefer(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.preferred_agent = Some(agent_id.into());
        self
    }

    /// Exclude an agent (builder pattern)
    pub fn exclude(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.excluded_agents.insert(agent_id.into());
        self
    }

    /// Add an agent to the allow-list (builder pattern)
    pub fn allow(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.allowed_agents.insert(agent_id.into());
        self
    }

    /// Whether the allow-list and exclusion set permit this agent
    pub fn permits(&self, agent_id: &str) -> bool {
        let allowed = self.allowed_agents.is_empty() || self.allowed_agents.contains(agent_id);
        allowed && !self.excluded_agents.contains(agent_id)
    }
}

/// Caller identity plus resolved preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    /// User identifier
    pub user_id: String,
    /// Preferences resolved for this user
    pub preference: UserPreference,
}

impl UserContext {
    /// Create a context with no preferences
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preference: UserPreference::default(),
        }
    }

    /// Attach preferences (builder pattern)
    pub fn with_preference(mut self, preference: UserPreference) -> Self {
        self.preference = preference;
        self
    }
}
