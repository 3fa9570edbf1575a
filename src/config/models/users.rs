//! Per-user routing preferences

use crate::core::types::UserPreference;
use serde::{Deserialize, Serialize};

/// One `users:` entry in the configuration file
///
/// ```yaml
/// users:
///   - user_id: alice
///     preferred_agent: gpt4
///     excluded_agents: [local-llama]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferenceEntry {
    pub user_id: String,
    #[serde(flatten)]
    pub preference: UserPreference,
}

impl UserPreferenceEntry {
    pub fn new(user_id: impl Into<String>, preference: UserPreference) -> Self {
        Self {
            user_id: user_id.into(),
            preference,
        }
    }
}
