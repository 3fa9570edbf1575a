//! Storage layer for the gateway
//!
//! The routing core reads agents and user preferences and writes
//! interaction logs through these traits. The surrounding application owns
//! the real persistence; `memory` provides in-process implementations.

pub mod memory;

pub use memory::{InMemoryAgentStore, InMemoryLogStore, InMemoryPreferenceStore};

use crate::core::analytics::{ComplianceAssessment, InteractionLog, InteractionRecord, LogFilter, LogId};
use crate::core::types::{Agent, UserPreference};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Agent configuration source
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Snapshot of all enabled agents
    async fn list_enabled_agents(&self) -> Result<Vec<Agent>>;

    /// Look up one agent regardless of its enabled flag
    async fn get_agent(&self, id: &str) -> Result<Option<Agent>>;
}

/// Interaction log sink
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Append an entry and return its id
    async fn append_log(&self, record: InteractionRecord) -> Result<LogId>;

    /// Entries matching the filter, in append order
    async fn query_logs(&self, filter: &LogFilter) -> Result<Vec<InteractionLog>>;

    /// Attach a compliance assessment to an existing entry
    async fn record_compliance(&self, log_id: LogId, assessment: ComplianceAssessment) -> Result<()>;
}

/// User preference source
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Preferences for a user; unknown users get the default (no policy)
    async fn get_user_preferences(&self, user_id: &str) -> Result<UserPreference>;
}
