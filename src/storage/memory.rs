//! In-memory repositories
//!
//! Locks are held only for the copy in or out; callers aggregate outside
//! the critical section.

use super::{AgentRepository, LogRepository, PreferenceRepository};
use crate::core::analytics::{ComplianceAssessment, InteractionLog, InteractionRecord, LogFilter, LogId};
use crate::core::types::{Agent, AgentId, UserPreference};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Agent store keyed by id
///
/// Keying on id keeps agent ids unique: inserting an existing id replaces it.
#[derive(Debug, Default)]
pub struct InMemoryAgentStore {
    agents: RwLock<BTreeMap<AgentId, Agent>>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let store = Self::new();
        for agent in agents {
            store.upsert(agent);
        }
        store
    }

    /// Insert or replace an agent, returning the previous record
    pub fn upsert(&self, agent: Agent) -> Option<Agent> {
        self.agents.write().insert(agent.id.clone(), agent)
    }

    pub fn remove(&self, id: &str) -> Option<Agent> {
        self.agents.write().remove(id)
    }

    /// Toggle an agent; returns false if the id is unknown
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        match self.agents.write().get_mut(id) {
            Some(agent) => {
                agent.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn set_priority(&self, id: &str, priority: i32) -> bool {
        match self.agents.write().get_mut(id) {
            Some(agent) => {
                agent.priority = priority;
                true
            }
            None => false,
        }
    }

    /// All agents, enabled or not, ordered by id
    pub fn all(&self) -> Vec<Agent> {
        self.agents.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentStore {
    async fn list_enabled_agents(&self) -> Result<Vec<Agent>> {
        Ok(self
            .agents
            .read()
            .values()
            .filter(|a| a.enabled)
            .cloned()
            .collect())
    }

    async fn get_agent(&self, id: &str) -> Result<Option<Agent>> {
        Ok(self.agents.read().get(id).cloned())
    }
}

/// Append-only interaction log
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    logs: RwLock<Vec<InteractionLog>>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.read().is_empty()
    }

    /// Copy of every entry, in append order
    pub fn snapshot(&self) -> Vec<InteractionLog> {
        self.logs.read().clone()
    }
}

#[async_trait]
impl LogRepository for InMemoryLogStore {
    async fn append_log(&self, record: InteractionRecord) -> Result<LogId> {
        let mut logs = self.logs.write();
        // Ids are 1-based positions; entries are never removed
        let log_id = logs.len() as LogId + 1;
        logs.push(InteractionLog {
            log_id,
            record,
            compliance: None,
        });
        Ok(log_id)
    }

    async fn query_logs(&self, filter: &LogFilter) -> Result<Vec<InteractionLog>> {
        Ok(self
            .logs
            .read()
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect())
    }

    async fn record_compliance(&self, log_id: LogId, assessment: ComplianceAssessment) -> Result<()> {
        let mut logs = self.logs.write();
        let index = (log_id as usize)
            .checked_sub(1)
            .filter(|i| *i < logs.len())
            .ok_or_else(|| GatewayError::storage(format!("Unknown log id: {}", log_id)))?;
        logs[index].compliance = Some(assessment);
        Ok(())
    }
}

/// Preference store keyed by user id
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    preferences: RwLock<HashMap<String, UserPreference>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: impl Into<String>, preference: UserPreference) {
        self.preferences.write().insert(user_id.into(), preference);
    }

    pub fn remove(&self, user_id: &str) -> Option<UserPreference> {
        self.preferences.write().remove(user_id)
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceStore {
    async fn get_user_preferences(&self, user_id: &str) -> Result<UserPreference> {
        Ok(self
            .preferences
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
