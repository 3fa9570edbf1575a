//! Agent selection methods for LoadBalancer

use super::core::LoadBalancer;
use crate::core::router::config::RoutingStrategy;
use crate::core::router::error::RouterError;
use crate::core::router::strategy_impl::{best_priority, round_robin};
use crate::core::types::{Agent, AgentId, AgentRequest, UserContext};
use tracing::debug;

/// Filter agents down to those eligible for a request
///
/// Keeps enabled agents whose capabilities cover the request type, that the
/// user's allow-list and exclusions permit, and that are not in `excluded`.
/// The result is ordered by id.
pub fn eligible_agents(
    agents: Vec<Agent>,
    request_type: &str,
    user: &UserContext,
    excluded: &[AgentId],
) -> Vec<Agent> {
    let mut eligible: Vec<Agent> = agents
        .into_iter()
        .filter(|a| a.enabled)
        .filter(|a| a.supports(request_type))
        .filter(|a| user.preference.permits(&a.id))
        .filter(|a| !excluded.contains(&a.id))
        .collect();
    eligible.sort_by(|a, b| a.id.cmp(&b.id));
    eligible
}

impl LoadBalancer {
    /// Select an agent for the request
    pub async fn select(
        &self,
        request: &AgentRequest,
        user: &UserContext,
    ) -> Result<AgentId, RouterError> {
        Ok(self.select_agent(request, user).await?.id)
    }

    /// Select an agent, returning the snapshot record used for the decision
    pub async fn select_agent(
        &self,
        request: &AgentRequest,
        user: &UserContext,
    ) -> Result<Agent, RouterError> {
        let snapshot = self.agents.list_enabled_agents().await?;
        let candidates = eligible_agents(snapshot, &request.request_type, user, &[]);

        if candidates.is_empty() {
            self.reset_cursor(&request.request_type);
            return Err(RouterError::NoEligibleAgent {
                request_type: request.request_type.clone(),
            });
        }

        if let Some(preferred) = user.preference.preferred_agent.as_deref() {
            if let Some(agent) = candidates.iter().find(|a| a.id == preferred) {
                debug!(
                    "Using preferred agent {} for user {}",
                    agent.id, user.user_id
                );
                return Ok(agent.clone());
            }
        }

        self.apply_strategy(&request.request_type, &candidates)
    }

    /// Run the configured strategy over a non-empty candidate set
    pub(crate) fn apply_strategy(
        &self,
        bucket: &str,
        candidates: &[Agent],
    ) -> Result<Agent, RouterError> {
        let selected = match self.strategy {
            RoutingStrategy::Priority => best_priority(candidates, self.priority_order),
            RoutingStrategy::RoundRobin => {
                round_robin(bucket, candidates, &self.round_robin_counters)
            }
        };

        let agent = selected.ok_or_else(|| RouterError::NoEligibleAgent {
            request_type: bucket.to_string(),
        })?;

        debug!(
            "Selected agent {} from {} candidate(s) using {} strategy",
            agent.id,
            candidates.len(),
            self.strategy
        );
        Ok(agent.clone())
    }
}
