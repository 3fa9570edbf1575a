//! Failover selection for LoadBalancer

use super::core::LoadBalancer;
use super::selection::eligible_agents;
use crate::core::router::error::RouterError;
use crate::core::types::{Agent, AgentId, AgentRequest, UserContext};
use tracing::debug;

impl LoadBalancer {
    /// Select a replacement agent after a failure
    ///
    /// Same filters as [`LoadBalancer::select`] minus the `excluded` agents.
    /// The user's preferred agent gets no special treatment here.
    pub async fn select_failover(
        &self,
        request: &AgentRequest,
        user: &UserContext,
        excluded: &[AgentId],
    ) -> Result<AgentId, RouterError> {
        Ok(self.select_failover_agent(request, user, excluded).await?.id)
    }

    pub async fn select_failover_agent(
        &self,
        request: &AgentRequest,
        user: &UserContext,
        excluded: &[AgentId],
    ) -> Result<Agent, RouterError> {
        let snapshot = self.agents.list_enabled_agents().await?;
        let candidates = eligible_agents(snapshot, &request.request_type, user, excluded);

        if candidates.is_empty() {
            debug!(
                "No failover candidate for {} after excluding {:?}",
                request.request_type, excluded
            );
            return Err(RouterError::NoEligibleAgent {
                request_type: request.request_type.clone(),
            });
        }

        self.apply_strategy(&request.request_type, &candidates)
    }
}
