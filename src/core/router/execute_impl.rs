//! Execution implementation for Router
//!
//! This module contains route_request, process_with_agent and the single
//! dispatch step both of them use.

use super::error::RouterError;
use super::execution::{
    AttemptHistory, DispatchError, DispatchOutcome, build_route_result, effective_timeout,
    interaction_record, logged_user_id,
};
use super::fallback::{AttemptFailure, FailoverRecord, RouteResult};
use super::router::Router;
use crate::core::connectors::{ConnectorError, ConnectorLookupError};
use crate::core::types::{Agent, AgentId, AgentRequest, ConnectorOutput, UserContext};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl Router {
    /// Route a request, resolving the user context from `request.user_id`
    pub async fn route(&self, request: &AgentRequest) -> Result<RouteResult, RouterError> {
        let user = match request.user_id.as_deref() {
            Some(user_id) => self.user_context(user_id).await?,
            None => UserContext::default(),
        };
        self.route_request(request, &user).await
    }

    /// Route a request with failover
    ///
    /// A request naming `target_agent` goes straight to that agent with no
    /// failover, exactly like [`Router::process_with_agent`].
    pub async fn route_request(
        &self,
        request: &AgentRequest,
        user: &UserContext,
    ) -> Result<RouteResult, RouterError> {
        self.route_request_with_cancellation(request, user, &CancellationToken::new())
            .await
    }

    /// Route a request, giving up as soon as `cancel` fires
    ///
    /// A cancelled attempt is not logged and never triggers failover.
    pub async fn route_request_with_cancellation(
        &self,
        request: &AgentRequest,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouterError> {
        if cancel.is_cancelled() {
            return Err(RouterError::Cancelled);
        }

        let user_id = logged_user_id(request, user);

        if let Some(target) = request.target_agent.as_deref() {
            return self
                .process_with_agent_inner(request, target, user_id.as_deref(), cancel)
                .await;
        }

        let started = Instant::now();
        let max_attempts = self.config.max_attempts();
        let mut history = AttemptHistory::default();
        let mut tried: Vec<AgentId> = Vec::with_capacity(max_attempts);

        let mut agent = self.load_balancer.select_agent(request, user).await?;
        info!(
            "Routing request {} ({}) to agent {}",
            request.request_id, request.request_type, agent.id
        );

        loop {
            tried.push(agent.id.clone());

            let error = match self.dispatch(request, &agent, user_id.as_deref(), cancel).await {
                Ok(outcome) => {
                    return Ok(build_route_result(request, &agent, outcome, history, started));
                }
                Err(DispatchError::Rejected(err)) => {
                    if !history.failures.is_empty() {
                        let earlier = history
                            .failures
                            .iter()
                            .map(|f| format!("{}: {}", f.agent_id, f.error))
                            .collect::<Vec<_>>()
                            .join("; ");
                        warn!(
                            "Request {} stopped at agent {} after earlier failures: {}",
                            request.request_id, agent.id, earlier
                        );
                    }
                    return Err(err);
                }
                Err(DispatchError::Connector(err)) => err,
            };

            warn!(
                "Agent {} failed request {} (attempt {}/{}): {}",
                agent.id,
                request.request_id,
                tried.len(),
                max_attempts,
                error
            );
            history.failures.push(AttemptFailure::new(agent.id.clone(), error.clone()));

            if tried.len() >= max_attempts {
                break;
            }

            let next = match self
                .load_balancer
                .select_failover_agent(request, user, &tried)
                .await
            {
                Ok(next) => next,
                Err(RouterError::NoEligibleAgent { .. }) => {
                    debug!("No failover agent left for request {}", request.request_id);
                    break;
                }
                Err(other) => return Err(other),
            };

            if cancel.is_cancelled() {
                info!(
                    "Request {} cancelled before failing over to {}",
                    request.request_id, next.id
                );
                return Err(RouterError::Cancelled);
            }

            let record = FailoverRecord::new(agent.id.clone(), next.id.clone(), error.to_string());
            info!(
                "Failing over request {} from {} to {}",
                request.request_id, record.from_agent, record.to_agent
            );
            self.analyzer.record_failover(record.clone());
            history.failovers.push(record);
            agent = next;
        }

        Err(history.into_error())
    }

    /// Dispatch to one named agent, bypassing selection and failover
    pub async fn process_with_agent(
        &self,
        request: &AgentRequest,
        agent_id: &str,
    ) -> Result<RouteResult, RouterError> {
        self.process_with_agent_inner(
            request,
            agent_id,
            request.user_id.as_deref(),
            &CancellationToken::new(),
        )
        .await
    }

    async fn process_with_agent_inner(
        &self,
        request: &AgentRequest,
        agent_id: &str,
        user_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouterError> {
        let agent = self
            .load_balancer
            .agents()
            .get_agent(agent_id)
            .await?
            .ok_or_else(|| RouterError::AgentNotFound(agent_id.to_string()))?;

        if !agent.enabled {
            return Err(RouterError::AgentDisabled(agent.id));
        }

        debug!(
            "Dispatching request {} to explicit agent {}",
            request.request_id, agent.id
        );
        let started = Instant::now();

        match self.dispatch(request, &agent, user_id, cancel).await {
            Ok(outcome) => Ok(build_route_result(
                request,
                &agent,
                outcome,
                AttemptHistory::default(),
                started,
            )),
            Err(DispatchError::Connector(source)) => Err(RouterError::Backend {
                agent_id: agent.id,
                source,
            }),
            Err(DispatchError::Rejected(err)) => Err(err),
        }
    }

    /// One attempt: resolve, validate, call under timeout, log
    async fn dispatch(
        &self,
        request: &AgentRequest,
        agent: &Agent,
        user_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        if cancel.is_cancelled() {
            return Err(DispatchError::Rejected(RouterError::Cancelled));
        }

        let connector = match self.connectors.connector_for(agent) {
            Ok(connector) => connector,
            Err(ConnectorLookupError::Unsupported(backend)) => {
                return Err(DispatchError::Rejected(RouterError::Configuration(format!(
                    "No connector registered for backend type {} (agent {})",
                    backend, agent.id
                ))));
            }
            Err(ConnectorLookupError::Creation(err)) => {
                self.log_attempt(request, agent, user_id, &Err(err.clone()), 0)
                    .await;
                return Err(DispatchError::Connector(err));
            }
        };

        if !connector.validate_request(request) {
            return Err(DispatchError::Rejected(RouterError::Validation {
                agent_id: agent.id.clone(),
                message: format!(
                    "Request of type {} rejected by {} connector",
                    request.request_type, agent.backend_type
                ),
            }));
        }

        let timeout = effective_timeout(request, agent, &self.config);
        let start = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Request {} cancelled while waiting on agent {}", request.request_id, agent.id);
                return Err(DispatchError::Rejected(RouterError::Cancelled));
            }
            result = tokio::time::timeout(timeout, connector.process(request)) => result,
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        let result: Result<ConnectorOutput, ConnectorError> = result.unwrap_or_else(|_| {
            Err(ConnectorError::timeout(
                agent.backend_type,
                format!("No response within {}ms", timeout.as_millis()),
            ))
        });

        self.log_attempt(request, agent, user_id, &result, latency_ms)
            .await;

        match result {
            Ok(output) => Ok(DispatchOutcome { output, latency_ms }),
            Err(err) => Err(DispatchError::Connector(err)),
        }
    }

    async fn log_attempt(
        &self,
        request: &AgentRequest,
        agent: &Agent,
        user_id: Option<&str>,
        result: &Result<ConnectorOutput, ConnectorError>,
        latency_ms: u64,
    ) {
        let record = interaction_record(
            request,
            agent,
            user_id.map(str::to_string),
            result,
            latency_ms,
        );
        self.analyzer.log_interaction(record).await;
    }
}
