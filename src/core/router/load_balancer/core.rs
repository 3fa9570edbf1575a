//! Core LoadBalancer struct and basic methods

use crate::core::router::config::{PriorityOrder, RoutingStrategy};
use crate::storage::AgentRepository;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};
use tracing::info;

/// Load balancer for agent selection
///
/// Holds no agent state of its own: every selection starts from a fresh
/// snapshot of the agent repository.
pub struct LoadBalancer {
    /// Agent configuration source
    pub(crate) agents: Arc<dyn AgentRepository>,
    /// Selection strategy
    pub(crate) strategy: RoutingStrategy,
    /// Priority direction for the Priority strategy
    pub(crate) priority_order: PriorityOrder,
    /// Round-robin cursors, one per request type
    pub(crate) round_robin_counters: DashMap<String, AtomicUsize>,
}

impl fmt::Debug for LoadBalancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadBalancer")
            .field("strategy", &self.strategy)
            .field("priority_order", &self.priority_order)
            .field("buckets", &self.round_robin_counters.len())
            .finish()
    }
}

impl LoadBalancer {
    /// Create a new load balancer
    pub fn new(agents: Arc<dyn AgentRepository>, strategy: RoutingStrategy) -> Self {
        info!("Creating load balancer with strategy: {}", strategy);
        Self {
            agents,
            strategy,
            priority_order: PriorityOrder::default(),
            round_robin_counters: DashMap::new(),
        }
    }

    /// Set the priority direction (builder pattern)
    pub fn with_priority_order(mut self, order: PriorityOrder) -> Self {
        self.priority_order = order;
        self
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    pub fn priority_order(&self) -> PriorityOrder {
        self.priority_order
    }

    /// Agent repository backing this load balancer
    pub fn agents(&self) -> &Arc<dyn AgentRepository> {
        &self.agents
    }

    /// Current cursor value for a bucket, if the bucket exists
    pub fn round_robin_cursor(&self, bucket: &str) -> Option<usize> {
        self.round_robin_counters
            .get(bucket)
            .map(|c| c.load(Relaxed))
    }

    /// Drop a bucket's cursor so rotation restarts from the first candidate
    pub(crate) fn reset_cursor(&self, bucket: &str) {
        if self.round_robin_counters.remove(bucket).is_some() {
            tracing::debug!("Reset round-robin cursor for bucket {}", bucket);
        }
    }
}
