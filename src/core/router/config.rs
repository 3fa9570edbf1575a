//! Router configuration types
//!
//! This module defines configuration types for the router including
//! routing strategies and router settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Routing strategy enumeration
///
/// Defines how the load balancer picks among the agents that survive
/// capability and user-policy filtering.
///
/// ## Strategies
///
/// - **Priority**: Best priority value wins, ties broken by agent id (default)
/// - **RoundRobin**: Rotate through the candidates, one cursor per request type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Deterministic priority selection
    #[default]
    Priority,
    /// Rotation over candidates ordered by id
    RoundRobin,
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoutingStrategy::Priority => "priority",
            RoutingStrategy::RoundRobin => "round_robin",
        })
    }
}

impl FromStr for RoutingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "priority" => Ok(RoutingStrategy::Priority),
            "round_robin" | "roundrobin" => Ok(RoutingStrategy::RoundRobin),
            other => Err(format!("Unknown routing strategy: {}", other)),
        }
    }
}

/// Which end of the priority scale is preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityOrder {
    /// Larger priority values win
    #[default]
    HighestFirst,
    /// Smaller priority values win
    LowestFirst,
}

impl FromStr for PriorityOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "highest_first" | "highest" => Ok(PriorityOrder::HighestFirst),
            "lowest_first" | "lowest" => Ok(PriorityOrder::LowestFirst),
            other => Err(format!("Unknown priority order: {}", other)),
        }
    }
}

/// Router configuration
///
/// ## Defaults
///
/// - `routing_strategy`: Priority
/// - `priority_order`: HighestFirst
/// - `max_failover_hops`: 1
/// - `timeout_secs`: 60
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Routing strategy to use for agent selection
    pub routing_strategy: RoutingStrategy,

    /// Priority direction for the Priority strategy
    pub priority_order: PriorityOrder,

    /// Failover hops after the first attempt (total attempts = 1 + hops)
    pub max_failover_hops: u32,

    /// Default dispatch timeout in seconds, used when neither the request
    /// nor the agent sets one
    pub timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routing_strategy: RoutingStrategy::Priority,
            priority_order: PriorityOrder::HighestFirst,
            max_failover_hops: 1,
            timeout_secs: 60,
        }
    }
}

impl RouterConfig {
    /// Maximum dispatch attempts per routed request
    pub fn max_attempts(&self) -> usize {
        1 + self.max_failover_hops as usize
    }
}
