//! Load balancer for agent selection
//!
//! Filters the enabled agents by capability and user policy, then applies
//! the configured routing strategy. Also performs failover selection that
//! excludes agents already tried.

mod core;
mod failover_selection;
mod selection;

pub use self::core::LoadBalancer;
pub use selection::eligible_agents;
