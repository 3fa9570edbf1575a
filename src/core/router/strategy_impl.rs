//! Routing strategy implementations
//!
//! Both strategies take the already-filtered candidate set. An empty set
//! yields `None`; the caller turns that into `NoEligibleAgent`.

use super::config::PriorityOrder;
use crate::core::types::Agent;
use dashmap::DashMap;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

/// Select the agent with the best priority
///
/// Ties are broken by ascending agent id, so the result is deterministic for
/// a given candidate set.
pub fn best_priority(candidates: &[Agent], order: PriorityOrder) -> Option<&Agent> {
    candidates.iter().min_by(|a, b| compare_priority(a, b, order))
}

/// Ordering where `Less` means "preferred"
pub fn compare_priority(a: &Agent, b: &Agent, order: PriorityOrder) -> Ordering {
    let by_priority = match order {
        PriorityOrder::HighestFirst => b.priority.cmp(&a.priority),
        PriorityOrder::LowestFirst => a.priority.cmp(&b.priority),
    };
    by_priority.then_with(|| a.id.cmp(&b.id))
}

/// Select the next agent in rotation for a bucket
///
/// `candidates` must be ordered by id. The bucket cursor is created on first
/// use and advanced atomically, so concurrent callers each see a distinct
/// cursor value.
pub fn round_robin<'a>(
    bucket: &str,
    candidates: &'a [Agent],
    round_robin_counters: &DashMap<String, AtomicUsize>,
) -> Option<&'a Agent> {
    if candidates.is_empty() {
        return None;
    }

    // The shard read guard must be released before `entry` takes the write lock
    let existing = round_robin_counters
        .get(bucket)
        .map(|counter| counter.fetch_add(1, Relaxed));
    let index = match existing {
        Some(index) => index,
        None => round_robin_counters
            .entry(bucket.to_string())
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Relaxed),
    };

    candidates.get(index % candidates.len())
}
