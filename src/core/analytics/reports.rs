//! Report aggregation
//!
//! Pure functions over log snapshots. The analyzer fetches the entries and
//! aggregates here, outside any store lock.

use super::types::{ComplianceReport, InteractionLog, UsageReport, UserBehaviorReport};
use chrono::Utc;
use std::collections::BTreeMap;

/// Aggregate usage per agent
pub fn usage_report(logs: &[InteractionLog]) -> UsageReport {
    let mut report = UsageReport {
        generated_at: Utc::now(),
        ..Default::default()
    };
    let mut latency_sums = BTreeMap::<&str, u64>::new();

    for log in logs {
        let r = &log.record;
        report.total_interactions += 1;
        report.total_tokens += r.total_tokens();
        report.total_cost += r.cost;

        let stats = report.per_agent.entry(r.agent_id.clone()).or_default();
        stats.total_interactions += 1;
        stats.input_tokens += r.input_tokens as u64;
        stats.output_tokens += r.output_tokens as u64;
        stats.total_cost += r.cost;
        *latency_sums.entry(r.agent_id.as_str()).or_default() += r.latency_ms;

        if r.success {
            report.success_count += 1;
            stats.success_count += 1;
        } else {
            report.failure_count += 1;
            stats.failure_count += 1;
        }
    }

    for (agent_id, stats) in report.per_agent.iter_mut() {
        let sum = latency_sums.get(agent_id.as_str()).copied().unwrap_or(0);
        stats.avg_latency_ms = average(sum as f64, stats.total_interactions);
    }

    report
}

/// Aggregate compliance assessments
pub fn compliance_report(logs: &[InteractionLog]) -> ComplianceReport {
    let mut report = ComplianceReport {
        total_interactions: logs.len() as u64,
        generated_at: Utc::now(),
        ..Default::default()
    };
    let mut score_sum = 0.0;

    for assessment in logs.iter().filter_map(|l| l.compliance.as_ref()) {
        report.analyzed_count += 1;
        score_sum += assessment.score;
        if assessment.is_compliant {
            report.compliant_count += 1;
        }
        *report
            .per_category
            .entry(assessment.category.clone())
            .or_default() += 1;
    }

    if report.analyzed_count > 0 {
        report.compliance_rate = report.compliant_count as f64 / report.analyzed_count as f64;
        report.average_score = Some(average(score_sum, report.analyzed_count));
    }

    report
}

/// Per-user breakdown, without recommendations
pub fn user_behavior(user_id: &str, logs: &[InteractionLog]) -> UserBehaviorReport {
    let mut report = UserBehaviorReport {
        user_id: user_id.to_string(),
        ..Default::default()
    };

    for log in logs {
        let r = &log.record;
        report.total_interactions += 1;
        report.total_tokens += r.total_tokens();
        if r.success {
            report.success_count += 1;
        }
        *report.per_category.entry(r.request_type.clone()).or_default() += 1;
        *report.per_agent.entry(r.agent_id.clone()).or_default() += 1;
        if log.compliance.as_ref().is_some_and(|c| !c.is_compliant) {
            report.non_compliant_count += 1;
        }
    }

    report
}

fn average(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
