//! Usage recommendations

use super::types::{Recommendation, RecommendationLevel, UserBehaviorReport};

/// Rule check: returns a message when the rule fires
pub type RuleCheck = fn(&UserBehaviorReport) -> Option<String>;

/// Recommendation rule
#[derive(Debug, Clone)]
pub struct UsageRule {
    /// Rule name
    pub name: &'static str,
    /// Level attached to the recommendation
    pub level: RecommendationLevel,
    /// Condition and message
    pub check: RuleCheck,
}

/// Produces recommendations from a user's behavior report
#[derive(Debug, Clone)]
pub struct UsageOptimizer {
    rules: Vec<UsageRule>,
}

impl Default for UsageOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageOptimizer {
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    /// Optimizer with a custom rule set
    pub fn with_rules(rules: Vec<UsageRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[UsageRule] {
        &self.rules
    }

    /// Evaluate every rule, most severe first
    pub fn recommend(&self, report: &UserBehaviorReport) -> Vec<Recommendation> {
        let mut out: Vec<_> = self
            .rules
            .iter()
            .filter_map(|rule| {
                (rule.check)(report).map(|message| Recommendation {
                    rule: rule.name.to_string(),
                    level: rule.level,
                    message,
                })
            })
            .collect();
        out.sort_by(|a, b| b.level.cmp(&a.level));
        out
    }

    fn default_rules() -> Vec<UsageRule> {
        vec![
            UsageRule {
                name: "no_activity",
                level: RecommendationLevel::Info,
                check: |r| {
                    (r.total_interactions == 0)
                        .then(|| "No interactions recorded for this user".to_string())
                },
            },
            UsageRule {
                name: "non_compliant_content",
                level: RecommendationLevel::Critical,
                check: |r| {
                    (r.non_compliant_count > 0).then(|| {
                        format!(
                            "{} interaction(s) were flagged as non-compliant; review usage policy with the user",
                            r.non_compliant_count
                        )
                    })
                },
            },
            UsageRule {
                name: "high_failure_rate",
                level: RecommendationLevel::Warning,
                check: |r| {
                    let failures = r.total_interactions - r.success_count;
                    (r.total_interactions >= 4 && failures * 4 > r.total_interactions).then(|| {
                        format!(
                            "{} of {} requests failed; check agent health or the user's request payloads",
                            failures, r.total_interactions
                        )
                    })
                },
            },
            UsageRule {
                name: "single_agent_dependency",
                level: RecommendationLevel::Info,
                check: |r| {
                    (r.total_interactions >= 10 && r.per_agent.len() == 1).then(|| {
                        "All requests were served by one agent; allow more agents so failover has somewhere to go"
                            .to_string()
                    })
                },
            },
            UsageRule {
                name: "heavy_token_usage",
                level: RecommendationLevel::Info,
                check: |r| {
                    let avg = r.total_tokens.checked_div(r.total_interactions).unwrap_or(0);
                    (avg > 4000).then(|| {
                        format!(
                            "Average of {} tokens per request; consider shorter prompts or summarizing context",
                            avg
                        )
                    })
                },
            },
        ]
    }
}
