//! Usage and compliance analyzer

use super::compliance::ComplianceScorer;
use super::config::{AnalyticsConfig, ComplianceMode};
use super::optimizer::UsageOptimizer;
use super::reports;
use super::types::{
    ComplianceReport, InteractionRecord, LogFilter, LogId, UsageReport, UserBehaviorReport,
};
use crate::core::router::FailoverRecord;
use crate::storage::LogRepository;
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use tracing::{debug, error, info, warn};

/// Records interactions and answers reporting queries
///
/// Logging never fails the caller: repository errors are counted and
/// swallowed. Compliance scoring is best-effort; a failed score leaves the
/// entry unanalyzed for [`UsageAnalyzer::analyze_pending`].
pub struct UsageAnalyzer {
    logs: Arc<dyn LogRepository>,
    scorer: Option<Arc<dyn ComplianceScorer>>,
    config: AnalyticsConfig,
    optimizer: UsageOptimizer,
    failovers: Mutex<VecDeque<FailoverRecord>>,
    log_errors: AtomicU64,
    compliance_errors: Arc<AtomicU64>,
}

impl fmt::Debug for UsageAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageAnalyzer")
            .field("config", &self.config)
            .field("has_scorer", &self.scorer.is_some())
            .field("log_errors", &self.log_error_count())
            .field("compliance_errors", &self.compliance_error_count())
            .finish()
    }
}

impl UsageAnalyzer {
    /// Create an analyzer writing to the given log repository
    pub fn new(logs: Arc<dyn LogRepository>, config: AnalyticsConfig) -> Self {
        Self {
            logs,
            scorer: None,
            config,
            optimizer: UsageOptimizer::new(),
            failovers: Mutex::new(VecDeque::new()),
            log_errors: AtomicU64::new(0),
            compliance_errors: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Attach a compliance scorer (builder pattern)
    pub fn with_scorer(mut self, scorer: Arc<dyn ComplianceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Replace the recommendation rules (builder pattern)
    pub fn with_optimizer(mut self, optimizer: UsageOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Append one interaction
    ///
    /// Returns `None` when the repository rejected the entry.
    pub async fn log_interaction(&self, record: InteractionRecord) -> Option<LogId> {
        let scoring_input = self.scoring_input(&record);
        let agent_id = record.agent_id.clone();

        let log_id = match self.logs.append_log(record).await {
            Ok(id) => id,
            Err(e) => {
                self.log_errors.fetch_add(1, Relaxed);
                error!("Failed to log interaction for agent {}: {}", agent_id, e);
                return None;
            }
        };

        debug!("Logged interaction {} for agent {}", log_id, agent_id);

        if let (Some(scorer), Some((input, output))) = (self.scorer.clone(), scoring_input) {
            match self.config.compliance_mode {
                ComplianceMode::Off => {}
                ComplianceMode::Inline => {
                    score_entry(&*self.logs, &*scorer, &self.compliance_errors, log_id, &input, &output)
                        .await;
                }
                ComplianceMode::Background => match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        let logs = self.logs.clone();
                        let errors = self.compliance_errors.clone();
                        handle.spawn(async move {
                            score_entry(&*logs, &*scorer, &errors, log_id, &input, &output).await;
                        });
                    }
                    Err(_) => {
                        warn!("No runtime for background compliance scoring; entry {} left unanalyzed", log_id);
                    }
                },
            }
        }

        Some(log_id)
    }

    /// Score every successful entry that has no assessment yet
    ///
    /// Returns the number of entries newly analyzed.
    pub async fn analyze_pending(&self) -> Result<usize> {
        let Some(scorer) = self.scorer.clone() else {
            return Ok(0);
        };

        let filter = LogFilter {
            success: Some(true),
            ..Default::default()
        };
        let pending: Vec<_> = self
            .logs
            .query_logs(&filter)
            .await?
            .into_iter()
            .filter(|log| !log.is_analyzed())
            .collect();

        let mut analyzed = 0;
        for log in &pending {
            let output = log.record.output_text.as_deref().unwrap_or_default();
            if score_entry(
                &*self.logs,
                &*scorer,
                &self.compliance_errors,
                log.log_id,
                &log.record.input_text,
                output,
            )
            .await
            {
                analyzed += 1;
            }
        }

        info!("Compliance backfill analyzed {} of {} pending entries", analyzed, pending.len());
        Ok(analyzed)
    }

    pub async fn generate_usage_report(&self, filter: &LogFilter) -> Result<UsageReport> {
        let logs = self.logs.query_logs(filter).await?;
        Ok(reports::usage_report(&logs))
    }

    pub async fn generate_compliance_report(&self, filter: &LogFilter) -> Result<ComplianceReport> {
        let logs = self.logs.query_logs(filter).await?;
        Ok(reports::compliance_report(&logs))
    }

    /// Breakdown of one user's interactions plus recommendations
    pub async fn analyze_user_behavior(&self, user_id: &str) -> Result<UserBehaviorReport> {
        let logs = self.logs.query_logs(&LogFilter::for_user(user_id)).await?;
        let mut report = reports::user_behavior(user_id, &logs);
        report.recommendations = self.optimizer.recommend(&report);
        Ok(report)
    }

    /// Remember a failover event, evicting the oldest beyond capacity
    pub fn record_failover(&self, record: FailoverRecord) {
        let capacity = self.config.failover_history_capacity;
        if capacity == 0 {
            return;
        }
        let mut ring = self.failovers.lock();
        while ring.len() >= capacity {
            ring.pop_front();
        }
        ring.push_back(record);
    }

    /// Recent failover events, oldest first
    pub fn failover_records(&self) -> Vec<FailoverRecord> {
        self.failovers.lock().iter().cloned().collect()
    }

    /// Interactions the repository failed to store
    pub fn log_error_count(&self) -> u64 {
        self.log_errors.load(Relaxed)
    }

    /// Failed compliance scoring calls
    pub fn compliance_error_count(&self) -> u64 {
        self.compliance_errors.load(Relaxed)
    }

    fn scoring_input(&self, record: &InteractionRecord) -> Option<(String, String)> {
        if self.scorer.is_none() || self.config.compliance_mode == ComplianceMode::Off || !record.success {
            return None;
        }
        Some((
            record.input_text.clone(),
            record.output_text.clone().unwrap_or_default(),
        ))
    }
}

/// Score one entry and store the assessment; false on any failure
async fn score_entry(
    logs: &dyn LogRepository,
    scorer: &dyn ComplianceScorer,
    errors: &AtomicU64,
    log_id: LogId,
    input: &str,
    output: &str,
) -> bool {
    let assessment = match scorer.analyze(input, output).await {
        Ok(a) => a,
        Err(e) => {
            errors.fetch_add(1, Relaxed);
            warn!("Compliance scoring failed for log {}: {}", log_id, e);
            return false;
        }
    };

    if !assessment.is_compliant {
        warn!(
            "Interaction {} flagged non-compliant (category: {}, score: {:.2})",
            log_id, assessment.category, assessment.score
        );
    }

    match logs.record_compliance(log_id, assessment).await {
        Ok(()) => true,
        Err(e) => {
            errors.fetch_add(1, Relaxed);
            error!("Failed to store compliance result for log {}: {}", log_id, e);
            false
        }
    }
}
