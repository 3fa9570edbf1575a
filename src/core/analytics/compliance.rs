//! External compliance scorer boundary

use super::types::ComplianceAssessment;
use async_trait::async_trait;

/// Compliance scoring failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    #[error("Compliance service unavailable: {0}")]
    Unavailable(String),

    #[error("Compliance service rejected the interaction: {0}")]
    Rejected(String),
}

/// Scores a completed interaction
///
/// Implemented by the surrounding application's compliance service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplianceScorer: Send + Sync {
    async fn analyze(&self, input: &str, output: &str) -> Result<ComplianceAssessment, ComplianceError>;
}
