//! Analytics configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When completed interactions are sent to the compliance scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceMode {
    /// Never score
    #[default]
    Off,
    /// Score before `log_interaction` returns
    Inline,
    /// Score on a spawned task
    Background,
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComplianceMode::Off => "off",
            ComplianceMode::Inline => "inline",
            ComplianceMode::Background => "background",
        })
    }
}

impl FromStr for ComplianceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "disabled" => Ok(ComplianceMode::Off),
            "inline" => Ok(ComplianceMode::Inline),
            "background" => Ok(ComplianceMode::Background),
            other => Err(format!("Unknown compliance mode: {}", other)),
        }
    }
}

/// Analytics configuration
///
/// ## Defaults
///
/// - `compliance_mode`: off
/// - `failover_history_capacity`: 1000
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub compliance_mode: ComplianceMode,
    /// Failover records kept in memory; 0 disables the history
    pub failover_history_capacity: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            compliance_mode: ComplianceMode::Off,
            failover_history_capacity: 1000,
        }
    }
}
