//! The `Validate` trait shared by every config section

use crate::utils::error::GatewayError;

/// A config section that can reject values the gateway cannot run with
pub trait Validate {
    /// Section name used to prefix error messages
    const SECTION: &'static str;

    fn validate(&self) -> Result<(), String>;

    /// Validate and wrap the failure as a gateway config error
    fn check(&self) -> Result<(), GatewayError> {
        self.validate()
            .map_err(|e| GatewayError::Config(format!("{} config error: {}", Self::SECTION, e)))
    }
}
