//! Backend connector errors
//!
//! | Variant | HTTP Status |
//! |---------|-------------|
//! | Authentication | 401, 403 |
//! | QuotaExceeded | 402 |
//! | RateLimit | 429 |
//! | Timeout | 408 or elapsed deadline |
//! | Api | any other non-2xx |
//!
//! Every variant is eligible for failover; `is_retryable` only reports
//! whether the same backend would likely succeed on a later attempt.

use crate::core::types::BackendType;
use serde::Serialize;

/// Connector error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectorError {
    #[error("Network error for {backend}: {message}")]
    Network {
        backend: BackendType,
        message: String,
    },

    #[error("Timeout for {backend}: {message}")]
    Timeout {
        backend: BackendType,
        message: String,
    },

    #[error("Rate limit exceeded for {backend}: {message}")]
    RateLimit {
        backend: BackendType,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Quota exceeded for {backend}: {message}")]
    QuotaExceeded {
        backend: BackendType,
        message: String,
    },

    #[error("Authentication failed for {backend}: {message}")]
    Authentication {
        backend: BackendType,
        message: String,
    },

    #[error("API error for {backend} (status {status}): {message}")]
    Api {
        backend: BackendType,
        status: u16,
        message: String,
    },

    #[error("Malformed response from {backend}: {message}")]
    MalformedResponse {
        backend: BackendType,
        message: String,
    },

    #[error("Configuration error for {backend}: {message}")]
    Configuration {
        backend: BackendType,
        message: String,
    },
}

/// Coarse error category, used in logs and serialized failure history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorErrorKind {
    Network,
    Timeout,
    RateLimit,
    QuotaExceeded,
    Authentication,
    Api,
    MalformedResponse,
    Configuration,
}

impl ConnectorError {
    pub fn network(backend: BackendType, message: impl Into<String>) -> Self {
        Self::Network {
            backend,
            message: message.into(),
        }
    }

    pub fn timeout(backend: BackendType, message: impl Into<String>) -> Self {
        Self::Timeout {
            backend,
            message: message.into(),
        }
    }

    pub fn rate_limit(backend: BackendType, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            backend,
            message: "Rate limit exceeded".to_string(),
            retry_after,
        }
    }

    pub fn quota_exceeded(backend: BackendType, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            backend,
            message: message.into(),
        }
    }

    pub fn authentication(backend: BackendType, message: impl Into<String>) -> Self {
        Self::Authentication {
            backend,
            message: message.into(),
        }
    }

    pub fn api(backend: BackendType, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            backend,
            status,
            message: message.into(),
        }
    }

    pub fn malformed_response(backend: BackendType, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend,
            message: message.into(),
        }
    }

    pub fn configuration(backend: BackendType, message: impl Into<String>) -> Self {
        Self::Configuration {
            backend,
            message: message.into(),
        }
    }

    /// Backend that produced the error
    pub fn backend(&self) -> BackendType {
        match self {
            Self::Network { backend, .. }
            | Self::Timeout { backend, .. }
            | Self::RateLimit { backend, .. }
            | Self::QuotaExceeded { backend, .. }
            | Self::Authentication { backend, .. }
            | Self::Api { backend, .. }
            | Self::MalformedResponse { backend, .. }
            | Self::Configuration { backend, .. } => *backend,
        }
    }

    pub fn kind(&self) -> ConnectorErrorKind {
        match self {
            Self::Network { .. } => ConnectorErrorKind::Network,
            Self::Timeout { .. } => ConnectorErrorKind::Timeout,
            Self::RateLimit { .. } => ConnectorErrorKind::RateLimit,
            Self::QuotaExceeded { .. } => ConnectorErrorKind::QuotaExceeded,
            Self::Authentication { .. } => ConnectorErrorKind::Authentication,
            Self::Api { .. } => ConnectorErrorKind::Api,
            Self::MalformedResponse { .. } => ConnectorErrorKind::MalformedResponse,
            Self::Configuration { .. } => ConnectorErrorKind::Configuration,
        }
    }

    /// Whether the same backend may succeed if asked again later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimit { .. } => true,
            Self::Api { status, .. } => matches!(*status, 429 | 500..=599),
            Self::QuotaExceeded { .. }
            | Self::Authentication { .. }
            | Self::MalformedResponse { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Map a non-success HTTP status to an error
    pub fn from_status(backend: BackendType, status: u16, body: &str) -> Self {
        match status {
            401 => Self::authentication(backend, "Invalid API key or authentication failed"),
            403 => Self::authentication(backend, "Forbidden: insufficient permissions"),
            402 => Self::quota_exceeded(backend, body.to_string()),
            408 => Self::timeout(backend, "Backend reported request timeout"),
            429 => Self::rate_limit(backend, None),
            500..=599 => Self::api(backend, status, format!("Server error: {}", body)),
            _ => Self::api(backend, status, body.to_string()),
        }
    }
}
