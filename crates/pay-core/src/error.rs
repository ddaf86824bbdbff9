//! # Payment Error Types
//!
//! Typed error handling for the embedded-checkout service.
//! All provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (invalid keys, unreadable settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required environment variable is absent or empty
    #[error("{variable} environment variable is not set")]
    MissingConfiguration { variable: String },

    /// The provider client cannot serve a required API
    #[error("{capability} not available")]
    CapabilityUnavailable { capability: String, hint: String },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Payment provider API error, carrying the provider's message verbatim
    #[error("{message}")]
    Provider {
        message: String,
        kind: Option<String>,
        code: Option<String>,
        http_status: u16,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::MissingConfiguration { .. } => 400,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Configuration(_)
            | PaymentError::CapabilityUnavailable { .. }
            | PaymentError::Provider { .. }
            | PaymentError::Network(_)
            | PaymentError::Serialization(_) => 500,
        }
    }

    /// Provider classification tag (Stripe's `error.type`), when known
    pub fn error_type(&self) -> Option<&str> {
        match self {
            PaymentError::Provider { kind, .. } => kind.as_deref(),
            PaymentError::CapabilityUnavailable { .. } | PaymentError::Configuration(_) => {
                Some("configuration_error")
            }
            _ => None,
        }
    }

    /// Provider error code (Stripe's `error.code`), when known
    pub fn error_code(&self) -> Option<&str> {
        match self {
            PaymentError::Provider { code, .. } => code.as_deref(),
            PaymentError::CapabilityUnavailable { .. } => Some("capability_unavailable"),
            _ => None,
        }
    }

    /// Remediation hint, only carried by capability failures
    pub fn hint(&self) -> Option<&str> {
        match self {
            PaymentError::CapabilityUnavailable { hint, .. } => Some(hint),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
