//! Payment Intent Error Types

use thiserror::Error;

use crate::settings::StripeMode;

/// Result type alias
pub type Result<T> = std::result::Result<T, IntentError>;

/// Errors raised while creating a payment intent
#[derive(Error, Debug)]
pub enum IntentError {
    /// No order matched the supplied identifier
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The secret key for the active mode is empty
    #[error("Stripe {mode} secret key is not configured")]
    MissingApiKey { mode: StripeMode },

    /// Transport failure or non-200 response from Stripe
    #[error("Stripe request failed: {0}")]
    RequestFailed(String),

    /// Stripe answered without an intent id
    #[error("Payment intent creation failed: {0}")]
    IntentCreationFailed(String),

    /// Order total cannot be expressed in minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Order store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntentError {
    /// Stable machine-readable code, exposed as a GraphQL error extension
    pub fn code(&self) -> &'static str {
        match self {
            IntentError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            IntentError::MissingApiKey { .. } => "MISSING_API_KEY",
            IntentError::RequestFailed(_) | IntentError::IntentCreationFailed(_) => {
                "INTENT_CREATION_FAILED"
            }
            IntentError::InvalidAmount(_) => "INVALID_AMOUNT",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message
    pub fn user_message(&self) -> &str {
        match self {
            IntentError::OrderNotFound(_) => "Order not found.",
            IntentError::MissingApiKey { .. } => "Stripe API key not found.",
            IntentError::RequestFailed(_) | IntentError::IntentCreationFailed(_) => {
                "Failed to create payment intent."
            }
            IntentError::InvalidAmount(_) => "Order total is not a valid payment amount.",
            _ => "An error occurred processing your request.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failure_reads_as_creation_failure() {
        let err = IntentError::RequestFailed("status 500".into());
        assert_eq!(err.code(), "INTENT_CREATION_FAILED");
        assert_eq!(err.user_message(), "Failed to create payment intent.");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = IntentError::Storage("lock poisoned".into());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.user_message().contains("lock"));
    }
}
