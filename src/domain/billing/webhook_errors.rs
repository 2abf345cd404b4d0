//! Webhook error types for Paystack webhook handling.
//!
//! Only failures that reject the request live here. Data-integrity and
//! persistence problems are acknowledged with 200 and reported through
//! the handler's outcome instead.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that reject an inbound webhook request.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No webhook secret is configured; nothing can be verified.
    #[error("Webhook secret not configured")]
    SecretNotConfigured,

    /// The `x-paystack-signature` header is absent.
    #[error("Missing signature header")]
    MissingSignature,

    /// The computed digest does not match the header.
    #[error("Invalid signature")]
    InvalidSignature { expected: String, received: String },

    /// The verified body is not a webhook envelope.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// Maps the error to an HTTP status code.
    ///
    /// The provider redelivers on any non-2xx, so only misconfiguration
    /// answers with 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature { .. }
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short acknowledgement text returned to the provider.
    pub fn response_message(&self) -> &'static str {
        match self {
            WebhookError::SecretNotConfigured => "Webhook config error.",
            WebhookError::MissingSignature | WebhookError::InvalidSignature { .. } => {
                "Invalid signature."
            }
            WebhookError::ParseError(_) => "Invalid payload.",
        }
    }
}
