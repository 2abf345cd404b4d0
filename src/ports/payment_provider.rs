//! Payment provider port for transaction initialization.
//!
//! The provider hosts the checkout page. This side only creates the pending
//! transaction and hands back the redirect URL; settlement arrives later as
//! a webhook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::BillingCycle;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Whether the provider has credentials to make API calls.
    fn is_configured(&self) -> bool;

    /// Create a pending transaction and return its checkout URL.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no secret key is set
    /// - `NetworkError` if the provider is unreachable
    /// - `ProviderError` if the provider rejects the request
    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<InitializedTransaction, PaymentError>;
}

/// Request to create a pending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeTransactionRequest {
    /// Customer email; the provider requires one.
    pub email: String,

    /// Amount in the currency's minor units.
    pub amount_minor_units: i64,

    /// ISO currency code.
    pub currency: String,

    /// Correlation key echoed back in the webhook.
    pub reference: String,

    /// Identity and plan carried through to the webhook.
    pub metadata: TransactionMetadata,

    /// Where the provider redirects after checkout, if configured.
    pub callback_url: Option<String>,
}

/// Metadata attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    pub user_id: UserId,
    pub plan: String,
    pub billing_cycle: BillingCycle,
}

/// Provider response for a created transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: Option<String>,
    pub access_code: Option<String>,
    pub reference: Option<String>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message, safe to show callers.
    pub message: String,

    /// HTTP status returned by the provider, if any.
    pub provider_status: Option<u16>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_status: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_status(mut self, status: u16) -> Self {
        self.provider_status = Some(status);
        self
    }

    /// Create a missing-credentials error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Configuration, message)
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a provider rejection error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::Configuration => ErrorCode::InternalError,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Secret key not configured.
    Configuration,

    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider rejected the request or answered unexpectedly.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::Configuration => "configuration",
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
