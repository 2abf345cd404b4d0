//! Paystack payment provider adapter.
//!
//! Implements `PaymentProvider` against the Paystack REST API. The secret
//! key is sent as a bearer token and never appears in errors or logs.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    InitializeTransactionRequest, InitializedTransaction, PaymentError, PaymentErrorCode,
    PaymentProvider,
};

use super::api_types::{InitializeTransactionBody, InitializeTransactionData, PaystackResponse};

/// Default Paystack API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.paystack.co";

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret key (sk_live_... or sk_test_...). `None` leaves the adapter
    /// unconfigured; every call then fails with a configuration error.
    secret_key: Option<SecretString>,

    /// Base URL for the API (default: https://api.paystack.co).
    api_base_url: String,

    /// Post-checkout redirect, when set.
    callback_url: Option<String>,

    request_timeout: Duration,
}

impl PaystackConfig {
    pub fn new(secret_key: Option<SecretString>) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            callback_url: None,
            request_timeout: Duration::from_secs(15),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_callback_url(mut self, url: Option<String>) -> Self {
        self.callback_url = url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Paystack payment provider adapter.
pub struct PaystackPaymentAdapter {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackPaymentAdapter {
    pub fn new(config: PaystackConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            http_client,
        }
    }

    fn error_for_status(status: reqwest::StatusCode, message: &str) -> PaymentError {
        let message = if message.is_empty() {
            format!("Paystack API error (HTTP {})", status.as_u16())
        } else {
            format!("Paystack API error: {}", message)
        };
        let code = match status.as_u16() {
            401 | 403 => PaymentErrorCode::AuthenticationError,
            429 => PaymentErrorCode::RateLimitExceeded,
            _ => PaymentErrorCode::ProviderError,
        };
        PaymentError::new(code, message).with_provider_status(status.as_u16())
    }
}

#[async_trait]
impl PaymentProvider for PaystackPaymentAdapter {
    fn is_configured(&self) -> bool {
        self.config.secret_key.is_some()
    }

    async fn initialize_transaction(
        &self,
        mut request: InitializeTransactionRequest,
    ) -> Result<InitializedTransaction, PaymentError> {
        let secret_key = self
            .config
            .secret_key
            .as_ref()
            .ok_or_else(|| PaymentError::configuration("Paystack secret key not configured"))?;

        if request.callback_url.is_none() {
            request.callback_url = self.config.callback_url.clone();
        }

        let url = format!("{}/transaction/initialize", self.config.api_base_url);
        let body = InitializeTransactionBody::from(&request);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    reference = %request.reference,
                    "Paystack initialize request failed"
                );
                PaymentError::network(format!("Could not reach Paystack: {}", e.without_url()))
            })?;

        let status = response.status();
        let envelope: Option<PaystackResponse<InitializeTransactionData>> =
            response.json().await.ok();

        if !status.is_success() {
            let message = envelope.map(|e| e.message).unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                message = %message,
                reference = %request.reference,
                "Paystack initialize rejected"
            );
            return Err(Self::error_for_status(status, &message));
        }

        let envelope = envelope.ok_or_else(|| {
            PaymentError::provider("Failed to parse Paystack response")
                .with_provider_status(status.as_u16())
        })?;

        if !envelope.status {
            tracing::error!(
                message = %envelope.message,
                reference = %request.reference,
                "Paystack initialize returned status=false"
            );
            return Err(PaymentError::provider(format!(
                "Paystack API error: {}",
                envelope.message
            )));
        }

        let data = envelope.data.ok_or_else(|| {
            PaymentError::provider("Paystack response did not include transaction data")
        })?;

        tracing::info!(reference = %request.reference, "Paystack transaction initialized");
        Ok(data.into())
    }
}
