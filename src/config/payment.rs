//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::paystack::{PaystackConfig, DEFAULT_API_BASE_URL};
use crate::domain::billing::ActiveCurrency;

/// Paystack settings.
///
/// Both secrets are optional at load time. Without `secret_key`, payment
/// initiation fails with `internal`; without `webhook_secret`, every webhook
/// delivery is rejected with 500.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub secret_key: Option<SecretString>,

    pub webhook_secret: Option<SecretString>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// ISO 4217 code every payment must use
    #[serde(default = "default_active_currency")]
    pub active_currency: String,

    /// Overrides the built-in minor-unit factor for `active_currency`
    pub minor_unit_factor: Option<u32>,

    /// Where Paystack returns the customer after checkout
    pub callback_url: Option<String>,
}

impl PaymentConfig {
    pub fn active_currency(&self) -> Result<ActiveCurrency, ValidationError> {
        ActiveCurrency::resolve(&self.active_currency, self.minor_unit_factor)
            .map_err(|e| ValidationError::InvalidCurrency(e.to_string()))
    }

    /// Key is passed through even when missing; the adapter reports itself unconfigured.
    pub fn paystack_config(&self) -> PaystackConfig {
        PaystackConfig::new(self.secret_key.clone())
            .with_base_url(&self.api_base_url)
            .with_callback_url(self.callback_url.clone())
    }

    pub fn is_test_mode(&self) -> bool {
        self.secret_key
            .as_ref()
            .map_or(false, |k| k.expose_secret().starts_with("sk_test_"))
    }

    /// Log missing secrets so fail-closed behaviour is visible at startup.
    pub fn warn_missing_secrets(&self) {
        if self.secret_key.is_none() {
            tracing::error!("PAYMENT__SECRET_KEY not set; payment initiation will fail");
        }
        if self.webhook_secret.is_none() {
            tracing::warn!("PAYMENT__WEBHOOK_SECRET not set; webhooks will be rejected with 500");
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = &self.secret_key {
            if !key.expose_secret().starts_with("sk_") {
                return Err(ValidationError::InvalidPaystackKey);
            }
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidPaystackBaseUrl);
        }
        self.active_currency()?;
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            webhook_secret: None,
            api_base_url: default_api_base_url(),
            active_currency: default_active_currency(),
            minor_unit_factor: None,
            callback_url: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_active_currency() -> String {
    "KES".to_string()
}
