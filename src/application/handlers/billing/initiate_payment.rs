//! InitiatePaymentHandler - creates a Paystack transaction for a premium
//! upgrade and returns the checkout URL.
//!
//! The caller's subscriber record is provisioned before the provider is
//! called, so the confirming webhook always has a record to upgrade.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use crate::application::handlers::account::ProvisionSubscriberHandler;
use crate::domain::billing::{ActiveCurrency, BillingCycle, PaymentReference, Plan};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::ports::{InitializeTransactionRequest, PaymentProvider, TransactionMetadata};

/// Command to start a premium payment.
///
/// Fields are kept loose so that every validation failure surfaces as
/// `invalid-argument` rather than a deserialization error.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatePaymentCommand {
    /// Major-unit amount.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
}

/// Checkout details returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePaymentResult {
    pub authorization_url: Option<String>,
    pub access_code: Option<String>,
    pub reference: Option<String>,
}

/// Categorized initiation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitiatePaymentError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl InitiatePaymentError {
    /// Wire-level category.
    pub fn code(&self) -> &'static str {
        match self {
            InitiatePaymentError::Unauthenticated => "unauthenticated",
            InitiatePaymentError::InvalidArgument(_) => "invalid-argument",
            InitiatePaymentError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            InitiatePaymentError::Unauthenticated => StatusCode::UNAUTHORIZED,
            InitiatePaymentError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            InitiatePaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        InitiatePaymentError::InvalidArgument(message.into())
    }
}

/// Handler for payment initiation.
pub struct InitiatePaymentHandler {
    provider: Arc<dyn PaymentProvider>,
    provisioning: Arc<ProvisionSubscriberHandler>,
    active_currency: ActiveCurrency,
}

impl InitiatePaymentHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        provisioning: Arc<ProvisionSubscriberHandler>,
        active_currency: ActiveCurrency,
    ) -> Self {
        Self {
            provider,
            provisioning,
            active_currency,
        }
    }

    /// Validates the request, converts the amount and calls the provider.
    ///
    /// Checks run in order: caller identity, provider configuration, email,
    /// amount, currency, billing cycle. The subscriber record is then ensured.
    pub async fn handle(
        &self,
        caller: Option<&AuthenticatedUser>,
        cmd: InitiatePaymentCommand,
    ) -> Result<InitiatePaymentResult, InitiatePaymentError> {
        let caller = caller.ok_or(InitiatePaymentError::Unauthenticated)?;

        if !self.provider.is_configured() {
            tracing::error!("Paystack secret key not configured; cannot initiate payment");
            return Err(InitiatePaymentError::Internal(
                "Payment provider is not configured.".to_string(),
            ));
        }

        let email = caller
            .email()
            .ok_or_else(|| InitiatePaymentError::invalid("User email not found."))?
            .to_string();

        let amount = cmd
            .amount
            .ok_or_else(|| InitiatePaymentError::invalid("A valid amount is required."))?;
        let amount_minor_units = self
            .active_currency
            .to_minor_units(amount)
            .map_err(|e| InitiatePaymentError::invalid(format!("A valid amount is required: {}", e)))?;

        let currency = cmd.currency.unwrap_or_default();
        if !self.active_currency.accepts(&currency) {
            return Err(InitiatePaymentError::invalid(format!(
                "Invalid currency. Expected {}.",
                self.active_currency.code()
            )));
        }

        let billing_cycle: BillingCycle = cmd
            .billing_cycle
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| InitiatePaymentError::invalid("Billing cycle must be 'monthly' or 'yearly'."))?;

        self.provisioning.handle(caller).await.map_err(|err| {
            tracing::error!(
                user_id = %caller.id,
                code = %err.code,
                error = %err.message,
                "Could not provision subscriber before payment"
            );
            InitiatePaymentError::Internal("Could not prepare the subscriber record.".to_string())
        })?;

        let reference = PaymentReference::generate(billing_cycle, &caller.id, Timestamp::now());

        tracing::info!(
            user_id = %caller.id,
            reference = %reference,
            amount_minor_units,
            currency = %currency,
            email_verified = caller.email_verified,
            "Initiating Paystack payment"
        );

        let request = InitializeTransactionRequest {
            email,
            amount_minor_units,
            currency,
            reference: reference.to_string(),
            metadata: TransactionMetadata {
                user_id: caller.id.clone(),
                plan: Plan::Premium.as_str().to_string(),
                billing_cycle,
            },
            callback_url: None,
        };

        let transaction = self
            .provider
            .initialize_transaction(request)
            .await
            .map_err(|err| {
                tracing::error!(
                    user_id = %caller.id,
                    reference = %reference,
                    code = %err.code,
                    error = %err.message,
                    "Paystack transaction initialization failed"
                );
                InitiatePaymentError::Internal(err.message)
            })?;

        Ok(InitiatePaymentResult {
            authorization_url: transaction.authorization_url,
            access_code: transaction.access_code,
            reference: transaction.reference.or_else(|| Some(reference.into_inner())),
        })
    }
}
