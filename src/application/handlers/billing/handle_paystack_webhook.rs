//! HandlePaystackWebhookHandler - verifies, interprets and reconciles a
//! Paystack webhook delivery.
//!
//! Security and configuration failures reject the request. Everything after
//! a valid signature is acknowledged with 200, because Paystack redelivers
//! on any non-2xx and a redelivery cannot fix bad metadata or a failed
//! write. Those cases are logged at error level for manual follow-up.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::billing::{
    interpret, ActiveCurrency, InterpretedEvent, MalformedReason, PaystackEvent,
    WebhookError, WebhookSignatureVerifier,
};
use crate::ports::SubscriberRepository;

use super::reconcile_subscription::{ReconcileResult, SubscriptionReconciler};

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaystackWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `x-paystack-signature` header.
    pub signature: Option<String>,
}

/// Outcome of an accepted delivery. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Subscription upgraded.
    Reconciled { user_id: String, reference: String },
    /// Same charge already reflected on the record.
    AlreadyApplied { user_id: String, reference: String },
    /// Not a `charge.success` event.
    Ignored { event_type: String },
    /// Paid charge that could not be credited.
    Malformed { reason: MalformedReason },
    /// Credit could not be persisted.
    ReconciliationFailed { user_id: String, reference: String },
}

impl WebhookOutcome {
    /// Acknowledgement text returned to the provider.
    pub fn response_message(&self) -> &'static str {
        match self {
            WebhookOutcome::Reconciled { .. } | WebhookOutcome::AlreadyApplied { .. } => {
                "Webhook processed successfully."
            }
            WebhookOutcome::Ignored { .. } => "Webhook received, event ignored.",
            WebhookOutcome::Malformed {
                reason: MalformedReason::MissingRequiredData,
            } => "Webhook received, missing required data/metadata.",
            WebhookOutcome::Malformed {
                reason: MalformedReason::InvalidBillingCycle,
            } => "Webhook received, invalid billing cycle in metadata.",
            WebhookOutcome::ReconciliationFailed { .. } => {
                "Internal server error processing payment update."
            }
        }
    }
}

/// Handler for Paystack webhook deliveries.
pub struct HandlePaystackWebhookHandler {
    verifier: Option<WebhookSignatureVerifier>,
    reconciler: SubscriptionReconciler,
    active_currency: ActiveCurrency,
}

impl HandlePaystackWebhookHandler {
    /// `webhook_secret = None` makes every delivery fail closed with 500.
    pub fn new(
        webhook_secret: Option<SecretString>,
        repository: Arc<dyn SubscriberRepository>,
        active_currency: ActiveCurrency,
    ) -> Self {
        Self {
            verifier: webhook_secret.map(WebhookSignatureVerifier::new),
            reconciler: SubscriptionReconciler::new(repository),
            active_currency,
        }
    }

    /// # Errors
    ///
    /// - `SecretNotConfigured` - no webhook secret (500)
    /// - `MissingSignature` / `InvalidSignature` - forged or unsigned (400)
    /// - `ParseError` - signed body is not a webhook envelope (400)
    pub async fn handle(
        &self,
        cmd: HandlePaystackWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Verify signature over the raw bytes
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            tracing::error!("Paystack webhook secret not configured; rejecting delivery");
            WebhookError::SecretNotConfigured
        })?;

        if let Err(err) = verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
            match &err {
                WebhookError::InvalidSignature { expected, received } => tracing::warn!(
                    expected_signature = %expected,
                    received_signature = %received,
                    "Invalid Paystack webhook signature"
                ),
                other => tracing::warn!(error = %other, "Rejected Paystack webhook"),
            }
            return Err(err);
        }

        // 2. Parse envelope
        let event = PaystackEvent::from_slice(&cmd.payload).map_err(|err| {
            tracing::warn!(error = %err, "Signed Paystack webhook body could not be parsed");
            err
        })?;

        // 3. Interpret and reconcile
        let charge = match interpret(&event) {
            InterpretedEvent::Ignored { event_type } => {
                tracing::info!(event_type = %event_type, "Ignoring Paystack event");
                return Ok(WebhookOutcome::Ignored { event_type });
            }
            InterpretedEvent::Malformed { reason, context } => {
                tracing::error!(
                    reason = %reason,
                    reference = ?context.reference,
                    user_id = ?context.user_id,
                    plan = ?context.plan,
                    billing_cycle = ?context.billing_cycle,
                    transaction_id = ?context.transaction_id,
                    currency = ?context.currency,
                    "Paid charge.success event could not be credited; manual remediation required"
                );
                return Ok(WebhookOutcome::Malformed { reason });
            }
            InterpretedEvent::ChargeSucceeded(charge) => charge,
        };

        if let Some(reported) = charge.currency_mismatch(&self.active_currency) {
            tracing::warn!(
                reference = %charge.reference,
                reported_currency = %reported,
                active_currency = %self.active_currency.code(),
                "Charge currency differs from active currency; crediting anyway"
            );
        }

        let user_id = charge.user_id.to_string();
        let reference = charge.reference.clone();

        match self.reconciler.reconcile(&charge).await {
            Ok(ReconcileResult::Applied) => {
                tracing::info!(
                    user_id = %user_id,
                    reference = %reference,
                    billing_cycle = %charge.billing_cycle,
                    "Subscription activated"
                );
                Ok(WebhookOutcome::Reconciled { user_id, reference })
            }
            Ok(ReconcileResult::AlreadyApplied) => {
                tracing::info!(
                    user_id = %user_id,
                    reference = %reference,
                    "Charge already applied; skipping write"
                );
                Ok(WebhookOutcome::AlreadyApplied { user_id, reference })
            }
            Err(err) => {
                tracing::error!(
                    user_id = %user_id,
                    reference = %reference,
                    transaction_id = ?charge.transaction_id,
                    error = %err,
                    "Failed to persist subscription update; manual reconciliation required"
                );
                Ok(WebhookOutcome::ReconciliationFailed { user_id, reference })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriberRepository;
    use crate::domain::billing::{sign_payload, PaystackEventBuilder, Plan, Subscriber};
    use crate::domain::foundation::UserId;

    const SECRET: &str = "sk_test_webhook";

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    async fn repo_with_u1() -> Arc<InMemorySubscriberRepository> {
        Arc::new(
            InMemorySubscriberRepository::with_subscribers([Subscriber::new(
                UserId::new("u1").unwrap(),
                Some("u1@example.com".to_string()),
            )])
            .await,
        )
    }

    fn handler(
        secret: Option<&str>,
        repo: Arc<InMemorySubscriberRepository>,
    ) -> HandlePaystackWebhookHandler {
        HandlePaystackWebhookHandler::new(
            secret.map(|s| SecretString::new(s.to_string())),
            repo,
            ActiveCurrency::resolve("KES", None).unwrap(),
        )
    }

    fn signed(body: Vec<u8>) -> HandlePaystackWebhookCommand {
        let signature = sign_payload(SECRET, &body);
        HandlePaystackWebhookCommand {
            payload: body,
            signature: Some(signature),
        }
    }

    fn valid_charge() -> PaystackEventBuilder {
        PaystackEventBuilder::charge_success()
            .reference("PRO_MONTHLY_u1_1717000000000")
            .transaction_id(4099)
            .currency("KES")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "monthly")
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_secret_fails_closed() {
        let repo = repo_with_u1().await;
        let h = handler(None, repo.clone());

        let err = h.handle(signed(valid_charge().to_body())).await.unwrap_err();
        assert!(matches!(err, WebhookError::SecretNotConfigured));

        let err = h
            .handle(HandlePaystackWebhookCommand {
                payload: b"garbage".to_vec(),
                signature: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::SecretNotConfigured));
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn forged_signature_is_rejected_without_side_effects() {
        let repo = repo_with_u1().await;
        let body = valid_charge().to_body();
        let cmd = HandlePaystackWebhookCommand {
            signature: Some(sign_payload("sk_attacker", &body)),
            payload: body,
        };

        let err = handler(Some(SECRET), repo.clone()).handle(cmd).await.unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature { .. }));
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn unsigned_delivery_is_rejected() {
        let repo = repo_with_u1().await;
        let cmd = HandlePaystackWebhookCommand {
            payload: valid_charge().to_body(),
            signature: None,
        };
        let err = handler(Some(SECRET), repo).handle(cmd).await.unwrap_err();
        assert!(matches!(err, WebhookError::MissingSignature));
    }

    #[tokio::test]
    async fn signed_garbage_is_parse_error() {
        let repo = repo_with_u1().await;
        let err = handler(Some(SECRET), repo)
            .handle(signed(b"not json".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::ParseError(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Acknowledged Outcome Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_charge_activates_premium() {
        let repo = repo_with_u1().await;
        let outcome = handler(Some(SECRET), repo.clone())
            .handle(signed(valid_charge().to_body()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Reconciled {
                user_id: "u1".to_string(),
                reference: "PRO_MONTHLY_u1_1717000000000".to_string(),
            }
        );
        assert_eq!(outcome.response_message(), "Webhook processed successfully.");
        assert!(repo.snapshot().await[0].is_entitled());
    }

    #[tokio::test]
    async fn redelivery_is_acknowledged_without_second_write() {
        let repo = repo_with_u1().await;
        let h = handler(Some(SECRET), repo.clone());
        h.handle(signed(valid_charge().to_body())).await.unwrap();
        let once = repo.snapshot().await;

        let outcome = h.handle(signed(valid_charge().to_body())).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::AlreadyApplied { .. }));
        assert_eq!(repo.snapshot().await, once);
    }

    #[tokio::test]
    async fn other_events_are_ignored() {
        let repo = repo_with_u1().await;
        let body = PaystackEventBuilder::new("subscription.create").to_body();

        let outcome = handler(Some(SECRET), repo.clone())
            .handle(signed(body))
            .await
            .unwrap();
        assert_eq!(outcome.response_message(), "Webhook received, event ignored.");
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn malformed_charge_is_acknowledged_without_write() {
        let repo = repo_with_u1().await;
        let body = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .to_body();

        let outcome = handler(Some(SECRET), repo.clone())
            .handle(signed(body))
            .await
            .unwrap();
        assert_eq!(
            outcome.response_message(),
            "Webhook received, missing required data/metadata."
        );
        assert_eq!(repo.snapshot().await[0].plan, Plan::Free);
    }

    #[tokio::test]
    async fn invalid_cycle_has_its_own_message() {
        let repo = repo_with_u1().await;
        let body = valid_charge().metadata("billingCycle", "quarterly").to_body();

        let outcome = handler(Some(SECRET), repo).handle(signed(body)).await.unwrap();
        assert_eq!(
            outcome.response_message(),
            "Webhook received, invalid billing cycle in metadata."
        );
    }

    #[tokio::test]
    async fn currency_mismatch_still_credits() {
        let repo = repo_with_u1().await;
        let body = valid_charge().currency("USD").to_body();

        let outcome = handler(Some(SECRET), repo.clone())
            .handle(signed(body))
            .await
            .unwrap();
        assert!(matches!(outcome, WebhookOutcome::Reconciled { .. }));
    }

    #[tokio::test]
    async fn persistence_failure_is_acknowledged() {
        let repo = repo_with_u1().await;
        repo.fail_writes(true);

        let outcome = handler(Some(SECRET), repo)
            .handle(signed(valid_charge().to_body()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::ReconciliationFailed {
                user_id: "u1".to_string(),
                reference: "PRO_MONTHLY_u1_1717000000000".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unknown_subscriber_is_acknowledged() {
        let repo = Arc::new(InMemorySubscriberRepository::new());
        let outcome = handler(Some(SECRET), repo)
            .handle(signed(valid_charge().to_body()))
            .await
            .unwrap();
        assert!(matches!(outcome, WebhookOutcome::ReconciliationFailed { .. }));
    }
}
