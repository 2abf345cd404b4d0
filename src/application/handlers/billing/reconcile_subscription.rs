//! SubscriptionReconciler - applies a credited charge to one subscriber.

use std::sync::Arc;

use crate::domain::billing::{ChargeSuccess, SubscriptionUpdate};
use crate::domain::foundation::DomainError;
use crate::ports::SubscriberRepository;

/// Result of a reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileResult {
    /// Subscription fields written.
    Applied,
    /// Record already carries this reference and is entitled; no write.
    AlreadyApplied,
}

/// Upgrades the subscriber named in a successful charge to premium.
///
/// Blind overwrite: prior plan status is never consulted, so redelivery of
/// the same event converges on the same field values.
pub struct SubscriptionReconciler {
    repository: Arc<dyn SubscriberRepository>,
}

impl SubscriptionReconciler {
    pub fn new(repository: Arc<dyn SubscriberRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Propagates `SubscriberNotFound` and `DatabaseError` from the
    /// repository. The caller decides how to acknowledge them.
    pub async fn reconcile(&self, charge: &ChargeSuccess) -> Result<ReconcileResult, DomainError> {
        // Skip the write when this exact charge is already reflected. A failed
        // read falls through to the write.
        match self.repository.find_by_user_id(&charge.user_id).await {
            Ok(Some(existing))
                if existing.has_applied(&charge.reference) && existing.is_entitled() =>
            {
                return Ok(ReconcileResult::AlreadyApplied);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    user_id = %charge.user_id,
                    reference = %charge.reference,
                    error = %e,
                    "Could not read subscriber before reconciliation; applying update"
                );
            }
        }

        let update = SubscriptionUpdate::activate_premium(
            charge.billing_cycle,
            charge.reference.clone(),
            charge.transaction_id.clone(),
        );

        self.repository
            .apply_subscription_update(&charge.user_id, &update)
            .await?;

        Ok(ReconcileResult::Applied)
    }
}
