//! Subscriber record and the subscription update applied on payment.

use serde::{Deserialize, Serialize};

use super::plan::{BillingCycle, Plan, PlanStatus};
use crate::domain::foundation::{Timestamp, UserId};

/// One subscriber record per authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub user_id: UserId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub plan: Plan,
    pub plan_status: Option<PlanStatus>,
    pub billing_cycle: Option<BillingCycle>,
    pub last_transaction_ref: Option<String>,
    pub last_transaction_id: Option<String>,
    pub subscription_updated_at: Option<Timestamp>,
}

impl Subscriber {
    /// Record as created at signup: free plan, no subscription bookkeeping.
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self {
            user_id,
            email,
            username: None,
            plan: Plan::Free,
            plan_status: None,
            billing_cycle: None,
            last_transaction_ref: None,
            last_transaction_id: None,
            subscription_updated_at: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Premium access is granted iff plan is premium and status is active.
    ///
    /// `billing_cycle` never participates.
    pub fn is_entitled(&self) -> bool {
        is_entitled(self.plan, self.plan_status.as_ref())
    }

    /// True when `reference` is the last transaction already credited.
    pub fn has_applied(&self, reference: &str) -> bool {
        self.last_transaction_ref.as_deref() == Some(reference)
    }

    /// Overwrites the subscription fields with `update`.
    ///
    /// No prior-state checks: applying the same update twice leaves the
    /// same field values, save for the timestamp.
    pub fn apply(&mut self, update: &SubscriptionUpdate, at: Timestamp) {
        self.plan = update.plan;
        self.plan_status = Some(update.plan_status.clone());
        self.billing_cycle = Some(update.billing_cycle);
        self.last_transaction_ref = Some(update.last_transaction_ref.clone());
        self.last_transaction_id = update.last_transaction_id.clone();
        self.subscription_updated_at = Some(at);
    }
}

/// Entitlement over raw fields, usable without a full record.
pub fn is_entitled(plan: Plan, status: Option<&PlanStatus>) -> bool {
    plan == Plan::Premium && status.map_or(false, PlanStatus::is_active)
}

/// Field values written by a successful payment reconciliation.
///
/// The storage layer stamps `subscription_updated_at` with its own clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub plan: Plan,
    pub plan_status: PlanStatus,
    pub billing_cycle: BillingCycle,
    pub last_transaction_ref: String,
    pub last_transaction_id: Option<String>,
}

impl SubscriptionUpdate {
    /// Activation of the paid tier for a credited transaction.
    pub fn activate_premium(
        billing_cycle: BillingCycle,
        reference: impl Into<String>,
        transaction_id: Option<String>,
    ) -> Self {
        Self {
            plan: Plan::Premium,
            plan_status: PlanStatus::Active,
            billing_cycle,
            last_transaction_ref: reference.into(),
            last_transaction_id: transaction_id,
        }
    }
}
