//! CheckEntitlementHandler - query for a caller's premium access.

use std::sync::Arc;

use crate::domain::billing::{BillingCycle, Plan, PlanStatus};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriberRepository;

/// Query for one user's entitlement.
#[derive(Debug, Clone)]
pub struct CheckEntitlementQuery {
    pub user_id: UserId,
}

/// Entitlement plus the fields it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEntitlementResult {
    pub entitled: bool,
    pub plan: Plan,
    pub plan_status: Option<PlanStatus>,
    pub billing_cycle: Option<BillingCycle>,
}

/// Handler for entitlement checks.
///
/// A user without a record is reported as free and not entitled.
pub struct CheckEntitlementHandler {
    repository: Arc<dyn SubscriberRepository>,
}

impl CheckEntitlementHandler {
    pub fn new(repository: Arc<dyn SubscriberRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: CheckEntitlementQuery,
    ) -> Result<CheckEntitlementResult, DomainError> {
        let result = match self.repository.find_by_user_id(&query.user_id).await? {
            Some(s) => CheckEntitlementResult {
                entitled: s.is_entitled(),
                plan: s.plan,
                plan_status: s.plan_status,
                billing_cycle: s.billing_cycle,
            },
            None => CheckEntitlementResult {
                entitled: false,
                plan: Plan::Free,
                plan_status: None,
                billing_cycle: None,
            },
        };
        Ok(result)
    }
}
