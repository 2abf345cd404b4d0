//! Payment reference generation.

use std::fmt;

use super::plan::BillingCycle;
use crate::domain::foundation::{Timestamp, UserId};

/// Correlation key between a payment initiation and its webhook.
///
/// Format: `PRO_<CYCLE>_<userId>_<epochMillis>`. Unique per user per
/// millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub fn generate(cycle: BillingCycle, user_id: &UserId, at: Timestamp) -> Self {
        Self(format!(
            "PRO_{}_{}_{}",
            cycle.reference_tag(),
            user_id.as_str(),
            at.epoch_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
