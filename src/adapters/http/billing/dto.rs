//! Request and response bodies for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::{
    CheckEntitlementResult, InitiatePaymentCommand, InitiatePaymentResult,
};
use crate::domain::billing::{BillingCycle, Plan, PlanStatus};

/// Body of `POST /api/billing/payments/initiate`.
///
/// Every field is optional here; missing or mistyped values are reported by
/// the handler as `invalid-argument`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub billing_cycle: Option<String>,
}

impl From<InitiatePaymentRequest> for InitiatePaymentCommand {
    fn from(req: InitiatePaymentRequest) -> Self {
        Self {
            amount: req.amount,
            currency: req.currency,
            billing_cycle: req.billing_cycle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentResponse {
    pub authorization_url: Option<String>,
    pub access_code: Option<String>,
    pub reference: Option<String>,
}

impl From<InitiatePaymentResult> for InitiatePaymentResponse {
    fn from(result: InitiatePaymentResult) -> Self {
        Self {
            authorization_url: result.authorization_url,
            access_code: result.access_code,
            reference: result.reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    pub entitled: bool,
    pub plan: Plan,
    pub plan_status: Option<PlanStatus>,
    pub billing_cycle: Option<BillingCycle>,
}

impl From<CheckEntitlementResult> for EntitlementResponse {
    fn from(result: CheckEntitlementResult) -> Self {
        Self {
            entitled: result.entitled,
            plan: result.plan,
            plan_status: result.plan_status,
            billing_cycle: result.billing_cycle,
        }
    }
}

/// Error body shared by the JSON endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
