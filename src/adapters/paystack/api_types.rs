//! Paystack REST wire types.
//!
//! Only fields this service sends or reads are modelled.

use serde::{Deserialize, Serialize};

use crate::ports::{InitializeTransactionRequest, InitializedTransaction};

/// Body of `POST /transaction/initialize`.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeTransactionBody {
    pub email: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub metadata: PaystackMetadata,
}

/// Transaction metadata. Direct fields feed the webhook; `custom_fields`
/// is what the Paystack dashboard renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackMetadata {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub plan: String,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: String,
    pub custom_fields: Vec<CustomField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub display_name: String,
    pub variable_name: String,
    pub value: String,
}

impl CustomField {
    fn new(display_name: &str, variable_name: &str, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.to_string(),
            variable_name: variable_name.to_string(),
            value: value.into(),
        }
    }
}

impl From<&InitializeTransactionRequest> for InitializeTransactionBody {
    fn from(request: &InitializeTransactionRequest) -> Self {
        let meta = &request.metadata;
        let user_id = meta.user_id.to_string();
        let billing_cycle = meta.billing_cycle.as_str().to_string();
        Self {
            email: request.email.clone(),
            amount: request.amount_minor_units,
            currency: request.currency.clone(),
            reference: request.reference.clone(),
            callback_url: request.callback_url.clone(),
            metadata: PaystackMetadata {
                custom_fields: vec![
                    CustomField::new("User ID", "user_id", user_id.clone()),
                    CustomField::new("Plan", "plan", meta.plan.clone()),
                    CustomField::new("Billing Cycle", "billing_cycle", billing_cycle.clone()),
                ],
                user_id,
                plan: meta.plan.clone(),
                billing_cycle,
            },
        }
    }
}

/// Standard Paystack response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// `data` of a successful initialize call.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeTransactionData {
    pub authorization_url: Option<String>,
    pub access_code: Option<String>,
    pub reference: Option<String>,
}

impl From<InitializeTransactionData> for InitializedTransaction {
    fn from(data: InitializeTransactionData) -> Self {
        Self {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference: data.reference,
        }
    }
}
