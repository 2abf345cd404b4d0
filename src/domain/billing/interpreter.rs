//! Normalizes a verified Paystack event into a domain outcome.
//!
//! Pure: no I/O and no logging. Each metadata value is resolved by running
//! an ordered list of extraction strategies and taking the first hit.

use serde_json::{Map, Value};
use std::fmt;

use super::currency::ActiveCurrency;
use super::paystack_event::{PaystackEvent, PaystackEventType};
use super::plan::BillingCycle;
use crate::domain::foundation::UserId;

/// A metadata value looked up under two names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataKey {
    /// Name of the direct field on the metadata object.
    pub direct: &'static str,
    /// `variable_name` of the matching `custom_fields` entry.
    pub variable_name: &'static str,
}

pub const USER_ID: MetadataKey = MetadataKey {
    direct: "userId",
    variable_name: "user_id",
};

pub const PLAN: MetadataKey = MetadataKey {
    direct: "plan",
    variable_name: "plan",
};

pub const BILLING_CYCLE: MetadataKey = MetadataKey {
    direct: "billingCycle",
    variable_name: "billing_cycle",
};

/// Where a metadata value may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `metadata.<direct>`
    DirectField,
    /// `metadata.custom_fields[*]` entry whose `variable_name` matches.
    CustomField,
}

/// Strategies in priority order.
pub const EXTRACTION_ORDER: [ExtractionStrategy; 2] =
    [ExtractionStrategy::DirectField, ExtractionStrategy::CustomField];

impl ExtractionStrategy {
    pub fn extract(&self, metadata: &Map<String, Value>, key: &MetadataKey) -> Option<String> {
        match self {
            ExtractionStrategy::DirectField => metadata.get(key.direct).and_then(scalar_text),
            ExtractionStrategy::CustomField => custom_fields(metadata)
                .iter()
                .filter(|entry| variable_name(entry) == Some(key.variable_name))
                .find_map(|entry| entry.get("value").and_then(scalar_text)),
        }
    }
}

/// Resolves `key` by trying each strategy in `EXTRACTION_ORDER`.
pub fn extract_metadata_value(metadata: &Map<String, Value>, key: &MetadataKey) -> Option<String> {
    EXTRACTION_ORDER
        .iter()
        .find_map(|strategy| strategy.extract(metadata, key))
}

fn custom_fields(metadata: &Map<String, Value>) -> &[Value] {
    metadata
        .get("custom_fields")
        .or_else(|| metadata.get("customFields"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn variable_name(entry: &Value) -> Option<&str> {
    entry
        .get("variable_name")
        .or_else(|| entry.get("variableName"))
        .and_then(Value::as_str)
}

/// Strings and numbers count; blank strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Metadata arrives as an object, or occasionally as a JSON-encoded string.
fn metadata_object(data: &Value) -> Map<String, Value> {
    match data.get("metadata") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Everything that could be pulled out of a `charge.success` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContext {
    pub reference: Option<String>,
    pub transaction_id: Option<String>,
    pub currency: Option<String>,
    pub user_id: Option<String>,
    pub plan: Option<String>,
    pub billing_cycle: Option<String>,
}

impl ExtractedContext {
    fn from_data(data: &Value) -> Self {
        let metadata = metadata_object(data);
        Self {
            reference: data.get("reference").and_then(scalar_text),
            transaction_id: data.get("id").and_then(scalar_text),
            currency: data.get("currency").and_then(scalar_text),
            user_id: extract_metadata_value(&metadata, &USER_ID),
            plan: extract_metadata_value(&metadata, &PLAN),
            billing_cycle: extract_metadata_value(&metadata, &BILLING_CYCLE),
        }
    }
}

/// Why a `charge.success` event could not be credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// reference, userId, plan or billingCycle unresolved.
    MissingRequiredData,
    /// billingCycle resolved to something other than monthly/yearly.
    InvalidBillingCycle,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingRequiredData => f.write_str("missing required data/metadata"),
            MalformedReason::InvalidBillingCycle => f.write_str("invalid billing cycle in metadata"),
        }
    }
}

/// A fully resolved, creditable charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSuccess {
    pub user_id: UserId,
    /// Plan label as sent; informational only.
    pub plan: String,
    pub billing_cycle: BillingCycle,
    pub reference: String,
    pub transaction_id: Option<String>,
    pub currency: Option<String>,
}

impl ChargeSuccess {
    /// The reported currency, when present and different from `active`.
    pub fn currency_mismatch(&self, active: &ActiveCurrency) -> Option<&str> {
        self.currency
            .as_deref()
            .filter(|reported| !active.matches_reported(reported))
    }
}

/// Normalized outcome of a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretedEvent {
    /// Not `charge.success`; acknowledge and do nothing.
    Ignored { event_type: String },
    /// `charge.success` that cannot be credited; acknowledge and alert.
    Malformed {
        reason: MalformedReason,
        context: ExtractedContext,
    },
    /// Ready for reconciliation.
    ChargeSucceeded(ChargeSuccess),
}

/// Interprets a verified event.
pub fn interpret(event: &PaystackEvent) -> InterpretedEvent {
    if event.parsed_type() != PaystackEventType::ChargeSuccess {
        return InterpretedEvent::Ignored {
            event_type: event.event.clone(),
        };
    }

    let context = ExtractedContext::from_data(&event.data);

    let (Some(reference), Some(user_id), Some(plan), Some(cycle)) = (
        context.reference.clone(),
        context.user_id.as_deref().and_then(|id| UserId::new(id).ok()),
        context.plan.clone(),
        context.billing_cycle.as_deref(),
    ) else {
        return InterpretedEvent::Malformed {
            reason: MalformedReason::MissingRequiredData,
            context,
        };
    };

    let Ok(billing_cycle) = cycle.parse::<BillingCycle>() else {
        return InterpretedEvent::Malformed {
            reason: MalformedReason::InvalidBillingCycle,
            context,
        };
    };

    InterpretedEvent::ChargeSucceeded(ChargeSuccess {
        user_id,
        plan,
        billing_cycle,
        reference,
        transaction_id: context.transaction_id,
        currency: context.currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::paystack_event::PaystackEventBuilder;
    use serde_json::json;

    fn success(event: &PaystackEvent) -> ChargeSuccess {
        match interpret(event) {
            InterpretedEvent::ChargeSucceeded(s) => s,
            other => panic!("Expected ChargeSucceeded, got {:?}", other),
        }
    }

    fn malformed(event: &PaystackEvent) -> (MalformedReason, ExtractedContext) {
        match interpret(event) {
            InterpretedEvent::Malformed { reason, context } => (reason, context),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Strategy Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn direct_field_wins_over_custom_field() {
        let metadata = json!({
            "userId": "direct",
            "custom_fields": [{"variable_name": "user_id", "value": "fallback"}]
        });
        let map = metadata.as_object().unwrap();
        assert_eq!(extract_metadata_value(map, &USER_ID).as_deref(), Some("direct"));
    }

    #[test]
    fn custom_field_used_when_direct_missing() {
        let metadata = json!({
            "customFields": [
                {"variableName": "plan", "value": "premium"},
                {"variableName": "user_id", "value": "abc123"}
            ]
        });
        let map = metadata.as_object().unwrap();
        assert_eq!(
            ExtractionStrategy::CustomField.extract(map, &USER_ID).as_deref(),
            Some("abc123")
        );
        assert_eq!(ExtractionStrategy::DirectField.extract(map, &USER_ID), None);
    }

    #[test]
    fn blank_direct_value_falls_through_to_custom_field() {
        let metadata = json!({
            "billingCycle": "  ",
            "custom_fields": [{"variable_name": "billing_cycle", "value": "yearly"}]
        });
        let map = metadata.as_object().unwrap();
        assert_eq!(
            extract_metadata_value(map, &BILLING_CYCLE).as_deref(),
            Some("yearly")
        );
    }

    #[test]
    fn non_scalar_values_are_ignored() {
        let metadata = json!({"userId": {"nested": true}, "plan": null});
        let map = metadata.as_object().unwrap();
        assert_eq!(extract_metadata_value(map, &USER_ID), None);
        assert_eq!(extract_metadata_value(map, &PLAN), None);
    }

    // ══════════════════════════════════════════════════════════════
    // Interpretation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn non_charge_events_are_ignored() {
        let event = PaystackEventBuilder::new("subscription.create").build();
        assert_eq!(
            interpret(&event),
            InterpretedEvent::Ignored {
                event_type: "subscription.create".to_string()
            }
        );
    }

    #[test]
    fn complete_direct_metadata_succeeds() {
        let event = PaystackEventBuilder::charge_success()
            .reference("PRO_MONTHLY_u1_1")
            .transaction_id(4_099_260_516)
            .currency("KES")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "monthly")
            .build();

        let s = success(&event);
        assert_eq!(s.user_id.as_str(), "u1");
        assert_eq!(s.plan, "premium");
        assert_eq!(s.billing_cycle, BillingCycle::Monthly);
        assert_eq!(s.reference, "PRO_MONTHLY_u1_1");
        assert_eq!(s.transaction_id.as_deref(), Some("4099260516"));
        assert_eq!(s.currency.as_deref(), Some("KES"));
    }

    #[test]
    fn user_id_recovered_from_custom_fields() {
        let event = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "yearly")
            .custom_field("user_id", "abc123")
            .build();

        assert_eq!(success(&event).user_id.as_str(), "abc123");
    }

    #[test]
    fn missing_billing_cycle_is_malformed() {
        let event = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .build();

        let (reason, context) = malformed(&event);
        assert_eq!(reason, MalformedReason::MissingRequiredData);
        assert_eq!(context.user_id.as_deref(), Some("u1"));
        assert_eq!(context.billing_cycle, None);
    }

    #[test]
    fn missing_plan_is_malformed() {
        let event = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("userId", "u1")
            .metadata("billingCycle", "monthly")
            .build();
        assert_eq!(malformed(&event).0, MalformedReason::MissingRequiredData);
    }

    #[test]
    fn missing_reference_is_malformed() {
        let event = PaystackEventBuilder::charge_success()
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "monthly")
            .build();
        assert_eq!(malformed(&event).0, MalformedReason::MissingRequiredData);
    }

    #[test]
    fn unknown_billing_cycle_is_malformed() {
        let event = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "weekly")
            .build();

        let (reason, context) = malformed(&event);
        assert_eq!(reason, MalformedReason::InvalidBillingCycle);
        assert_eq!(context.billing_cycle.as_deref(), Some("weekly"));
    }

    #[test]
    fn stringified_metadata_is_decoded() {
        let event = PaystackEvent {
            event: "charge.success".to_string(),
            data: json!({
                "reference": "r1",
                "id": "T123",
                "metadata": "{\"userId\":\"u1\",\"plan\":\"premium\",\"billingCycle\":\"yearly\"}"
            }),
        };
        let s = success(&event);
        assert_eq!(s.billing_cycle, BillingCycle::Yearly);
        assert_eq!(s.transaction_id.as_deref(), Some("T123"));
    }

    #[test]
    fn empty_string_metadata_is_malformed() {
        let event = PaystackEvent {
            event: "charge.success".to_string(),
            data: json!({"reference": "r1", "metadata": ""}),
        };
        assert_eq!(malformed(&event).0, MalformedReason::MissingRequiredData);
    }

    #[test]
    fn currency_mismatch_is_reported_not_rejected() {
        let event = PaystackEventBuilder::charge_success()
            .reference("r1")
            .currency("NGN")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "monthly")
            .build();
        let kes = ActiveCurrency::resolve("KES", None).unwrap();

        let s = success(&event);
        assert_eq!(s.currency_mismatch(&kes), Some("NGN"));
    }

    #[test]
    fn matching_or_absent_currency_is_not_a_mismatch() {
        let kes = ActiveCurrency::resolve("KES", None).unwrap();
        let base = PaystackEventBuilder::charge_success()
            .reference("r1")
            .metadata("userId", "u1")
            .metadata("plan", "premium")
            .metadata("billingCycle", "monthly");

        assert_eq!(success(&base.clone().build()).currency_mismatch(&kes), None);
        assert_eq!(success(&base.currency("kes").build()).currency_mismatch(&kes), None);
    }
}
