//! Paystack webhook event types.
//!
//! The envelope is typed; `data` stays a raw JSON value because its shape
//! depends on the event and only `charge.success` is ever inspected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::webhook_errors::WebhookError;

/// Paystack webhook envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaystackEvent {
    /// Event type, e.g. `charge.success`.
    pub event: String,

    /// Event-specific payload.
    #[serde(default)]
    pub data: Value,
}

impl PaystackEvent {
    /// Parses a verified request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the body is not a JSON object
    /// with a string `event` field.
    pub fn from_slice(payload: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    pub fn parsed_type(&self) -> PaystackEventType {
        PaystackEventType::from_str(&self.event)
    }
}

/// Event types with special handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaystackEventType {
    ChargeSuccess,
    Other,
}

impl PaystackEventType {
    pub fn from_str(s: &str) -> Self {
        match s {
            "charge.success" => PaystackEventType::ChargeSuccess,
            _ => PaystackEventType::Other,
        }
    }
}

/// Builder for webhook payloads in tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct PaystackEventBuilder {
    event: String,
    reference: Option<String>,
    id: Option<Value>,
    currency: Option<String>,
    metadata: serde_json::Map<String, Value>,
    custom_fields: Vec<Value>,
}

#[cfg(test)]
impl PaystackEventBuilder {
    pub fn charge_success() -> Self {
        Self::new("charge.success")
    }

    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            reference: None,
            id: None,
            currency: None,
            metadata: serde_json::Map::new(),
            custom_fields: Vec::new(),
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn transaction_id(mut self, id: i64) -> Self {
        self.id = Some(Value::from(id));
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets a direct metadata field, e.g. `userId`.
    pub fn metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Appends an entry to the `custom_fields` list.
    pub fn custom_field(mut self, variable_name: &str, value: impl Into<Value>) -> Self {
        self.custom_fields.push(serde_json::json!({
            "display_name": variable_name,
            "variable_name": variable_name,
            "value": value.into(),
        }));
        self
    }

    pub fn build(self) -> PaystackEvent {
        let mut metadata = self.metadata;
        if !self.custom_fields.is_empty() {
            metadata.insert("custom_fields".to_string(), Value::Array(self.custom_fields));
        }
        let mut data = serde_json::Map::new();
        if let Some(reference) = self.reference {
            data.insert("reference".to_string(), Value::String(reference));
        }
        if let Some(id) = self.id {
            data.insert("id".to_string(), id);
        }
        if let Some(currency) = self.currency {
            data.insert("currency".to_string(), Value::String(currency));
        }
        data.insert("metadata".to_string(), Value::Object(metadata));
        PaystackEvent {
            event: self.event,
            data: Value::Object(data),
        }
    }

    /// Serialized body bytes, as the provider would send them.
    pub fn to_body(self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).unwrap_or_default()
    }
}
