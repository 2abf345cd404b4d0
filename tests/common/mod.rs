//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use axum::response::Response;
use hmac::{Hmac, Mac};
use serde_json::{json, Map, Value};
use sha2::Sha512;

/// Hex HMAC-SHA512 of `body` under `secret`, as Paystack computes it.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Paystack webhook body builder.
pub struct WebhookBody {
    event: String,
    data: Map<String, Value>,
    metadata: Map<String, Value>,
    custom_fields: Vec<Value>,
}

impl WebhookBody {
    pub fn charge_success() -> Self {
        Self::new("charge.success")
    }

    pub fn new(event: &str) -> Self {
        Self {
            event: event.to_string(),
            data: Map::new(),
            metadata: Map::new(),
            custom_fields: Vec::new(),
        }
    }

    pub fn reference(mut self, reference: &str) -> Self {
        self.data.insert("reference".to_string(), json!(reference));
        self
    }

    pub fn transaction_id(mut self, id: i64) -> Self {
        self.data.insert("id".to_string(), json!(id));
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.data.insert("currency".to_string(), json!(currency));
        self
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), json!(value));
        self
    }

    pub fn custom_field(mut self, variable_name: &str, value: &str) -> Self {
        self.custom_fields.push(json!({
            "display_name": variable_name,
            "variable_name": variable_name,
            "value": value,
        }));
        self
    }

    pub fn to_body(self) -> Vec<u8> {
        let mut metadata = self.metadata;
        if !self.custom_fields.is_empty() {
            metadata.insert("custom_fields".to_string(), Value::Array(self.custom_fields));
        }
        let mut data = self.data;
        data.insert("metadata".to_string(), Value::Object(metadata));
        serde_json::to_vec(&json!({"event": self.event, "data": data})).unwrap()
    }
}

pub async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
