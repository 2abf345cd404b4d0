//! Billing domain - plans, subscriber records, and Paystack webhooks.
//!
//! Everything here is pure: signature checking, event interpretation and
//! amount conversion do no I/O and can be tested without adapters.

mod currency;
mod interpreter;
mod paystack_event;
mod plan;
mod reference;
mod signature;
mod subscriber;
mod webhook_errors;

pub use currency::{builtin_minor_unit_factor, ActiveCurrency};
pub use interpreter::{
    extract_metadata_value, interpret, ChargeSuccess, ExtractedContext, ExtractionStrategy,
    InterpretedEvent, MalformedReason, MetadataKey, BILLING_CYCLE, EXTRACTION_ORDER, PLAN,
    USER_ID,
};
pub use paystack_event::{PaystackEvent, PaystackEventType};
pub use plan::{BillingCycle, Plan, PlanStatus};
pub use reference::PaymentReference;
pub use signature::{WebhookSignatureVerifier, SIGNATURE_HEADER};
pub use subscriber::{is_entitled, Subscriber, SubscriptionUpdate};
pub use webhook_errors::WebhookError;

#[cfg(test)]
pub(crate) use paystack_event::PaystackEventBuilder;
#[cfg(test)]
pub(crate) use signature::sign_payload;
