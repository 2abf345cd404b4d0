//! Paystack payment provider adapter.
//!
//! - `PaystackPaymentAdapter` - REST client for transaction initialization
//! - `MockPaymentProvider` - configurable in-process fake for tests
//!
//! Webhook signature checking lives in the billing domain; it needs only
//! the shared secret, not an API client.

mod api_types;
mod mock_payment_provider;
mod paystack_adapter;

pub use api_types::{CustomField, InitializeTransactionBody, PaystackMetadata};
pub use mock_payment_provider::MockPaymentProvider;
pub use paystack_adapter::{PaystackConfig, PaystackPaymentAdapter, DEFAULT_API_BASE_URL};
