//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/webhooks/paystack` - Paystack event delivery
//! - `POST /api/billing/payments/initiate` - Start a premium checkout
//! - `GET /api/billing/entitlement` - Caller's premium access

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::BillingAppState;
pub use routes::{billing_router, billing_routes, webhook_routes};
