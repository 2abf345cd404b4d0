//! HTTP adapters - REST API implementations.

pub mod account;
pub mod billing;
pub mod middleware;

pub use account::{account_router, AccountAppState};
pub use billing::{billing_router, BillingAppState};
