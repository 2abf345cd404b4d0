//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::account::{
    LogExerciseHandler, ProvisionSubscriberHandler, SendWelcomeEmailHandler,
};
pub use handlers::billing::{
    CheckEntitlementHandler, HandlePaystackWebhookHandler, InitiatePaymentHandler,
    SendWeeklyReportsHandler, SubscriptionReconciler,
};
