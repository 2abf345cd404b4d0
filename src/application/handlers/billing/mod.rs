//! Billing handlers.
//!
//! ## Commands
//! - Processing Paystack webhooks (verify, interpret, reconcile)
//! - Initiating premium payments
//! - Sending weekly reports to premium subscribers
//!
//! ## Queries
//! - Checking premium entitlement

mod check_entitlement;
mod handle_paystack_webhook;
mod initiate_payment;
mod reconcile_subscription;
mod send_weekly_reports;

// Commands
pub use handle_paystack_webhook::{
    HandlePaystackWebhookCommand, HandlePaystackWebhookHandler, WebhookOutcome,
};
pub use initiate_payment::{
    InitiatePaymentCommand, InitiatePaymentError, InitiatePaymentHandler, InitiatePaymentResult,
};
pub use reconcile_subscription::{ReconcileResult, SubscriptionReconciler};
pub use send_weekly_reports::{
    render_report, ReportFailure, SendWeeklyReportsHandler, WeeklyReportSummary,
    REPORT_SUBJECT, REPORT_WINDOW_DAYS,
};

// Queries
pub use check_entitlement::{
    CheckEntitlementHandler, CheckEntitlementQuery, CheckEntitlementResult,
};
