//! Axum router configuration for billing endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{get_entitlement, handle_paystack_webhook, initiate_payment, BillingAppState};

/// Caller-facing routes, mounted at `/api/billing`.
///
/// - `POST /payments/initiate` - Start a Paystack checkout
/// - `GET /entitlement` - Caller's premium access
pub fn billing_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/payments/initiate", post(initiate_payment))
        .route("/entitlement", get(get_entitlement))
}

/// Provider callbacks, mounted at `/api/webhooks`. Authenticated by signature.
///
/// - `POST /paystack` - Paystack event delivery
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/paystack", post(handle_paystack_webhook))
}

/// Complete billing router with bearer auth applied to caller-facing routes.
pub fn billing_router(state: BillingAppState, auth: AuthState) -> Router {
    Router::new()
        .nest(
            "/api/billing",
            billing_routes().layer(middleware::from_fn_with_state(auth, auth_middleware)),
        )
        .nest("/api/webhooks", webhook_routes())
        .with_state(state)
}
