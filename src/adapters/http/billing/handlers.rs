//! HTTP handlers for billing endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::billing::{
    CheckEntitlementHandler, CheckEntitlementQuery, HandlePaystackWebhookCommand,
    HandlePaystackWebhookHandler, InitiatePaymentError, InitiatePaymentHandler,
};
use crate::domain::billing::SIGNATURE_HEADER;
use crate::domain::foundation::DomainError;

use super::dto::{EntitlementResponse, ErrorResponse, InitiatePaymentRequest, InitiatePaymentResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BillingAppState {
    pub webhook_handler: Arc<HandlePaystackWebhookHandler>,
    pub initiate_payment_handler: Arc<InitiatePaymentHandler>,
    pub entitlement_handler: Arc<CheckEntitlementHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/paystack
///
/// The body is taken as raw bytes; the signature covers exactly what was sent.
pub async fn handle_paystack_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaystackWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.webhook_handler.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, outcome.response_message()).into_response(),
        Err(err) => (err.status_code(), err.response_message()).into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/billing/payments/initiate
pub async fn initiate_payment(
    State(state): State<BillingAppState>,
    OptionalAuth(caller): OptionalAuth,
    body: Result<Json<InitiatePaymentRequest>, JsonRejection>,
) -> Result<Json<InitiatePaymentResponse>, InitiatePaymentApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) if caller.is_some() => {
            tracing::debug!(error = %rejection, "Rejected initiate-payment body");
            return Err(InitiatePaymentError::InvalidArgument(
                "Request body must be JSON with amount, currency and billingCycle.".to_string(),
            )
            .into());
        }
        Err(_) => InitiatePaymentRequest::default(),
    };

    let result = state
        .initiate_payment_handler
        .handle(caller.as_ref(), request.into())
        .await?;

    Ok(Json(result.into()))
}

/// GET /api/billing/entitlement
pub async fn get_entitlement(
    State(state): State<BillingAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<EntitlementResponse>, BillingApiError> {
    let result = state
        .entitlement_handler
        .handle(CheckEntitlementQuery { user_id: user.id })
        .await?;

    Ok(Json(result.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

pub struct InitiatePaymentApiError(InitiatePaymentError);

impl From<InitiatePaymentError> for InitiatePaymentApiError {
    fn from(err: InitiatePaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for InitiatePaymentApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (self.0.status_code(), Json(body)).into_response()
    }
}

/// Converts domain errors on read endpoints into HTTP responses.
pub struct BillingApiError(DomainError);

impl From<DomainError> for BillingApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> Response {
        tracing::error!(code = %self.0.code, error = %self.0.message, "Billing request failed");
        let body = ErrorResponse::new("internal", "Internal server error.");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
