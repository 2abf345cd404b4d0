//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::billing::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::account::{
    LogExerciseCommand, LogExerciseHandler, ProvisionSubscriberHandler, SendWelcomeEmailCommand,
    SendWelcomeEmailError, SendWelcomeEmailHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::dto::{
    ExerciseResponse, LogExerciseRequest, MessageResponse, SubscriberResponse,
    WelcomeEmailRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AccountAppState {
    pub provision_handler: Arc<ProvisionSubscriberHandler>,
    pub welcome_email_handler: Arc<SendWelcomeEmailHandler>,
    pub log_exercise_handler: Arc<LogExerciseHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/account/subscriber
///
/// 201 when the record was created by this call, 200 when it already existed.
pub async fn provision_subscriber(
    State(state): State<AccountAppState>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match state.provision_handler.handle(&user).await {
        Ok(result) => {
            let status = if result.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(SubscriberResponse::from(result))).into_response()
        }
        Err(error) => handle_account_error(error),
    }
}

/// POST /api/account/welcome-email
pub async fn send_welcome_email(
    State(state): State<AccountAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<WelcomeEmailRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected welcome-email body");
            return welcome_error(SendWelcomeEmailError::InvalidArgument(
                "Request body must be JSON.".to_string(),
            ));
        }
    };

    let mut cmd = SendWelcomeEmailCommand::from(request);
    if cmd.email.is_none() {
        cmd.email = user.email().map(str::to_string);
    }
    if cmd.name.is_none() {
        cmd.name = user.display_name.clone();
    }

    match state.welcome_email_handler.handle(cmd).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Welcome email sent successfully".to_string(),
            }),
        )
            .into_response(),
        Err(error) => welcome_error(error),
    }
}

/// POST /api/account/exercises
pub async fn log_exercise(
    State(state): State<AccountAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<LogExerciseRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected log-exercise body");
            return handle_account_error(DomainError::validation(
                "body",
                "Request body must be JSON with name, caloriesBurned and durationMinutes.",
            ));
        }
    };

    let cmd = LogExerciseCommand {
        user_id: user.id,
        name: request.name,
        calories_burned: request.calories_burned,
        duration_minutes: request.duration_minutes,
    };

    match state.log_exercise_handler.handle(cmd).await {
        Ok(logged) => (StatusCode::CREATED, Json(ExerciseResponse::from(logged))).into_response(),
        Err(error) => handle_account_error(error),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

fn welcome_error(error: SendWelcomeEmailError) -> Response {
    let body = ErrorResponse::new(error.code(), error.to_string());
    (error.status_code(), Json(body)).into_response()
}

fn handle_account_error(error: DomainError) -> Response {
    match error.code {
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid-argument", error.message)),
        )
            .into_response(),
        ErrorCode::SubscriberNotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "not-found",
                "No subscriber record for this account.",
            )),
        )
            .into_response(),
        _ => {
            tracing::error!(code = %error.code, error = %error.message, "Account request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal", "Internal server error.")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400() {
        let response = handle_account_error(DomainError::validation("name", "bad"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_subscriber_maps_to_404() {
        let response =
            handle_account_error(DomainError::new(ErrorCode::SubscriberNotFound, "gone"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_error_maps_to_500() {
        let response = handle_account_error(DomainError::database("down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
