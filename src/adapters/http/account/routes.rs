//! Axum router configuration for account endpoints.

use axum::{middleware, routing::post, Router};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{log_exercise, provision_subscriber, send_welcome_email, AccountAppState};

/// Account routes, mounted at `/api/account`. All require a bearer token.
///
/// - `POST /subscriber` - Provision the caller's free-plan record
/// - `POST /welcome-email` - Send the welcome email
/// - `POST /exercises` - Log a workout
pub fn account_routes() -> Router<AccountAppState> {
    Router::new()
        .route("/subscriber", post(provision_subscriber))
        .route("/welcome-email", post(send_welcome_email))
        .route("/exercises", post(log_exercise))
}

/// Complete account router with bearer auth applied.
pub fn account_router(state: AccountAppState, auth: AuthState) -> Router {
    Router::new()
        .nest(
            "/api/account",
            account_routes().layer(middleware::from_fn_with_state(auth, auth_middleware)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::email::MockEmailSender;
    use crate::adapters::memory::{InMemoryExerciseStore, InMemorySubscriberRepository};
    use crate::application::handlers::account::{
        LogExerciseHandler, ProvisionSubscriberHandler, SendWelcomeEmailHandler,
    };
    use crate::domain::billing::{Plan, Subscriber};
    use crate::domain::foundation::UserId;

    struct Harness {
        router: Router,
        repository: Arc<InMemorySubscriberRepository>,
        exercises: InMemoryExerciseStore,
        email: MockEmailSender,
    }

    async fn harness() -> Harness {
        let repository = Arc::new(
            InMemorySubscriberRepository::with_subscribers([Subscriber::new(
                UserId::new("member").unwrap(),
                Some("member@test.weightwise.app".to_string()),
            )])
            .await,
        );
        let exercises = InMemoryExerciseStore::new().with_subscribers((*repository).clone());
        let email = MockEmailSender::new();
        let welcome = Arc::new(SendWelcomeEmailHandler::new(Arc::new(email.clone())));

        let state = AccountAppState {
            provision_handler: Arc::new(
                ProvisionSubscriberHandler::new(repository.clone())
                    .with_welcome_email(welcome.clone()),
            ),
            welcome_email_handler: welcome,
            log_exercise_handler: Arc::new(LogExerciseHandler::new(Arc::new(exercises.clone()))),
        };
        let auth: AuthState = Arc::new(
            MockSessionValidator::new()
                .with_test_user("tok-member", "member")
                .with_test_user("tok-new", "newuser"),
        );

        Harness {
            router: account_router(state, auth),
            repository,
            exercises,
            email,
        }
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Provisioning
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn provisioning_new_caller_creates_free_record() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json("/api/account/subscriber", Some("tok-new"), json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["userId"], "newuser");
        assert_eq!(body["plan"], "free");
        assert_eq!(body["entitled"], false);
        assert_eq!(body["created"], true);

        let stored = h.repository.snapshot().await;
        let record = stored.iter().find(|s| s.user_id.as_str() == "newuser").unwrap();
        assert_eq!(record.plan, Plan::Free);

        let sent = h.email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "newuser@test.weightwise.app");
    }

    #[tokio::test]
    async fn provisioning_existing_caller_is_200() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json("/api/account/subscriber", Some("tok-member"), json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["created"], false);
        assert_eq!(h.repository.snapshot().await.len(), 1);
        assert!(h.email.sent().is_empty());
    }

    #[tokio::test]
    async fn provisioning_requires_auth() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json("/api/account/subscriber", None, json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.repository.snapshot().await.len(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Welcome email
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn welcome_email_uses_body_fields() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json(
                "/api/account/welcome-email",
                Some("tok-member"),
                json!({"email": "friend@x.io", "name": "Kip"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await["message"],
            "Welcome email sent successfully"
        );
        let sent = h.email.sent();
        assert_eq!(sent[0].to, "friend@x.io");
        assert_eq!(sent[0].subject, "Welcome to WeightWise!");
        assert!(sent[0].html.contains("Hi Kip,"));
    }

    #[tokio::test]
    async fn welcome_email_falls_back_to_caller_email() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json("/api/account/welcome-email", Some("tok-member"), json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.email.sent()[0].to, "member@test.weightwise.app");
    }

    #[tokio::test]
    async fn welcome_email_with_blank_email_is_400() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json(
                "/api/account/welcome-email",
                Some("tok-member"),
                json!({"email": "  "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"errorCode": "invalid-argument", "message": "Email is required"})
        );
        assert!(h.email.sent().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Exercises
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn logging_exercise_returns_201() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json(
                "/api/account/exercises",
                Some("tok-member"),
                json!({"name": "Swim", "caloriesBurned": 410, "durationMinutes": 40}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["name"], "Swim");
        assert_eq!(body["caloriesBurned"], 410.0);
        assert_eq!(h.exercises.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn logging_invalid_exercise_is_400() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json(
                "/api/account/exercises",
                Some("tok-member"),
                json!({"name": "", "caloriesBurned": 10}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["errorCode"], "invalid-argument");
        assert!(h.exercises.entries().await.is_empty());
    }

    #[tokio::test]
    async fn logging_before_provisioning_is_404() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(post_json(
                "/api/account/exercises",
                Some("tok-new"),
                json!({"name": "Run", "caloriesBurned": 200}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["errorCode"], "not-found");
    }
}
