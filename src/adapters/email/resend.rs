//! Resend email adapter.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EmailSender, OutgoingEmail};

/// Default Resend API endpoint.
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

/// Resend client configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: Option<SecretString>,
    from: String,
    api_base_url: String,
}

impl ResendConfig {
    /// `from` is a full header value, e.g. `WeightWise <reports@weightwise.app>`.
    pub fn new(api_key: Option<SecretString>, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: DEFAULT_RESEND_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends mail through the Resend REST API.
pub struct ResendEmailSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DomainError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Resend API key not configured")
        })?;

        let body = SendEmailBody {
            from: &self.config.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Could not reach Resend: {}", e.without_url()),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, to = %email.to, "Resend send failed");
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Resend API error (HTTP {})", status),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "p1@x.io".to_string(),
            subject: "Your Weekly Fitness Summary".to_string(),
            html: "<p>hi</p>".to_string(),
            text: "hi".to_string(),
        }
    }

    fn sender(base_url: &str) -> ResendEmailSender {
        ResendEmailSender::new(
            ResendConfig::new(
                Some(SecretString::new("re_test".to_string())),
                "WeightWise <reports@weightwise.app>",
            )
            .with_base_url(base_url),
        )
    }

    #[tokio::test]
    async fn posts_email_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_partial_json(json!({
                "from": "WeightWise <reports@weightwise.app>",
                "to": ["p1@x.io"],
                "subject": "Your Weekly Fitness Summary"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em_1"})))
            .expect(1)
            .mount(&server)
            .await;

        sender(&server.uri()).send(&email()).await.unwrap();
    }

    #[tokio::test]
    async fn rejection_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from"))
            .mount(&server)
            .await;

        let err = sender(&server.uri()).send(&email()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert_eq!(err.message, "Resend API error (HTTP 422)");
    }

    #[tokio::test]
    async fn unconfigured_sender_refuses() {
        let sender = ResendEmailSender::new(ResendConfig::new(None, "a@b.c"));
        assert!(!sender.is_configured());
        assert!(sender.send(&email()).await.is_err());
    }
}
