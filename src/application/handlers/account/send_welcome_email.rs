//! SendWelcomeEmailHandler - greets a new member by email.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use crate::ports::{escape_html, EmailSender, OutgoingEmail};

pub const WELCOME_SUBJECT: &str = "Welcome to WeightWise!";

/// Greeting used when no display name is known.
pub const FALLBACK_NAME: &str = "there";

/// Command to send the welcome email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendWelcomeEmailCommand {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendWelcomeEmailError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl SendWelcomeEmailError {
    pub fn code(&self) -> &'static str {
        match self {
            SendWelcomeEmailError::InvalidArgument(_) => "invalid-argument",
            SendWelcomeEmailError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SendWelcomeEmailError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SendWelcomeEmailError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Handler for the welcome email.
pub struct SendWelcomeEmailHandler {
    email: Arc<dyn EmailSender>,
}

impl SendWelcomeEmailHandler {
    pub fn new(email: Arc<dyn EmailSender>) -> Self {
        Self { email }
    }

    /// # Errors
    ///
    /// - `InvalidArgument` when no recipient is given
    /// - `Internal` when no provider is configured or delivery fails
    pub async fn handle(&self, cmd: SendWelcomeEmailCommand) -> Result<(), SendWelcomeEmailError> {
        let Some(to) = non_blank(cmd.email.as_deref()) else {
            tracing::warn!("Welcome email requested without a recipient");
            return Err(SendWelcomeEmailError::InvalidArgument(
                "Email is required".to_string(),
            ));
        };

        if !self.email.is_configured() {
            tracing::error!("Email provider not configured; cannot send welcome email");
            return Err(SendWelcomeEmailError::Internal(
                "Email provider is not configured.".to_string(),
            ));
        }

        let message = render_welcome(to, non_blank(cmd.name.as_deref()));
        self.email.send(&message).await.map_err(|e| {
            tracing::error!(to, error = %e, "Welcome email failed");
            SendWelcomeEmailError::Internal(format!("Failed to send welcome email: {}", e.message))
        })?;

        tracing::info!(to, "Welcome email sent");
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the welcome email.
pub fn render_welcome(to: &str, name: Option<&str>) -> OutgoingEmail {
    let name = name.unwrap_or(FALLBACK_NAME);
    let html = format!(
        "<h1>Hi {name},</h1>\
         <p>Welcome aboard! We're thrilled to have you join the WeightWise community.</p>\
         <p>Get ready to track your progress, set goals, and achieve your fitness aspirations.</p>\
         <p>Log in to your dashboard to get started!</p>\
         <p>Best,</p>\
         <p>The WeightWise Team</p>",
        name = escape_html(name),
    );
    let text = format!(
        "Hi {name},\n\
         Welcome aboard! We're thrilled to have you join the WeightWise community.\n\
         Get ready to track your progress, set goals, and achieve your fitness aspirations.\n\
         Log in to your dashboard to get started!\n\
         Best,\n\
         The WeightWise Team\n",
        name = name,
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: WELCOME_SUBJECT.to_string(),
        html,
        text,
    }
}
