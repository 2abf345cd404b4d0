//! ProvisionSubscriberHandler - creates the caller's free-plan record.
//!
//! Idempotent: an existing record is returned untouched, so it is safe to
//! call on every sign-in and before every payment.

use std::sync::Arc;

use super::send_welcome_email::{SendWelcomeEmailCommand, SendWelcomeEmailHandler};
use crate::domain::billing::Subscriber;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode};
use crate::ports::SubscriberRepository;

/// The caller's record and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSubscriberResult {
    pub subscriber: Subscriber,
    pub created: bool,
}

/// Handler for subscriber provisioning.
pub struct ProvisionSubscriberHandler {
    repository: Arc<dyn SubscriberRepository>,
    welcome: Option<Arc<SendWelcomeEmailHandler>>,
}

impl ProvisionSubscriberHandler {
    pub fn new(repository: Arc<dyn SubscriberRepository>) -> Self {
        Self {
            repository,
            welcome: None,
        }
    }

    /// Greet newly created members by email.
    pub fn with_welcome_email(mut self, welcome: Arc<SendWelcomeEmailHandler>) -> Self {
        self.welcome = Some(welcome);
        self
    }

    /// # Errors
    ///
    /// `DatabaseError` when the record cannot be read or written. A failed
    /// welcome email is logged and never fails provisioning.
    pub async fn handle(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<ProvisionSubscriberResult, DomainError> {
        if let Some(existing) = self.repository.find_by_user_id(&caller.id).await? {
            return Ok(ProvisionSubscriberResult {
                subscriber: existing,
                created: false,
            });
        }

        let mut subscriber = Subscriber::new(caller.id.clone(), caller.email().map(str::to_string));
        if let Some(name) = caller
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            subscriber = subscriber.with_username(name);
        }

        match self.repository.create(&subscriber).await {
            Ok(()) => {}
            // Lost a race with a concurrent sign-in.
            Err(e) if e.code == ErrorCode::SubscriberAlreadyExists => {
                let existing = self.repository.find_by_user_id(&caller.id).await?.ok_or(e)?;
                return Ok(ProvisionSubscriberResult {
                    subscriber: existing,
                    created: false,
                });
            }
            Err(e) => {
                tracing::error!(user_id = %caller.id, error = %e, "Could not provision subscriber");
                return Err(e);
            }
        }

        tracing::info!(user_id = %caller.id, "Subscriber provisioned on free plan");
        self.greet(&subscriber).await;

        Ok(ProvisionSubscriberResult {
            subscriber,
            created: true,
        })
    }

    async fn greet(&self, subscriber: &Subscriber) {
        let Some(welcome) = &self.welcome else {
            return;
        };
        if subscriber.email.is_none() {
            tracing::info!(user_id = %subscriber.user_id, "No email on record; skipping welcome email");
            return;
        }

        let cmd = SendWelcomeEmailCommand {
            email: subscriber.email.clone(),
            name: subscriber.username.clone(),
        };
        if let Err(e) = welcome.handle(cmd).await {
            tracing::warn!(user_id = %subscriber.user_id, error = %e, "Welcome email not sent");
        }
    }
}
