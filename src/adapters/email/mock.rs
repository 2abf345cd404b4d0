//! Mock email sender for testing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EmailSender, OutgoingEmail};

/// Records sent mail; can be told to fail for specific recipients.
#[derive(Clone)]
pub struct MockEmailSender {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    configured: bool,
    failing_recipients: HashSet<String>,
    sent: Vec<OutgoingEmail>,
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                configured: true,
                ..MockState::default()
            })),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn fail_for(&self, recipient: &str) {
        self.state().failing_recipients.insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.state().sent.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    fn is_configured(&self) -> bool {
        self.state().configured
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DomainError> {
        let mut state = self.state();
        if state.failing_recipients.contains(&email.to) {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Simulated send failure to {}", email.to),
            ));
        }
        state.sent.push(email.clone());
        Ok(())
    }
}
