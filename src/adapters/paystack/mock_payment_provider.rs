//! Mock payment provider for testing.
//!
//! Records every initialize request and returns either a configured
//! response or an injected error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{
    InitializeTransactionRequest, InitializedTransaction, PaymentError, PaymentProvider,
};

/// Mock payment provider for testing.
#[derive(Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

struct MockState {
    configured: bool,
    next_error: Option<PaymentError>,
    requests: Vec<InitializeTransactionRequest>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    /// A configured provider that accepts every request.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                configured: true,
                next_error: None,
                requests: Vec::new(),
            })),
        }
    }

    /// A provider with no secret key.
    pub fn unconfigured() -> Self {
        let mock = Self::new();
        mock.state().configured = false;
        mock
    }

    /// Fail the next call with `error`.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<InitializeTransactionRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<InitializeTransactionRequest> {
        self.state().requests.last().cloned()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn is_configured(&self) -> bool {
        self.state().configured
    }

    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<InitializedTransaction, PaymentError> {
        let mut state = self.state();
        if !state.configured {
            return Err(PaymentError::configuration("Paystack secret key not configured"));
        }
        let reference = request.reference.clone();
        state.requests.push(request);
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(InitializedTransaction {
            authorization_url: Some(format!("https://checkout.paystack.com/{}", reference)),
            access_code: Some(format!("ac_{}", reference)),
            reference: Some(reference),
        })
    }
}
