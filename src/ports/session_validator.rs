//! Session validation port for ID token validation.
//!
//! Provider-agnostic: implementations exist for OIDC/JWKS issuers and for
//! tests. All implementations must check signature, issuer, audience and
//! expiry before trusting any claim.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates bearer tokens and extracts the caller identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    ///
    /// # Errors
    ///
    /// - `InvalidToken` - malformed token or bad signature
    /// - `TokenExpired` - signature valid but expired
    /// - `ServiceUnavailable` - signing keys could not be fetched
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
