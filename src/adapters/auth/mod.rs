//! Authentication adapters implementing `SessionValidator`.
//!
//! - `OidcSessionValidator` - JWKS-backed JWT validation
//! - `MockSessionValidator` - fixed token table for tests

mod mock;
mod oidc;

pub use mock::MockSessionValidator;
pub use oidc::{OidcConfig, OidcSessionValidator};
