//! HTTP middleware for axum.
//!
//! - `auth` - Bearer authentication middleware and extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAuth};
