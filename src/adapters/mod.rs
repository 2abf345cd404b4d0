//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Bearer token validation (OIDC, mock)
//! - `email` - Transactional email (Resend, mock)
//! - `http` - axum routes and middleware
//! - `memory` - In-memory repositories for tests and local runs
//! - `paystack` - Paystack transaction API client
//! - `postgres` - PostgreSQL repositories

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod paystack;
pub mod postgres;
