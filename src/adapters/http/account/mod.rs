//! HTTP adapter for account endpoints.
//!
//! - `POST /api/account/subscriber` - Provision the caller's record
//! - `POST /api/account/welcome-email` - Send the welcome email
//! - `POST /api/account/exercises` - Log a workout

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::AccountAppState;
pub use routes::{account_router, account_routes};
