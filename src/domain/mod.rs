//! Domain layer containing business logic and domain types.
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, caller identity)
//! - `billing` - Plans, subscriber records, Paystack webhook verification and interpretation

pub mod billing;
pub mod foundation;
