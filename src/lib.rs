//! WeightWise - premium subscription billing.
//!
//! Verifies and applies Paystack payment webhooks, starts checkouts for the
//! premium plan, answers entitlement checks, and sends the weekly fitness
//! report to premium subscribers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
