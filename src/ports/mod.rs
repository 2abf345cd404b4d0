//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriberRepository` - subscriber record persistence
//! - `PaymentProvider` - transaction initialization at the payment gateway
//! - `SessionValidator` - bearer token validation
//! - `EmailSender` - transactional email
//! - `ActivitySummaryReader` - workout totals for reports
//! - `ExerciseLog` - workout logging

mod activity_summary_reader;
mod email_sender;
mod exercise_log;
mod payment_provider;
mod session_validator;
mod subscriber_repository;

pub use activity_summary_reader::{ActivitySummary, ActivitySummaryReader};
pub use email_sender::{escape_html, EmailSender, OutgoingEmail};
pub use exercise_log::{ExerciseLog, LoggedExercise, NewExercise};
pub use payment_provider::{
    InitializeTransactionRequest, InitializedTransaction, PaymentError, PaymentErrorCode,
    PaymentProvider, TransactionMetadata,
};
pub use session_validator::SessionValidator;
pub use subscriber_repository::SubscriberRepository;
