//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriberRepository` - subscriber records and subscription writes
//! - `PostgresExerciseLog` - workout logging
//! - `PostgresActivitySummaryReader` - weekly workout totals

mod activity_summary_reader;
mod exercise_log;
mod subscriber_repository;

pub use activity_summary_reader::PostgresActivitySummaryReader;
pub use exercise_log::PostgresExerciseLog;
pub use subscriber_repository::PostgresSubscriberRepository;
