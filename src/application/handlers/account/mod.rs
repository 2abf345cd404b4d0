//! Account handlers.
//!
//! ## Commands
//! - Provisioning the caller's subscriber record
//! - Sending the welcome email
//! - Logging workouts

mod log_exercise;
mod provision_subscriber;
mod send_welcome_email;

pub use log_exercise::{LogExerciseCommand, LogExerciseHandler, MAX_EXERCISE_NAME_LEN};
pub use provision_subscriber::{ProvisionSubscriberHandler, ProvisionSubscriberResult};
pub use send_welcome_email::{
    render_welcome, SendWelcomeEmailCommand, SendWelcomeEmailError, SendWelcomeEmailHandler,
    FALLBACK_NAME, WELCOME_SUBJECT,
};
