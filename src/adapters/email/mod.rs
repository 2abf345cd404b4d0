//! Email adapters.

mod mock;
mod resend;

pub use mock::MockEmailSender;
pub use resend::{ResendConfig, ResendEmailSender, DEFAULT_RESEND_BASE_URL};
