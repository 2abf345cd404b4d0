//! Outbound email port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

/// Escapes text for interpolation into an HTML email body.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Sends transactional email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Whether an API key is available. Batch jobs skip sending otherwise.
    fn is_configured(&self) -> bool;

    /// Send one email.
    ///
    /// # Errors
    ///
    /// `ExternalServiceError` if the provider rejects the message or is
    /// unreachable.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Ann"), "Ann");
    }

    #[test]
    fn email_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn EmailSender) {}
    }
}
