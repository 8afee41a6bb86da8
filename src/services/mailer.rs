//! Trait and types for sending email through a hosted mail service.

use anyhow::Result;

/// A named binary file attached to an email.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

/// Abstraction over a mail provider (e.g., Resend).
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Sends `email` and returns the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}
