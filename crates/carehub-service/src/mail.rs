//! Outgoing mail seam.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::info;

use carehub_core::config::MailConfig;
use carehub_core::result::AppResult;

/// A plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Delivers mail. Implementations decide the transport.
#[async_trait]
pub trait Mailer: Debug + Send + Sync + 'static {
    /// Send one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}

/// Mailer that only logs what it would send. Bodies are not logged since
/// they may carry recovery tokens.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Creates a mailer with the configured sender.
    pub fn new(config: &MailConfig) -> Self {
        Self {
            from: config.from_address.clone(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            body_bytes = message.body.len(),
            "Mail accepted for delivery"
        );
        Ok(())
    }
}
