//! `Notifier` backed by an unauthenticated SMTP relay (e.g. MailHog).

use std::fmt;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use stratologia_core::notify::{NotificationError, Notifier, OutboundMessage};

/// Relay host used when none is configured.
pub const DEFAULT_SMTP_HOST: &str = "mailhog";

/// Relay port used when none is configured.
pub const DEFAULT_SMTP_PORT: u16 = 1025;

/// Sender address used when none is configured.
pub const DEFAULT_FROM: &str = "noreply@stratologia.local";

/// Where and as whom to send mail.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Relay host name or address.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Sender mailbox.
    pub from: Mailbox,
}

impl MailerConfig {
    /// Builds a config, checking that `from` is a well-formed mailbox.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::InvalidAddress` if `from` does not parse.
    pub fn new(host: impl Into<String>, port: u16, from: &str) -> Result<Self, NotificationError> {
        let from = from
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("{from}: {e}")))?;
        Ok(Self {
            host: host.into(),
            port,
            from,
        })
    }
}

/// Sends each message over a plain SMTP connection. No TLS, no auth, no retry.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Creates a notifier for the relay in `config`. Does not connect yet.
    #[must_use]
    pub fn new(config: &MailerConfig) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            .port(config.port)
            .build();
        Self {
            transport,
            from: config.from.clone(),
        }
    }

    /// Assembles the wire message for `message`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::InvalidAddress` if the recipient does not
    /// parse, or `NotificationError::Message` if assembly fails.
    pub fn build_message(&self, message: &OutboundMessage) -> Result<Message, NotificationError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {e}", message.to)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| NotificationError::Message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: OutboundMessage) -> Result<(), NotificationError> {
        let email = self.build_message(&message)?;
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        debug!(code = %response.code(), "smtp relay accepted message");
        Ok(())
    }
}
