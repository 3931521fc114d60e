//! Outbound notification port.

use async_trait::async_trait;
use thiserror::Error;

/// A plain-text message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Failures while building or delivering a message.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The sender or recipient is not a valid mailbox.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("message build error: {0}")]
    Message(String),

    /// The transport rejected the message or could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivers outbound messages. One call sends one message; there are no retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message`.
    async fn send(&self, message: OutboundMessage) -> Result<(), NotificationError>;
}
