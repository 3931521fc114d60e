//! Test notifiers — fake `Notifier` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use stratologia_core::notify::{NotificationError, Notifier, OutboundMessage};

/// Captures every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all messages sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: OutboundMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// A notifier whose transport is always unreachable. Counts attempts.
#[derive(Debug, Default)]
pub struct FailingNotifier {
    attempts: Mutex<usize>,
}

impl FailingNotifier {
    /// Creates a notifier that fails every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sends attempted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: OutboundMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        Err(NotificationError::Transport("connection refused".into()))
    }
}
