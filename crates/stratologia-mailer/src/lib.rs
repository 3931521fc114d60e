//! Stratologia Mailer — SMTP delivery of outbound notifications.

mod smtp;

pub use smtp::{DEFAULT_FROM, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, MailerConfig, SmtpNotifier};
