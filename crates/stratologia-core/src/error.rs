//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No application exists with the given id.
    #[error("application not found: {0}")]
    ApplicationNotFound(i64),

    /// Malformed or out-of-enum input, rejected before any write.
    #[error("validation error: {0}")]
    Validation(String),

    /// The store was unreachable or returned something undecodable.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
