//! Shared application state.

use std::sync::Arc;

use stratologia_core::clock::Clock;
use stratologia_core::notify::Notifier;
use stratologia_core::repository::{ApplicationRepository, SubmissionStore};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for submission timestamps.
    pub clock: Arc<dyn Clock>,
    /// Transactional citizen and application writes for submissions.
    pub submissions: Arc<dyn SubmissionStore>,
    /// Application storage.
    pub applications: Arc<dyn ApplicationRepository>,
    /// Approval notifications.
    pub notifier: Arc<dyn Notifier>,
    /// Effective CORS origins, reported by the debug endpoint.
    pub allow_origins: Arc<[String]>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        submissions: Arc<dyn SubmissionStore>,
        applications: Arc<dyn ApplicationRepository>,
        notifier: Arc<dyn Notifier>,
        allow_origins: Vec<String>,
    ) -> Self {
        Self {
            clock,
            submissions,
            applications,
            notifier,
            allow_origins: allow_origins.into(),
        }
    }
}
