//! Approval notification dispatch.
//!
//! Runs after the status change has been committed. A failed send is
//! logged and reported to the caller; it never undoes the approval.

use serde::Serialize;
use stratologia_core::model::Application;
use stratologia_core::notify::Notifier;
use tracing::{info, warn};

use crate::domain::notifications::approval_message;

/// What happened to the notification for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// The transport accepted the message.
    Sent,
    /// The transport failed; the decision is still recorded.
    Failed,
}

/// Sends the approval message for `application`, exactly once.
pub async fn notify_approved(
    application: &Application,
    notifier: &dyn Notifier,
) -> NotificationOutcome {
    let message = approval_message(application);
    match notifier.send(message).await {
        Ok(()) => {
            info!(application_id = application.id, "approval notification sent");
            NotificationOutcome::Sent
        }
        Err(e) => {
            warn!(
                application_id = application.id,
                error = %e,
                "approval notification failed; approval remains committed"
            );
            NotificationOutcome::Failed
        }
    }
}
