//! Approval notification template.

use stratologia_core::model::Application;
use stratologia_core::notify::OutboundMessage;

/// Domain of the synthetic recipient addresses. Citizens have no stored
/// contact, so the address is derived from the citizen id.
pub const RECIPIENT_DOMAIN: &str = "example.test";

/// Returns the recipient address for a citizen.
#[must_use]
pub fn recipient_for(citizen_id: i64) -> String {
    format!("{citizen_id}@{RECIPIENT_DOMAIN}")
}

/// Builds the message sent when `application` is approved.
#[must_use]
pub fn approval_message(application: &Application) -> OutboundMessage {
    OutboundMessage {
        to: recipient_for(application.citizen_id),
        subject: format!("Application #{} approved", application.id),
        body: format!(
            "Your application {} has been approved. Branch: {}",
            application.id, application.desired_branch
        ),
    }
}

#[cfg(test)]
mod tests {
    use stratologia_core::model::{ApplicationType, Branch, Status};
    use stratologia_test_support::fixed_instant;

    use super::*;

    #[test]
    fn test_approval_message_names_id_and_branch() {
        let application = Application {
            id: 5,
            citizen_id: 12,
            application_type: ApplicationType::Enlistment,
            desired_branch: Branch::Navy,
            status: Status::Approved,
            submitted_at: fixed_instant(),
        };

        let message = approval_message(&application);

        assert_eq!(message.to, "12@example.test");
        assert_eq!(message.subject, "Application #5 approved");
        assert_eq!(
            message.body,
            "Your application 5 has been approved. Branch: navy"
        );
    }
}
