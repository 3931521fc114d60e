//! Command handlers for the enlistment context.
//!
//! Each handler validates its command, then talks to the repository ports.
//! Nothing is written until every field has been parsed.

use std::str::FromStr;

use stratologia_core::clock::Clock;
use stratologia_core::error::DomainError;
use stratologia_core::model::{Application, ApplicationType, Branch, NewApplication, Status};
use stratologia_core::notify::Notifier;
use stratologia_core::repository::{ApplicationRepository, SubmissionStore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::citizen_resolver::{resolve_or_create, validate_national_id};
use crate::application::dispatcher::{NotificationOutcome, notify_approved};
use crate::domain::aggregates::{Decision, Transition};
use crate::domain::commands::{ApproveApplication, RejectApplication, SubmitApplication};

/// Result of recording a decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The application as persisted after the decision.
    pub application: Application,
    /// Set for approvals only.
    pub notification: Option<NotificationOutcome>,
}

/// Parses a raw enum field, turning a bad value into a validation error.
pub(crate) fn parse_field<T>(field: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = stratologia_core::model::ParseEnumError>,
{
    raw.parse()
        .map_err(|e| DomainError::Validation(format!("{field}: {e}")))
}

/// Handles the `SubmitApplication` command: validates the input, resolves or
/// creates the citizen, and stores a new `pending` application stamped with
/// the clock's current time.
///
/// The citizen and the application are written in one unit of work: if any
/// step fails, neither row is kept.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the national ID length or an enum
/// value is invalid, and `DomainError::Infrastructure` if the store fails.
pub async fn handle_submit_application(
    command: &SubmitApplication,
    clock: &dyn Clock,
    store: &dyn SubmissionStore,
) -> Result<Application, DomainError> {
    validate_national_id(&command.citizen_national_id)?;
    let application_type: ApplicationType = parse_field("type", &command.application_type)?;
    let desired_branch: Branch = parse_field("desired_branch", &command.desired_branch)?;

    let unit = store.begin_submission().await?;
    let citizen = resolve_or_create(&command.citizen_national_id, unit.citizens()).await?;

    let application = unit
        .insert_application(NewApplication {
            citizen_id: citizen.id,
            application_type,
            desired_branch,
            status: Status::Pending,
            submitted_at: clock.now(),
        })
        .await?;
    unit.commit().await?;

    info!(
        correlation_id = %command.correlation_id,
        application_id = application.id,
        citizen_id = citizen.id,
        "application submitted"
    );

    Ok(application)
}

async fn record_decision(
    application_id: i64,
    decision: Decision,
    correlation_id: Uuid,
    repo: &dyn ApplicationRepository,
) -> Result<Application, DomainError> {
    let current = repo
        .find_application(application_id)
        .await?
        .ok_or(DomainError::ApplicationNotFound(application_id))?;

    let transition = Transition::plan(current.status, decision);
    if transition.overrides_decision() {
        warn!(
            %correlation_id,
            application_id,
            from = %transition.from,
            to = %transition.to,
            "overriding an already decided application"
        );
    }

    let updated = repo.update_status(application_id, transition.to).await?;
    info!(
        %correlation_id,
        application_id,
        decision = decision.name(),
        "decision recorded"
    );
    Ok(updated)
}

/// Handles the `ApproveApplication` command: sets the status to `approved`,
/// then sends the approval notification. A failed send is reported in the
/// outcome and does not undo the approval.
///
/// # Errors
///
/// Returns `DomainError::ApplicationNotFound` if the id is unknown and
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_approve_application(
    command: &ApproveApplication,
    repo: &dyn ApplicationRepository,
    notifier: &dyn Notifier,
) -> Result<DecisionOutcome, DomainError> {
    let application = record_decision(
        command.application_id,
        Decision::Approve,
        command.correlation_id,
        repo,
    )
    .await?;

    let notification = notify_approved(&application, notifier).await;

    Ok(DecisionOutcome {
        application,
        notification: Some(notification),
    })
}

/// Handles the `RejectApplication` command: sets the status to `rejected`.
/// No notification is sent.
///
/// # Errors
///
/// Returns `DomainError::ApplicationNotFound` if the id is unknown and
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_reject_application(
    command: &RejectApplication,
    repo: &dyn ApplicationRepository,
) -> Result<DecisionOutcome, DomainError> {
    let application = record_decision(
        command.application_id,
        Decision::Reject,
        command.correlation_id,
        repo,
    )
    .await?;

    Ok(DecisionOutcome {
        application,
        notification: None,
    })
}
