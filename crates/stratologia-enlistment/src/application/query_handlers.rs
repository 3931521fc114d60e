//! Query handlers for the enlistment context.

use serde::Serialize;
use stratologia_core::error::DomainError;
use stratologia_core::model::{Application, ApplicationType, Branch, Status};
use stratologia_core::repository::ApplicationRepository;

use crate::application::command_handlers::parse_field;
use crate::domain::commands::ListApplications;

/// Upper bound on rows returned by one listing.
pub const LIST_LIMIT: usize = 100;

/// Read-only view of one application in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    /// The application identifier.
    pub id: i64,
    /// Current status.
    pub status: Status,
    /// Request kind.
    #[serde(rename = "type")]
    pub application_type: ApplicationType,
    /// Requested branch.
    pub desired_branch: Branch,
    /// Owning citizen.
    pub citizen_id: i64,
}

impl From<Application> for ApplicationSummary {
    fn from(application: Application) -> Self {
        Self {
            id: application.id,
            status: application.status,
            application_type: application.application_type,
            desired_branch: application.desired_branch,
            citizen_id: application.citizen_id,
        }
    }
}

/// Lists at most [`LIST_LIMIT`] applications, most recently submitted first,
/// optionally restricted to one status.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the status filter is not a known
/// status and `DomainError::Infrastructure` if the store fails.
pub async fn list_applications(
    query: &ListApplications,
    repo: &dyn ApplicationRepository,
) -> Result<Vec<ApplicationSummary>, DomainError> {
    let status: Option<Status> = query
        .status
        .as_deref()
        .map(|raw| parse_field("status", raw))
        .transpose()?;

    let rows = repo.list_applications(status, LIST_LIMIT).await?;
    Ok(rows.into_iter().map(ApplicationSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use stratologia_core::clock::Clock;
    use stratologia_core::model::{NewApplication, NewCitizen};
    use stratologia_core::repository::SubmissionStore;
    use stratologia_test_support::{FailingStore, InMemoryStore, SteppingClock};

    use super::*;

    async fn seed(store: &InMemoryStore, clock: &dyn Clock, statuses: &[Status]) {
        let unit = store.begin_submission().await.unwrap();
        let citizen = unit
            .citizens()
            .insert_citizen(NewCitizen::placeholder("AB123"))
            .await
            .unwrap();
        for status in statuses {
            unit.insert_application(NewApplication {
                citizen_id: citizen.id,
                application_type: ApplicationType::Deferment,
                desired_branch: Branch::Army,
                status: *status,
                submitted_at: clock.now(),
            })
            .await
            .unwrap();
        }
        unit.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_without_filter_returns_most_recent_first() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = SteppingClock::default();
        seed(
            &store,
            &clock,
            &[Status::Pending, Status::Approved, Status::Rejected],
        )
        .await;

        // Act
        let summaries = list_applications(&ListApplications::default(), &store)
            .await
            .unwrap();

        // Assert
        let ids: Vec<i64> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_with_filter_returns_only_matching_status() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = SteppingClock::default();
        seed(
            &store,
            &clock,
            &[
                Status::Approved,
                Status::Pending,
                Status::Approved,
                Status::Rejected,
            ],
        )
        .await;
        let query = ListApplications {
            status: Some("approved".to_owned()),
        };

        // Act
        let summaries = list_applications(&query, &store).await.unwrap();

        // Assert
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.status == Status::Approved));
        assert_eq!(summaries[0].id, 3);
        assert_eq!(summaries[1].id, 1);
    }

    #[tokio::test]
    async fn test_list_is_capped_at_limit() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = SteppingClock::default();
        seed(&store, &clock, &[Status::Pending; 105]).await;

        // Act
        let summaries = list_applications(&ListApplications::default(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(summaries.len(), LIST_LIMIT);
        assert_eq!(summaries[0].id, 105);
        assert_eq!(summaries[LIST_LIMIT - 1].id, 6);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status_filter() {
        let query = ListApplications {
            status: Some("archived".to_owned()),
        };

        let result = list_applications(&query, &InMemoryStore::new()).await;

        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "status: invalid status: \"archived\"");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_propagates_store_failure() {
        let result = list_applications(&ListApplications::default(), &FailingStore).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_summary_serializes_type_field_name() {
        let summary = ApplicationSummary {
            id: 1,
            status: Status::Pending,
            application_type: ApplicationType::Enlistment,
            desired_branch: Branch::Navy,
            citizen_id: 3,
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "status": "pending",
                "type": "enlistment",
                "desired_branch": "navy",
                "citizen_id": 3
            })
        );
    }
}
