//! Routes for submitting, listing, and deciding applications.

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use stratologia_core::model::Status;
use stratologia_enlistment::application::command_handlers::{self, DecisionOutcome};
use stratologia_enlistment::application::dispatcher::NotificationOutcome;
use stratologia_enlistment::application::query_handlers::{self, ApplicationSummary};
use stratologia_enlistment::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /applications.
#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    /// National ID of the applicant.
    pub citizen_national_id: String,
    /// `deferment` or `enlistment`.
    #[serde(rename = "type")]
    pub application_type: String,
    /// `army`, `navy`, or `air`.
    pub desired_branch: String,
}

/// Query string for GET /applications.
#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsParams {
    /// Optional status filter.
    pub status: Option<String>,
}

/// Identity and status of an application after a command.
#[derive(Debug, Serialize)]
pub struct ApplicationStatusResponse {
    /// The application identifier.
    pub id: i64,
    /// Status after the command.
    pub status: Status,
    /// Outcome of the approval notification; absent for other commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationOutcome>,
}

impl From<DecisionOutcome> for ApplicationStatusResponse {
    fn from(outcome: DecisionOutcome) -> Self {
        Self {
            id: outcome.application.id,
            status: outcome.application.status,
            notification: outcome.notification,
        }
    }
}

/// POST /applications
#[instrument(skip(state, request))]
async fn submit_application(
    State(state): State<AppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<Json<ApplicationStatusResponse>, ApiError> {
    let command = commands::SubmitApplication {
        correlation_id: Uuid::new_v4(),
        citizen_national_id: request.citizen_national_id,
        application_type: request.application_type,
        desired_branch: request.desired_branch,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_application command");

    let application = command_handlers::handle_submit_application(
        &command,
        state.clock.as_ref(),
        &*state.submissions,
    )
    .await?;

    Ok(Json(ApplicationStatusResponse {
        id: application.id,
        status: application.status,
        notification: None,
    }))
}

/// GET /applications
#[instrument(skip(state))]
async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListApplicationsParams>,
) -> Result<Json<Vec<ApplicationSummary>>, ApiError> {
    let query = commands::ListApplications {
        status: params.status,
    };

    let summaries = query_handlers::list_applications(&query, &*state.applications).await?;

    Ok(Json(summaries))
}

/// POST /applications/{id}/approve
#[instrument(skip(state))]
async fn approve_application(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationStatusResponse>, ApiError> {
    let command = commands::ApproveApplication {
        correlation_id: Uuid::new_v4(),
        application_id,
    };

    info!(correlation_id = %command.correlation_id, "handling approve_application command");

    let outcome = command_handlers::handle_approve_application(
        &command,
        &*state.applications,
        &*state.notifier,
    )
    .await?;

    Ok(Json(outcome.into()))
}

/// POST /applications/{id}/reject
#[instrument(skip(state))]
async fn reject_application(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationStatusResponse>, ApiError> {
    let command = commands::RejectApplication {
        correlation_id: Uuid::new_v4(),
        application_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reject_application command");

    let outcome =
        command_handlers::handle_reject_application(&command, &*state.applications).await?;

    Ok(Json(outcome.into()))
}

/// Returns the router for the applications resource.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            post(submit_application).get(list_applications),
        )
        .route("/applications/{id}/approve", post(approve_application))
        .route("/applications/{id}/reject", post(reject_application))
}
