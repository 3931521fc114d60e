//! Commands and queries for the enlistment context.
//!
//! Enum-valued fields arrive as raw strings and are parsed by the handlers,
//! so an out-of-enum value is a validation error rather than a decode error.

use uuid::Uuid;

/// Command to submit a new application on behalf of a citizen.
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// National ID of the applicant; the citizen is created if unseen.
    pub citizen_national_id: String,
    /// `deferment` or `enlistment`.
    pub application_type: String,
    /// `army`, `navy`, or `air`.
    pub desired_branch: String,
}

/// Command to approve an application.
#[derive(Debug, Clone)]
pub struct ApproveApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The application identifier.
    pub application_id: i64,
}

/// Command to reject an application.
#[derive(Debug, Clone)]
pub struct RejectApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The application identifier.
    pub application_id: i64,
}

/// Query for the most recent applications.
#[derive(Debug, Clone, Default)]
pub struct ListApplications {
    /// Optional `pending`, `approved`, or `rejected` filter.
    pub status: Option<String>,
}
