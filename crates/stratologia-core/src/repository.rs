//! Repository ports for citizens and applications.
//!
//! Reads and status updates are single calls that hold a connection only for
//! their own duration. A submission writes a citizen and an application, so
//! it runs inside a [`SubmissionUnit`] that commits both or neither.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::model::{Application, Citizen, NewApplication, NewCitizen, Status};

/// Lookup and creation of citizens.
#[async_trait]
pub trait CitizenRepository: Send + Sync {
    /// Finds a citizen by exact match on `national_id`.
    async fn find_by_national_id(&self, national_id: &str)
    -> Result<Option<Citizen>, DomainError>;

    /// Inserts a citizen and returns it with its assigned id.
    ///
    /// If a citizen with the same `national_id` already exists, the existing
    /// row is returned unchanged.
    async fn insert_citizen(&self, citizen: NewCitizen) -> Result<Citizen, DomainError>;
}

/// One submission's worth of writes, held in a transaction.
///
/// Nothing written through the unit is visible to other callers until
/// [`SubmissionUnit::commit`] succeeds. Dropping the unit without committing
/// discards every write made through it.
#[async_trait]
pub trait SubmissionUnit: Send + Sync {
    /// Citizen lookup and creation scoped to this unit.
    fn citizens(&self) -> &dyn CitizenRepository;

    /// Inserts an application and returns it with its assigned id.
    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, DomainError>;

    /// Makes the unit's writes durable. A unit can be committed once.
    async fn commit(&self) -> Result<(), DomainError>;
}

/// Source of [`SubmissionUnit`]s.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Opens a new unit of work.
    async fn begin_submission(&self) -> Result<Box<dyn SubmissionUnit>, DomainError>;
}

/// Storage of applications and their status.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Loads an application by id.
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError>;

    /// Lists applications most-recently-submitted first, optionally restricted
    /// to one status, returning at most `limit` rows.
    async fn list_applications(
        &self,
        status: Option<Status>,
        limit: usize,
    ) -> Result<Vec<Application>, DomainError>;

    /// Overwrites the status of an application and returns the updated row.
    ///
    /// Returns `DomainError::ApplicationNotFound` if no row has the given id.
    async fn update_status(&self, id: i64, status: Status) -> Result<Application, DomainError>;
}
