//! Test stores — in-memory and failing repository implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stratologia_core::error::DomainError;
use stratologia_core::model::{Application, Citizen, NewApplication, NewCitizen, Status};
use stratologia_core::repository::{
    ApplicationRepository, CitizenRepository, SubmissionStore, SubmissionUnit,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    citizens: Vec<Citizen>,
    applications: Vec<Application>,
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX - 1) + 1
}

impl Tables {
    fn find_citizen(&self, national_id: &str) -> Option<Citizen> {
        self.citizens
            .iter()
            .find(|c| c.national_id == national_id)
            .cloned()
    }

    fn insert_citizen(&mut self, citizen: NewCitizen) -> Citizen {
        if let Some(existing) = self.find_citizen(&citizen.national_id) {
            return existing;
        }

        let row = Citizen {
            id: next_id(self.citizens.len()),
            first_name: citizen.first_name,
            last_name: citizen.last_name,
            national_id: citizen.national_id,
        };
        self.citizens.push(row.clone());
        row
    }

    fn insert_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Application, DomainError> {
        if !self.citizens.iter().any(|c| c.id == application.citizen_id) {
            return Err(DomainError::Infrastructure(format!(
                "foreign key violation: citizen {} does not exist",
                application.citizen_id
            )));
        }

        let row = Application {
            id: next_id(self.applications.len()),
            citizen_id: application.citizen_id,
            application_type: application.application_type,
            desired_branch: application.desired_branch,
            status: application.status,
            submitted_at: application.submitted_at,
        };
        self.applications.push(row.clone());
        Ok(row)
    }
}

/// A store that keeps both tables in memory, assigning ids from 1 upwards
/// the way a serial column would. Implements every repository port.
///
/// A submission unit works on a copy of the tables and writes the copy back
/// on commit, so an abandoned unit leaves no trace.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    reject_applications: bool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose application inserts always fail, as if
    /// the database dropped the connection mid-submission.
    #[must_use]
    pub fn rejecting_applications() -> Self {
        Self {
            reject_applications: true,
            ..Self::default()
        }
    }

    /// Number of citizen rows.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn citizen_count(&self) -> usize {
        self.tables.lock().unwrap().citizens.len()
    }

    /// Number of application rows.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn application_count(&self) -> usize {
        self.tables.lock().unwrap().applications.len()
    }

    /// Snapshot of the application table in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn applications(&self) -> Vec<Application> {
        self.tables.lock().unwrap().applications.clone()
    }
}

#[async_trait]
impl CitizenRepository for InMemoryStore {
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Citizen>, DomainError> {
        Ok(self.tables.lock().unwrap().find_citizen(national_id))
    }

    async fn insert_citizen(&self, citizen: NewCitizen) -> Result<Citizen, DomainError> {
        Ok(self.tables.lock().unwrap().insert_citizen(citizen))
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn begin_submission(&self) -> Result<Box<dyn SubmissionUnit>, DomainError> {
        let working = self.tables.lock().unwrap().clone();
        Ok(Box::new(InMemorySubmission {
            committed: Arc::clone(&self.tables),
            working: Mutex::new(Some(working)),
            reject_applications: self.reject_applications,
        }))
    }
}

/// Unit of work over an [`InMemoryStore`]. `working` is `None` once committed.
struct InMemorySubmission {
    committed: Arc<Mutex<Tables>>,
    working: Mutex<Option<Tables>>,
    reject_applications: bool,
}

fn finished_unit() -> DomainError {
    DomainError::Infrastructure("submission already committed".into())
}

#[async_trait]
impl CitizenRepository for InMemorySubmission {
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Citizen>, DomainError> {
        let working = self.working.lock().unwrap();
        let tables = working.as_ref().ok_or_else(finished_unit)?;
        Ok(tables.find_citizen(national_id))
    }

    async fn insert_citizen(&self, citizen: NewCitizen) -> Result<Citizen, DomainError> {
        let mut working = self.working.lock().unwrap();
        let tables = working.as_mut().ok_or_else(finished_unit)?;
        Ok(tables.insert_citizen(citizen))
    }
}

#[async_trait]
impl SubmissionUnit for InMemorySubmission {
    fn citizens(&self) -> &dyn CitizenRepository {
        self
    }

    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, DomainError> {
        if self.reject_applications {
            return Err(DomainError::Infrastructure(
                "connection reset during application insert".into(),
            ));
        }
        let mut working = self.working.lock().unwrap();
        let tables = working.as_mut().ok_or_else(finished_unit)?;
        tables.insert_application(application)
    }

    async fn commit(&self) -> Result<(), DomainError> {
        let tables = self.working.lock().unwrap().take().ok_or_else(finished_unit)?;
        *self.committed.lock().unwrap() = tables;
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_applications(
        &self,
        status: Option<Status>,
        limit: usize,
    ) -> Result<Vec<Application>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn update_status(&self, id: i64, status: Status) -> Result<Application, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(DomainError::ApplicationNotFound(id))?;
        row.status = status;
        Ok(row.clone())
    }
}

/// A store whose backing database is always unreachable.
#[derive(Debug, Default)]
pub struct FailingStore;

fn unreachable_store<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl CitizenRepository for FailingStore {
    async fn find_by_national_id(
        &self,
        _national_id: &str,
    ) -> Result<Option<Citizen>, DomainError> {
        unreachable_store()
    }

    async fn insert_citizen(&self, _citizen: NewCitizen) -> Result<Citizen, DomainError> {
        unreachable_store()
    }
}

#[async_trait]
impl SubmissionStore for FailingStore {
    async fn begin_submission(&self) -> Result<Box<dyn SubmissionUnit>, DomainError> {
        unreachable_store()
    }
}

#[async_trait]
impl ApplicationRepository for FailingStore {
    async fn find_application(&self, _id: i64) -> Result<Option<Application>, DomainError> {
        unreachable_store()
    }

    async fn list_applications(
        &self,
        _status: Option<Status>,
        _limit: usize,
    ) -> Result<Vec<Application>, DomainError> {
        unreachable_store()
    }

    async fn update_status(&self, _id: i64, _status: Status) -> Result<Application, DomainError> {
        unreachable_store()
    }
}
