//! `PostgreSQL` implementation of the citizen and application repositories.
//!
//! Enum columns are `VARCHAR` holding the lowercase variant name. Reads and
//! status updates run as single statements against the pool. Submissions run
//! in a transaction that rolls back when the unit is dropped uncommitted, so
//! the connection is returned whether the work succeeds or fails.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use stratologia_core::error::DomainError;
use stratologia_core::model::{
    Application, Citizen, NewApplication, NewCitizen, ParseEnumError, Status,
};
use stratologia_core::repository::{
    ApplicationRepository, CitizenRepository, SubmissionStore, SubmissionUnit,
};

const CITIZEN_COLUMNS: &str = "id, first_name, last_name, national_id";
const APPLICATION_COLUMNS: &str = "id, citizen_id, type, desired_branch, status, submitted_at";

/// PostgreSQL-backed store for citizens and applications.
#[derive(Debug, Clone)]
pub struct PgEnlistmentRepository {
    pool: PgPool,
}

impl PgEnlistmentRepository {
    /// Creates a new `PgEnlistmentRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {err}"))
}

fn decode_enum<T>(row: &PgRow, column: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.try_get(column).map_err(infrastructure)?;
    raw.parse()
        .map_err(|e| DomainError::Infrastructure(format!("corrupt {column} column: {e}")))
}

fn citizen_from_row(row: &PgRow) -> Result<Citizen, DomainError> {
    Ok(Citizen {
        id: row.try_get("id").map_err(infrastructure)?,
        first_name: row.try_get("first_name").map_err(infrastructure)?,
        last_name: row.try_get("last_name").map_err(infrastructure)?,
        national_id: row.try_get("national_id").map_err(infrastructure)?,
    })
}

fn application_from_row(row: &PgRow) -> Result<Application, DomainError> {
    let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(infrastructure)?;
    Ok(Application {
        id: row.try_get("id").map_err(infrastructure)?,
        citizen_id: row.try_get("citizen_id").map_err(infrastructure)?,
        application_type: decode_enum(row, "type")?,
        desired_branch: decode_enum(row, "desired_branch")?,
        status: decode_enum(row, "status")?,
        submitted_at,
    })
}

async fn select_citizen(
    conn: &mut PgConnection,
    national_id: &str,
) -> Result<Option<Citizen>, DomainError> {
    let row = sqlx::query(&format!(
        "SELECT {CITIZEN_COLUMNS} FROM citizens WHERE national_id = $1"
    ))
    .bind(national_id)
    .fetch_optional(conn)
    .await
    .map_err(infrastructure)?;

    row.as_ref().map(citizen_from_row).transpose()
}

/// Inserts the citizen unless the national ID is taken, in which case the
/// existing row is read back untouched.
async fn insert_or_fetch_citizen(
    conn: &mut PgConnection,
    citizen: &NewCitizen,
) -> Result<Citizen, DomainError> {
    let inserted = sqlx::query(&format!(
        "INSERT INTO citizens (first_name, last_name, national_id) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (national_id) DO NOTHING \
         RETURNING {CITIZEN_COLUMNS}"
    ))
    .bind(&citizen.first_name)
    .bind(&citizen.last_name)
    .bind(&citizen.national_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(infrastructure)?;

    if let Some(row) = inserted {
        let stored = citizen_from_row(&row)?;
        debug!(citizen_id = stored.id, "citizen row written");
        return Ok(stored);
    }

    // A concurrent submission created the citizen first.
    select_citizen(conn, &citizen.national_id)
        .await?
        .ok_or_else(|| {
            DomainError::Infrastructure(format!(
                "citizen {:?} conflicted on insert but is not visible",
                citizen.national_id
            ))
        })
}

async fn insert_application_row(
    conn: &mut PgConnection,
    application: &NewApplication,
) -> Result<Application, DomainError> {
    let row = sqlx::query(&format!(
        "INSERT INTO applications (citizen_id, type, desired_branch, status, submitted_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {APPLICATION_COLUMNS}"
    ))
    .bind(application.citizen_id)
    .bind(application.application_type.as_str())
    .bind(application.desired_branch.as_str())
    .bind(application.status.as_str())
    .bind(application.submitted_at)
    .fetch_one(conn)
    .await
    .map_err(infrastructure)?;

    application_from_row(&row)
}

/// A submission running inside one database transaction. The transaction is
/// taken out on commit; a later call fails instead of running outside it.
pub struct PgSubmission {
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
}

fn finished_transaction() -> DomainError {
    DomainError::Infrastructure("submission transaction already committed".into())
}

#[async_trait]
impl CitizenRepository for PgSubmission {
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Citizen>, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished_transaction)?;
        select_citizen(&mut **tx, national_id).await
    }

    async fn insert_citizen(&self, citizen: NewCitizen) -> Result<Citizen, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished_transaction)?;
        insert_or_fetch_citizen(&mut **tx, &citizen).await
    }
}

#[async_trait]
impl SubmissionUnit for PgSubmission {
    fn citizens(&self) -> &dyn CitizenRepository {
        self
    }

    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished_transaction)?;
        insert_application_row(&mut **tx, &application).await
    }

    async fn commit(&self) -> Result<(), DomainError> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or_else(finished_transaction)?;
        tx.commit().await.map_err(infrastructure)
    }
}

#[async_trait]
impl SubmissionStore for PgEnlistmentRepository {
    async fn begin_submission(&self) -> Result<Box<dyn SubmissionUnit>, DomainError> {
        let tx = self.pool.begin().await.map_err(infrastructure)?;
        Ok(Box::new(PgSubmission {
            tx: Mutex::new(Some(tx)),
        }))
    }
}

#[async_trait]
impl ApplicationRepository for PgEnlistmentRepository {
    async fn find_application(&self, id: i64) -> Result<Option<Application>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        row.as_ref().map(application_from_row).transpose()
    }

    async fn list_applications(
        &self,
        status: Option<Status>,
        limit: usize,
    ) -> Result<Vec<Application>, DomainError> {
        let limit = i64::try_from(limit)
            .map_err(|_| DomainError::Validation(format!("limit out of range: {limit}")))?;

        let rows = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE ($1::varchar IS NULL OR status = $1) \
             ORDER BY submitted_at DESC, id DESC \
             LIMIT $2"
        ))
        .bind(status.map(Status::as_str))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        rows.iter().map(application_from_row).collect()
    }

    async fn update_status(&self, id: i64, status: Status) -> Result<Application, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE applications SET status = $2 WHERE id = $1 RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?
        .ok_or(DomainError::ApplicationNotFound(id))?;

        application_from_row(&row)
    }
}
