//! Stratologia Store — PostgreSQL persistence for citizens and applications.

pub mod pg_repository;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;

pub use pg_repository::{PgEnlistmentRepository, PgSubmission};

/// Opens a connection pool against `database_url`.
///
/// # Errors
///
/// Returns the driver error if the database cannot be reached.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Applies the migrations under the workspace `migrations/` directory.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
