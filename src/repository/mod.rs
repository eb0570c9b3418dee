//! Repository layer for database operations

pub mod crews;
pub mod equipment;
pub mod follow_ups;
pub mod school_versions;
pub mod schools;
pub mod students;
pub mod users;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool.
///
/// Queries are grouped per domain in the submodules as `<domain>_<action>`
/// methods. Methods taking a `&mut PgConnection` run on a caller-owned
/// transaction.
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Start a transaction; dropping it without commit rolls back
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}

/// Map a unique-constraint violation to a conflict with the given message
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}
