/// Runs [`BoundQuery`]s against the pool
///
/// The only place where statement text meets bind values. Failures come back
/// as [`StorageError`], with unique-constraint violations split out so the
/// HTTP layer can answer 409 instead of 500.

use sqlx::{postgres::PgRow, FromRow, PgPool};
use tracing::debug;

use crate::query::BoundQuery;

/// SQLSTATE for `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";

/// Error type for statement execution
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A `UNIQUE` constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other driver or server failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StorageError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StorageError::Database(err)
    }
}

/// Every matching row
pub async fn fetch_all<O>(pool: &PgPool, query: &BoundQuery) -> Result<Vec<O>, StorageError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    debug!(sql = %query.sql, params = query.params.len(), "fetch_all");
    Ok(query.query_as::<O>().fetch_all(pool).await?)
}

/// At most one row
pub async fn fetch_optional<O>(pool: &PgPool, query: &BoundQuery) -> Result<Option<O>, StorageError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    debug!(sql = %query.sql, params = query.params.len(), "fetch_optional");
    Ok(query.query_as::<O>().fetch_optional(pool).await?)
}

/// Exactly one row; zero rows is `sqlx::Error::RowNotFound`
pub async fn fetch_one<O>(pool: &PgPool, query: &BoundQuery) -> Result<O, StorageError>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    debug!(sql = %query.sql, params = query.params.len(), "fetch_one");
    Ok(query.query_as::<O>().fetch_one(pool).await?)
}

/// Runs a statement and returns the number of rows it touched
pub async fn execute(pool: &PgPool, query: &BoundQuery) -> Result<u64, StorageError> {
    debug!(sql = %query.sql, params = query.params.len(), "execute");
    let result = query.query().execute(pool).await?;
    Ok(result.rows_affected())
}
