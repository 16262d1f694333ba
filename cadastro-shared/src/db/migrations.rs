/// Embedded schema migrations
///
/// Migration files live in `cadastro-shared/migrations/` and are compiled
/// into the binary with `sqlx::migrate!`. Each one is a reversible pair:
/// `<version>_<name>.up.sql` and `<version>_<name>.down.sql`.
///
/// # Example
///
/// ```no_run
/// use cadastro_shared::db::pool::{create_pool, DatabaseConfig};
/// use cadastro_shared::db::migrations::{get_migration_status, run_migrations};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// let status = get_migration_status(&pool).await?;
/// assert!(status.is_up_to_date);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{debug, error, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied versus embedded migrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub applied_migrations: usize,

    /// Migrations compiled into this binary
    pub known_migrations: usize,

    pub latest_version: Option<i64>,

    /// Every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Applies every pending migration
///
/// # Errors
///
/// Returns the first migration failure; that migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}

/// Reports how many migrations have been applied
///
/// A database that has never been migrated reports zero applied.
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let known = MIGRATOR.iter().filter(|m| m.migration_type.is_up_migration()).count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(status_from(0, None, known));
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(status_from(count as usize, latest_version, known))
}

fn status_from(applied: usize, latest_version: Option<i64>, known: usize) -> MigrationStatus {
    MigrationStatus {
        applied_migrations: applied,
        known_migrations: known,
        latest_version,
        is_up_to_date: applied >= known,
    }
}
