/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded schema migrations
/// - `executor`: runs bound statements and classifies failures
///
/// Row types and their queries live in the `models` module.
///
/// # Example
///
/// ```no_run
/// use cadastro_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod executor;
pub mod migrations;
pub mod pool;

pub use executor::StorageError;
