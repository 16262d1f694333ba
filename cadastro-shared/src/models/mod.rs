/// Database models
///
/// Each model owns its table's statements. Lists and updates go through the
/// query builder; everything runs through `db::executor`.
///
/// # Models
///
/// - `departamento`: departments
/// - `empresa`: companies with contact and address fields
/// - `usuario`: user accounts and credential lookup

pub mod departamento;
pub mod empresa;
pub mod usuario;

use crate::db::StorageError;
use crate::query::QueryError;

/// Error type for model operations that build statements from request data
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The request data cannot form a valid statement
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The statement failed to run
    #[error(transparent)]
    Storage(#[from] StorageError),
}
