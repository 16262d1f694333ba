/// Injection-safe statement construction
///
/// Builds the two dynamic statement shapes the resources need: list
/// filters (`WHERE a = $1 AND b ILIKE $2`) and partial updates
/// (`SET a = $1, b = $2 WHERE id = $3`). Caller values only ever travel as
/// bind parameters; identifiers come from static [`TableSchema`]s.
///
/// # Modules
///
/// - [`value`]: bind values and [`BoundQuery`]
/// - [`schema`]: table descriptors and update allow-lists
/// - [`filter`]: [`FilterSpec`] and [`build_filter_query`]
/// - [`update`]: [`UpdateSpec`] and [`build_update_query`]

pub mod filter;
pub mod schema;
pub mod update;
pub mod value;

pub use filter::{build_filter_query, FilterSpec, MatchKind};
pub use schema::{Column, TableSchema};
pub use update::{build_update_query, UpdateSpec};
pub use value::{BoundQuery, SqlValue};

/// Error type for statement construction
///
/// Every variant is a caller mistake and maps to 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Update with no fields
    #[error("Nenhum campo para atualizar foi enviado.")]
    EmptyUpdate,

    /// Field is not an updatable column
    #[error("Campo não permitido: {0}")]
    UnknownColumn(String),

    /// NULL or blank text for a required column
    #[error("Campo obrigatório não pode ser vazio: {0}")]
    NullNotAllowed(&'static str),

    /// Value type the column cannot hold
    #[error("Valor inválido para o campo: {0}")]
    UnsupportedValue(String),
}

impl QueryError {
    /// Offending field, if the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryError::EmptyUpdate => None,
            QueryError::UnknownColumn(c) | QueryError::UnsupportedValue(c) => Some(c.as_str()),
            QueryError::NullNotAllowed(c) => Some(*c),
        }
    }
}
