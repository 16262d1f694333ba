/// Department model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE departamento (
///     id SERIAL PRIMARY KEY,
///     nome TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cadastro_shared::models::departamento::{Departamento, DepartamentoFilter};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let created = Departamento::create(&pool, "Financeiro").await?;
///
/// let found = Departamento::list(&pool, &DepartamentoFilter {
///     nome: Some("finan".to_string()),
///     ..Default::default()
/// })
/// .await?;
/// assert!(found.iter().any(|d| d.id == created.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;

use super::ModelError;
use crate::db::executor::{self, StorageError};
use crate::query::{
    build_filter_query, build_update_query, BoundQuery, Column, FilterSpec, SqlValue, TableSchema,
    UpdateSpec,
};

/// Table descriptor; `nome` is the only writable column
pub const SCHEMA: TableSchema = TableSchema {
    table: "departamento",
    id_column: "id",
    mutable_columns: &[Column::required("nome")],
    returning: "id, nome",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Departamento {
    pub id: i32,
    pub nome: String,
}

/// List filters; `None` fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartamentoFilter {
    /// Exact id
    pub id: Option<i32>,

    /// Case-insensitive substring of `nome`
    pub nome: Option<String>,
}

impl DepartamentoFilter {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new()
            .exact("id", self.id)
            .contains("nome", self.nome.as_deref())
    }
}

impl Departamento {
    /// Lists departments matching every supplied filter
    ///
    /// An empty result is not an error.
    pub async fn list(
        pool: &PgPool,
        filter: &DepartamentoFilter,
    ) -> Result<Vec<Self>, StorageError> {
        let query = build_filter_query(&SCHEMA.select_all(), &filter.to_spec());
        executor::fetch_all(pool, &query).await
    }

    /// Inserts a department and returns it with its generated id
    pub async fn create(pool: &PgPool, nome: &str) -> Result<Self, StorageError> {
        let query = BoundQuery {
            sql: "INSERT INTO departamento (nome) VALUES ($1) RETURNING id, nome".to_string(),
            params: vec![SqlValue::from(nome)],
        };
        executor::fetch_one(pool, &query).await
    }

    /// Applies the fields present in `body`
    ///
    /// # Returns
    ///
    /// The updated row, or `None` if no department has this id
    ///
    /// # Errors
    ///
    /// - `ModelError::Query` for an empty body, unknown fields or a blank `nome`
    /// - `ModelError::Storage` if the statement fails
    pub async fn update(
        pool: &PgPool,
        id: i32,
        body: &Map<String, Value>,
    ) -> Result<Option<Self>, ModelError> {
        let spec = UpdateSpec::from_json(&SCHEMA, body)?;
        let query = build_update_query(&SCHEMA, &spec, id)?;
        Ok(executor::fetch_optional(pool, &query).await?)
    }

    /// Deletes a department
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if none had this id
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, StorageError> {
        let query = BoundQuery {
            sql: "DELETE FROM departamento WHERE id = $1".to_string(),
            params: vec![SqlValue::Int(id)],
        };
        Ok(executor::execute(pool, &query).await? > 0)
    }
}
