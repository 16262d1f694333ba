/// Company model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE empresa (
///     id SERIAL PRIMARY KEY,
///     nome TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE,
///     cnpj TEXT,
///     telefone1 TEXT, telefone2 TEXT,
///     celular1 TEXT, celular2 TEXT,
///     cep TEXT, logradouro TEXT, numero TEXT, complemento TEXT,
///     bairro TEXT, cidade TEXT, uf TEXT
/// );
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

const COLUMNS: &str = "id, nome, email, cnpj, telefone1, telefone2, celular1, celular2, \
                       cep, logradouro, numero, complemento, bairro, cidade, uf";

/// Table descriptor
///
/// `nome` and `email` are required; every contact and address column may be
/// cleared with `null`.
pub const SCHEMA: TableSchema = TableSchema {
    table: "empresa",
    id_column: "id",
    mutable_columns: &[
        Column::required("nome"),
        Column::required("email"),
        Column::optional("cnpj"),
        Column::optional("telefone1"),
        Column::optional("telefone2"),
        Column::optional("celular1"),
        Column::optional("celular2"),
        Column::optional("cep"),
        Column::optional("logradouro"),
        Column::optional("numero"),
        Column::optional("complemento"),
        Column::optional("bairro"),
        Column::optional("cidade"),
        Column::optional("uf"),
    ],
    returning: COLUMNS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Empresa {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub cnpj: Option<String>,
    pub telefone1: Option<String>,
    pub telefone2: Option<String>,
    pub celular1: Option<String>,
    pub celular2: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
}

/// Input for creating a company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmpresa {
    pub nome: String,
    pub email: String,
    pub cnpj: Option<String>,
    pub telefone1: Option<String>,
    pub telefone2: Option<String>,
    pub celular1: Option<String>,
    pub celular2: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
}

impl NewEmpresa {
    fn into_query(self) -> BoundQuery {
        let sql = format!(
            "INSERT INTO empresa (nome, email, cnpj, telefone1, telefone2, celular1, celular2, \
             cep, logradouro, numero, complemento, bairro, cidade, uf) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            COLUMNS
        );

        BoundQuery {
            sql,
            params: vec![
                self.nome.into(),
                self.email.into(),
                self.cnpj.into(),
                self.telefone1.into(),
                self.telefone2.into(),
                self.celular1.into(),
                self.celular2.into(),
                self.cep.into(),
                self.logradouro.into(),
                self.numero.into(),
                self.complemento.into(),
                self.bairro.into(),
                self.cidade.into(),
                self.uf.into(),
            ],
        }
    }
}

/// List filters; `None` fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmpresaFilter {
    /// Exact id
    pub id: Option<i32>,

    /// Case-insensitive substring of `nome`
    pub nome: Option<String>,

    /// Exact CNPJ
    pub cnpj: Option<String>,
}

impl EmpresaFilter {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new()
            .exact("id", self.id)
            .contains("nome", self.nome.as_deref())
            .exact("cnpj", self.cnpj.as_deref())
    }
}

impl Empresa {
    /// Lists companies matching every supplied filter
    pub async fn list(pool: &PgPool, filter: &EmpresaFilter) -> Result<Vec<Self>, StorageError> {
        let query = build_filter_query(&SCHEMA.select_all(), &filter.to_spec());
        executor::fetch_all(pool, &query).await
    }

    /// Inserts a company and returns it with its generated id
    ///
    /// # Errors
    ///
    /// `StorageError::UniqueViolation` if the email is already registered
    pub async fn create(pool: &PgPool, data: NewEmpresa) -> Result<Self, StorageError> {
        executor::fetch_one(pool, &data.into_query()).await
    }

    /// Applies the allow-listed fields present in `body`
    ///
    /// Returns `None` if no company has this id.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        body: &Map<String, Value>,
    ) -> Result<Option<Self>, ModelError> {
        let spec = UpdateSpec::from_json(&SCHEMA, body)?;
        let query = build_update_query(&SCHEMA, &spec, id)?;
        Ok(executor::fetch_optional(pool, &query).await?)
    }

    /// Deletes a company; `false` if none had this id
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, StorageError> {
        let query = BoundQuery {
            sql: "DELETE FROM empresa WHERE id = $1".to_string(),
            params: vec![SqlValue::Int(id)],
        };
        Ok(executor::execute(pool, &query).await? > 0)
    }
}
