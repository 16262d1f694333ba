/// Bind values and bound statements
///
/// A [`BoundQuery`] pairs statement text with the values for its `$n`
/// placeholders, in placeholder order. Values never appear in the text.

use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::{Query, QueryAs},
    FromRow, Postgres,
};

use super::QueryError;

/// A single bind parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// `INTEGER`, used for `SERIAL` ids
    Int(i32),

    /// `TEXT`
    Text(String),

    /// SQL `NULL`, typed as text
    Null,
}

impl SqlValue {
    /// Converts a JSON request value for `column`
    ///
    /// Strings bind as text, numbers as their decimal text (every mutable
    /// column is `TEXT`), and `null` as NULL.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsupportedValue` for booleans, arrays and objects
    pub fn from_json(column: &str, value: &Value) -> Result<Self, QueryError> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Number(n) => Ok(SqlValue::Text(n.to_string())),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                Err(QueryError::UnsupportedValue(column.to_string()))
            }
        }
    }

    /// True for NULL and for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.trim().is_empty(),
            SqlValue::Int(_) => false,
        }
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Statement text plus ordered bind parameters
///
/// `params[i]` is the value for placeholder `$(i + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl BoundQuery {
    /// Statement with no parameters
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Number of `$n` placeholders the statement expects
    pub fn placeholder_count(&self) -> usize {
        self.params.len()
    }

    /// Prepares a row-mapping query with every parameter bound
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        self.params
            .iter()
            .fold(sqlx::query_as::<_, O>(&self.sql), |q, param| match param {
                SqlValue::Int(v) => q.bind(*v),
                SqlValue::Text(s) => q.bind(s.as_str()),
                SqlValue::Null => q.bind(None::<String>),
            })
    }

    /// Prepares a plain statement with every parameter bound
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |q, param| match param {
                SqlValue::Int(v) => q.bind(*v),
                SqlValue::Text(s) => q.bind(s.as_str()),
                SqlValue::Null => q.bind(None::<String>),
            })
    }
}
