/// Partial updates
///
/// An [`UpdateSpec`] holds only the columns a caller sent. Column names are
/// resolved through the table's allow-list when the spec is built, so the
/// statement text is assembled from static identifiers only.

use serde_json::{Map, Value};

use super::{
    schema::TableSchema,
    value::{BoundQuery, SqlValue},
    QueryError,
};

/// Column assignments for one `UPDATE`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSpec {
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value` after checking it against the allow-list
    ///
    /// # Errors
    ///
    /// - `QueryError::UnknownColumn` if `column` is not mutable in `schema`
    /// - `QueryError::NullNotAllowed` for NULL or blank text on a required column
    pub fn set(
        &mut self,
        schema: &TableSchema,
        column: &str,
        value: SqlValue,
    ) -> Result<(), QueryError> {
        let col = schema
            .column(column)
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))?;

        if !col.nullable && value.is_blank() {
            return Err(QueryError::NullNotAllowed(col.name));
        }

        match self.assignments.iter_mut().find(|(name, _)| *name == col.name) {
            Some((_, existing)) => *existing = value,
            None => self.assignments.push((col.name, value)),
        }
        Ok(())
    }

    /// Builds a spec from a JSON object body
    ///
    /// Assignments follow the schema's column order, not the body's.
    ///
    /// # Errors
    ///
    /// Any error from [`UpdateSpec::set`] or [`SqlValue::from_json`]
    pub fn from_json(schema: &TableSchema, body: &Map<String, Value>) -> Result<Self, QueryError> {
        if let Some(unknown) = body.keys().find(|k| schema.column(k).is_none()) {
            return Err(QueryError::UnknownColumn(unknown.clone()));
        }

        let mut spec = Self::new();
        for column in schema.mutable_columns {
            if let Some(value) = body.get(column.name) {
                spec.set(schema, column.name, SqlValue::from_json(column.name, value)?)?;
            }
        }
        Ok(spec)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn assignments(&self) -> &[(&'static str, SqlValue)] {
        &self.assignments
    }
}

/// Builds `UPDATE <table> SET c1 = $1, ... WHERE <id> = $k+1 RETURNING ...`
///
/// The row id is always the last parameter.
///
/// # Errors
///
/// - `QueryError::EmptyUpdate` when the spec has no assignments
/// - `QueryError::UnknownColumn` if an assignment is not in `schema`
///
/// # Example
///
/// ```
/// use cadastro_shared::query::{build_update_query, Column, SqlValue, TableSchema, UpdateSpec};
///
/// const T: TableSchema = TableSchema {
///     table: "departamento",
///     id_column: "id",
///     mutable_columns: &[Column::required("nome")],
///     returning: "id, nome",
/// };
///
/// let mut spec = UpdateSpec::new();
/// spec.set(&T, "nome", SqlValue::from("Financeiro")).unwrap();
///
/// let query = build_update_query(&T, &spec, 5).unwrap();
/// assert_eq!(query.sql, "UPDATE departamento SET nome = $1 WHERE id = $2 RETURNING id, nome");
/// assert_eq!(query.params.last(), Some(&SqlValue::Int(5)));
/// ```
pub fn build_update_query(
    schema: &TableSchema,
    spec: &UpdateSpec,
    id: i32,
) -> Result<BoundQuery, QueryError> {
    if spec.is_empty() {
        return Err(QueryError::EmptyUpdate);
    }

    let mut params = Vec::with_capacity(spec.len() + 1);
    let mut sets = Vec::with_capacity(spec.len());

    for (column, value) in spec.assignments() {
        let col = schema
            .column(column)
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))?;

        params.push(value.clone());
        sets.push(format!("{} = ${}", col.name, params.len()));
    }

    params.push(SqlValue::Int(id));
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        schema.table,
        sets.join(", "),
        schema.id_column,
        params.len(),
        schema.returning
    );

    Ok(BoundQuery { sql, params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::schema::Column;
    use serde_json::json;

    const EMPRESA: TableSchema = TableSchema {
        table: "empresa",
        id_column: "id",
        mutable_columns: &[
            Column::required("nome"),
            Column::required("email"),
            Column::optional("cnpj"),
            Column::optional("cidade"),
        ],
        returning: "id, nome, email, cnpj, cidade",
    };

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let result = build_update_query(&EMPRESA, &UpdateSpec::new(), 1);
        assert!(matches!(result, Err(QueryError::EmptyUpdate)));

        let spec = UpdateSpec::from_json(&EMPRESA, &Map::new()).unwrap();
        assert!(matches!(
            build_update_query(&EMPRESA, &spec, 1),
            Err(QueryError::EmptyUpdate)
        ));
    }

    #[test]
    fn test_id_is_last_placeholder() {
        let spec = UpdateSpec::from_json(
            &EMPRESA,
            &body(json!({"cidade": "Recife", "nome": "Acme"})),
        )
        .unwrap();
        let query = build_update_query(&EMPRESA, &spec, 12).unwrap();

        assert_eq!(
            query.sql,
            "UPDATE empresa SET nome = $1, cidade = $2 WHERE id = $3 RETURNING id, nome, email, cnpj, cidade"
        );
        assert_eq!(
            query.params,
            vec![
                SqlValue::Text("Acme".to_string()),
                SqlValue::Text("Recife".to_string()),
                SqlValue::Int(12),
            ]
        );
    }

    #[test]
    fn test_k_fields_give_k_plus_one_params() {
        let all = json!({"nome": "a", "email": "b@c.d", "cnpj": "1", "cidade": "x"});
        let keys: Vec<&str> = vec!["nome", "email", "cnpj", "cidade"];

        for k in 1..=keys.len() {
            let mut map = Map::new();
            for key in &keys[..k] {
                map.insert(key.to_string(), all[*key].clone());
            }
            let spec = UpdateSpec::from_json(&EMPRESA, &map).unwrap();
            let query = build_update_query(&EMPRESA, &spec, 1).unwrap();

            assert_eq!(query.params.len(), k + 1);
            assert!(query.sql.contains(&format!("WHERE id = ${}", k + 1)));
        }
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let result = UpdateSpec::from_json(
            &EMPRESA,
            &body(json!({"nome": "x", "nome = 'y' --": "z"})),
        );
        assert!(matches!(result, Err(QueryError::UnknownColumn(ref c)) if c == "nome = 'y' --"));

        let mut spec = UpdateSpec::new();
        assert!(matches!(
            spec.set(&EMPRESA, "id", SqlValue::Int(2)),
            Err(QueryError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_null_on_required_column_is_rejected() {
        let result = UpdateSpec::from_json(&EMPRESA, &body(json!({"nome": null})));
        assert!(matches!(result, Err(QueryError::NullNotAllowed("nome"))));

        let result = UpdateSpec::from_json(&EMPRESA, &body(json!({"email": "  "})));
        assert!(matches!(result, Err(QueryError::NullNotAllowed("email"))));
    }

    #[test]
    fn test_null_on_optional_column_clears_it() {
        let spec = UpdateSpec::from_json(&EMPRESA, &body(json!({"cnpj": null}))).unwrap();
        let query = build_update_query(&EMPRESA, &spec, 3).unwrap();

        assert_eq!(query.params, vec![SqlValue::Null, SqlValue::Int(3)]);
    }

    #[test]
    fn test_set_twice_overwrites() {
        let mut spec = UpdateSpec::new();
        spec.set(&EMPRESA, "nome", SqlValue::from("a")).unwrap();
        spec.set(&EMPRESA, "nome", SqlValue::from("b")).unwrap();

        assert_eq!(spec.len(), 1);
        assert_eq!(spec.assignments()[0].1, SqlValue::from("b"));
    }

    #[test]
    fn test_unsupported_value_is_rejected() {
        let result = UpdateSpec::from_json(&EMPRESA, &body(json!({"cidade": ["a"]})));
        assert!(matches!(result, Err(QueryError::UnsupportedValue(_))));
    }
}
