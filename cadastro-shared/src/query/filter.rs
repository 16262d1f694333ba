/// Dynamic `WHERE` clauses for list endpoints
///
/// A [`FilterSpec`] collects the predicates a caller actually supplied.
/// Absent fields add nothing, so an empty spec selects every row.

use super::value::{BoundQuery, SqlValue};

/// How a predicate compares its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `col = $n`
    Exact,

    /// `col ILIKE $n` with the needle wrapped in `%`
    ContainsCaseInsensitive,
}

/// One `(column, value, kind)` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: SqlValue,
    pub kind: MatchKind,
}

/// Ordered predicates, joined with `AND`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value` when a value is present
    pub fn exact<V: Into<SqlValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate {
                column,
                value: value.into(),
                kind: MatchKind::Exact,
            });
        }
        self
    }

    /// Adds a case-insensitive substring match when a needle is present
    pub fn contains(mut self, column: &'static str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle {
            self.predicates.push(Predicate {
                column,
                value: SqlValue::Text(needle.to_string()),
                kind: MatchKind::ContainsCaseInsensitive,
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// Escapes LIKE metacharacters so the needle matches literally
///
/// Uses PostgreSQL's default escape character, the backslash.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Appends the spec's predicates to a fixed `SELECT`
///
/// ` WHERE ` is added only for a non-empty spec. Placeholder `$n` always
/// refers to `params[n - 1]`.
///
/// # Example
///
/// ```
/// use cadastro_shared::query::{build_filter_query, FilterSpec, SqlValue};
///
/// let spec = FilterSpec::new().exact("id", Some(3)).contains("nome", Some("ti"));
/// let query = build_filter_query("SELECT * FROM departamento", &spec);
///
/// assert_eq!(query.sql, "SELECT * FROM departamento WHERE id = $1 AND nome ILIKE $2");
/// assert_eq!(query.params, vec![SqlValue::Int(3), SqlValue::Text("%ti%".into())]);
/// ```
pub fn build_filter_query(base_select: &str, spec: &FilterSpec) -> BoundQuery {
    let mut query = BoundQuery::new(base_select);
    if spec.is_empty() {
        return query;
    }

    let mut clauses = Vec::with_capacity(spec.len());
    for predicate in spec.predicates() {
        let n = query.params.len() + 1;
        match predicate.kind {
            MatchKind::Exact => {
                clauses.push(format!("{} = ${}", predicate.column, n));
                query.params.push(predicate.value.clone());
            }
            MatchKind::ContainsCaseInsensitive => {
                clauses.push(format!("{} ILIKE ${}", predicate.column, n));
                let needle = match &predicate.value {
                    SqlValue::Text(s) => format!("%{}%", escape_like(s)),
                    SqlValue::Int(i) => format!("%{}%", i),
                    SqlValue::Null => "%".to_string(),
                };
                query.params.push(SqlValue::Text(needle));
            }
        }
    }

    query.sql.push_str(" WHERE ");
    query.sql.push_str(&clauses.join(" AND "));
    query
}
