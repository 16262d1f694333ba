/// Static table descriptions
///
/// Every identifier that reaches statement text comes from one of these
/// descriptors, never from request data.

/// A column callers may write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,

    /// Whether an update may set it to NULL
    pub nullable: bool,
}

impl Column {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            nullable: true,
        }
    }
}

/// Table name, key column, mutable columns and the columns to return
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub id_column: &'static str,

    /// Allow-list for updates, in statement order
    pub mutable_columns: &'static [Column],

    /// Column list used after `RETURNING`
    pub returning: &'static str,
}

impl TableSchema {
    /// Looks up a mutable column by name
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.mutable_columns.iter().find(|c| c.name == name)
    }

    /// `SELECT <returning> FROM <table>`
    pub fn select_all(&self) -> String {
        format!("SELECT {} FROM {}", self.returning, self.table)
    }
}
