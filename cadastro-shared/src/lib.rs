//! # Cadastro Shared Library
//!
//! Domain and infrastructure code used by the Cadastro API server.
//!
//! ## Module Organization
//!
//! - `auth`: credential hashing, session tokens, bearer-token gate
//! - `query`: injection-safe filter and update statement builders
//! - `db`: connection pool, migrations, statement execution
//! - `models`: departments, companies and user accounts

pub mod auth;
pub mod db;
pub mod models;
pub mod query;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
