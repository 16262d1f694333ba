/// User account model and database operations
///
/// `senha` stores a bcrypt hash. [`Usuario`] never serializes; responses use
/// [`UsuarioPublico`], which has no credential field at all.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE usuario (
///     id SERIAL PRIMARY KEY,
///     nome TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE,
///     senha TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cadastro_shared::auth::password::hash_password;
/// use cadastro_shared::models::usuario::{NewUsuario, Usuario};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let created = Usuario::create(&pool, NewUsuario {
///     nome: "Ana".to_string(),
///     email: "ana@example.com".to_string(),
///     senha_hash: hash_password("s3cret")?,
/// })
/// .await?;
///
/// let user = Usuario::find_by_email(&pool, "ana@example.com").await?;
/// assert_eq!(user.map(|u| u.id), Some(created.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

use crate::db::executor::{self, StorageError};
use crate::query::{BoundQuery, SqlValue};

/// Stored account, credential included
#[derive(Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,

    /// bcrypt hash
    pub senha: String,
}

impl fmt::Debug for Usuario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Usuario")
            .field("id", &self.id)
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("senha", &"<redacted>")
            .finish()
    }
}

/// Account as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsuarioPublico {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

/// Input for signup; the hash is computed by the caller
#[derive(Clone)]
pub struct NewUsuario {
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
}

impl Usuario {
    /// Public view without the hash
    pub fn public(&self) -> UsuarioPublico {
        UsuarioPublico {
            id: self.id,
            nome: self.nome.clone(),
            email: self.email.clone(),
        }
    }

    /// Inserts an account
    ///
    /// # Errors
    ///
    /// `StorageError::UniqueViolation` if the email is taken
    pub async fn create(pool: &PgPool, data: NewUsuario) -> Result<UsuarioPublico, StorageError> {
        let query = BoundQuery {
            sql: "INSERT INTO usuario (nome, email, senha) VALUES ($1, $2, $3) \
                  RETURNING id, nome, email"
                .to_string(),
            params: vec![
                SqlValue::Text(data.nome),
                SqlValue::Text(data.email),
                SqlValue::Text(data.senha_hash),
            ],
        };
        executor::fetch_one(pool, &query).await
    }

    /// Finds an account by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, StorageError> {
        let query = BoundQuery {
            sql: "SELECT id, nome, email, senha FROM usuario WHERE email = $1".to_string(),
            params: vec![SqlValue::from(email)],
        };
        executor::fetch_optional(pool, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario() -> Usuario {
        Usuario {
            id: 1,
            nome: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            senha: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        }
    }

    #[test]
    fn test_public_view_has_no_hash() {
        let json = serde_json::to_value(usuario().public()).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "ana@example.com");
        assert!(json.get("senha").is_none());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let debug = format!("{:?}", usuario());
        assert!(!debug.contains("$2b$"));
        assert!(debug.contains("<redacted>"));
    }
}
