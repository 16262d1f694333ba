/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: login
/// - `usuarios`: signup
/// - `departamentos`: department CRUD
/// - `empresas`: company CRUD

pub mod auth;
pub mod departamentos;
pub mod empresas;
pub mod health;
pub mod usuarios;

use crate::error::ApiError;
use serde::Serialize;
use validator::ValidationError;

/// Body returned by delete endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

/// Treats a blank query parameter as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses an optional `id` query parameter
pub(crate) fn parse_id_param(value: Option<String>) -> Result<Option<i32>, ApiError> {
    non_empty(value)
        .map(|raw| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| ApiError::BadRequest("Parâmetro id inválido".to_string()))
        })
        .transpose()
}

/// Rejects strings that are empty after trimming
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
