/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`. The `From` impls below are the only
/// place where shared-crate errors are translated into HTTP status codes.
///
/// # Response Body
///
/// ```json
/// { "error": "Empresa não encontrada" }
/// { "error": "Dados inválidos", "details": [{ "field": "email", "message": "Email inválido" }] }
/// ```
///
/// # Example
///
/// ```
/// use cadastro_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Departamento não encontrado".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadastro_shared::{
    auth::{jwt::TokenError, middleware::AuthError, password::PasswordError},
    db::StorageError,
    models::ModelError,
    query::QueryError,
};
use serde::{Deserialize, Serialize};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message for duplicate emails
pub const DUPLICATE_EMAIL: &str = "Email já cadastrado";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures (400)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Missing credentials or failed login (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid or expired session token (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500); the message is logged, never sent
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, details) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
            ApiError::ValidationError(errors) => ("Dados inválidos".to_string(), Some(errors)),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %msg, "Internal error");
                ("Erro interno do servidor".to_string(), None)
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Convert validator errors, one detail per failed rule
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Valor inválido".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(errors)
    }
}

/// Malformed or non-JSON request bodies
impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Corpo da requisição inválido: {}", err.body_text()))
    }
}

/// Non-integer `:id` segments
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::BadRequest("Parâmetro id inválido".to_string())
    }
}

/// Query strings that do not fit the list parameters
impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Parâmetros de consulta inválidos: {}", err.body_text()))
    }
}

/// Statement construction errors are caller mistakes
impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err.field() {
            Some(field) => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: field.to_string(),
                message: err.to_string(),
            }]),
            None => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { constraint } => {
                if constraint.contains("email") {
                    ApiError::Conflict(DUPLICATE_EMAIL.to_string())
                } else {
                    ApiError::Conflict("Registro duplicado".to_string())
                }
            }
            StorageError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Query(e) => e.into(),
            ModelError::Storage(e) => e.into(),
        }
    }
}

/// Gate rejections: no token is 401, a bad token is 403
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Only reached when signing fails; verification goes through `AuthError`
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::InternalError(format!("Token operation failed: {}", err))
    }
}
