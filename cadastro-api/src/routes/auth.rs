/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /login
/// ```
///
/// # Request
///
/// ```json
/// { "email": "ana@example.com", "senha": "s3cret" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "usuario": { "id": 1, "nome": "Ana", "email": "ana@example.com" }
/// }
/// ```
///
/// An unknown email and a wrong password produce the same 401 body, and both
/// pay for one bcrypt verification.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::not_blank,
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use cadastro_shared::{
    auth::{jwt::SessionSubject, password},
    models::usuario::{Usuario, UsuarioPublico},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Message for any failed login
pub const INVALID_LOGIN: &str = "Email ou senha inválidos";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email é obrigatório"),
        custom(function = "not_blank", message = "Email é obrigatório")
    )]
    pub email: Option<String>,

    #[validate(required(message = "Senha é obrigatória"))]
    pub senha: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token, valid for two hours
    pub token: String,

    pub usuario: UsuarioPublico,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let email = req.email.unwrap_or_default();
    let senha = req.senha.unwrap_or_default();

    let user = Usuario::find_by_email(&state.db, &email).await?;

    let valid = match &user {
        Some(u) => password::verify_password_async(senha, u.senha.clone()).await?,
        None => password::verify_against_dummy(senha).await?,
    };

    let user = match user {
        Some(u) if valid => u,
        _ => {
            warn!("Failed login attempt");
            return Err(ApiError::Unauthorized(INVALID_LOGIN.to_string()));
        }
    };

    let token = state.tokens.issue(&SessionSubject {
        user_id: user.id,
        email: user.email.clone(),
    })?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        usuario: user.public(),
    }))
}
