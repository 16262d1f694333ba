/// Signup endpoint
///
/// # Endpoint
///
/// ```text
/// POST /usuarios
/// ```
///
/// Responds 201 with `{ id, nome, email }`. The password is hashed with
/// bcrypt before storage and never echoed back. A taken email is a 409.

use crate::{app::AppState, error::ApiResult, routes::not_blank};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use cadastro_shared::{
    auth::password,
    models::usuario::{NewUsuario, Usuario, UsuarioPublico},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUsuarioRequest {
    #[validate(
        required(message = "Nome é obrigatório"),
        custom(function = "not_blank", message = "Nome é obrigatório")
    )]
    pub nome: Option<String>,

    #[validate(
        required(message = "Email é obrigatório"),
        email(message = "Email inválido")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Senha é obrigatória"),
        length(min = 1, message = "Senha é obrigatória")
    )]
    pub senha: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUsuarioRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UsuarioPublico>)> {
    let Json(req) = payload?;
    req.validate()?;

    let senha_hash = password::hash_password_async(req.senha.unwrap_or_default()).await?;

    let created = Usuario::create(
        &state.db,
        NewUsuario {
            nome: req.nome.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            senha_hash,
        },
    )
    .await?;

    info!(user_id = created.id, "User registered");
    Ok((StatusCode::CREATED, Json(created)))
}
