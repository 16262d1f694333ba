/// Department endpoints
///
/// # Endpoints
///
/// ```text
/// GET    /departamentos?id=&nome=   list, optionally filtered
/// POST   /departamentos             create
/// PUT    /departamentos/:id         update (bearer token required)
/// DELETE /departamentos/:id         delete
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_empty, not_blank, parse_id_param, MessageResponse},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use cadastro_shared::{
    auth::middleware::AuthContext,
    models::departamento::{Departamento, DepartamentoFilter},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use validator::Validate;

const NOT_FOUND: &str = "Departamento não encontrado";
const NOME_REQUIRED_FOR_UPDATE: &str = "Nome é obrigatório para atualização.";

/// Query string for the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub id: Option<String>,
    pub nome: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> ApiResult<DepartamentoFilter> {
        Ok(DepartamentoFilter {
            id: parse_id_param(self.id)?,
            nome: non_empty(self.nome),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartamentoRequest {
    #[validate(
        required(message = "Nome é obrigatório"),
        custom(function = "not_blank", message = "Nome é obrigatório")
    )]
    pub nome: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Departamento>>> {
    let Query(params) = query?;
    let filter = params.into_filter()?;
    let rows = Departamento::list(&state.db, &filter).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateDepartamentoRequest>, JsonRejection>,
) -> ApiResult<Json<Departamento>> {
    let Json(req) = payload?;
    req.validate()?;

    let nome = req.nome.unwrap_or_default();
    let created = Departamento::create(&state.db, &nome).await?;

    info!(departamento_id = created.id, "Departamento created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<Departamento>> {
    let Path(id) = path?;
    let Json(body) = payload?;

    let changes = nome_only(body)?;

    let updated = Departamento::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    info!(departamento_id = id, user_id = auth.user_id, "Departamento updated");
    Ok(Json(updated))
}

/// Keeps only `nome` from an update body; other keys are ignored
fn nome_only(mut body: Map<String, Value>) -> ApiResult<Map<String, Value>> {
    let nome = match body.remove("nome") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    }
    .ok_or_else(|| ApiError::BadRequest(NOME_REQUIRED_FOR_UPDATE.to_string()))?;

    let mut changes = Map::new();
    changes.insert("nome".to_string(), nome);
    Ok(changes)
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = path?;

    if !Departamento::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(departamento_id = id, "Departamento deleted");
    Ok(Json(MessageResponse {
        mensagem: "Departamento deletado com sucesso".to_string(),
    }))
}
