/// Company endpoints; every route requires a bearer token
///
/// # Endpoints
///
/// ```text
/// GET    /empresas?id=&nome=&cnpj=   list, optionally filtered
/// POST   /empresas                   create
/// PUT    /empresas/:id               partial update of allow-listed fields
/// DELETE /empresas/:id               delete
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
    http::StatusCode,
    Extension, Json,
};
use cadastro_shared::{
    auth::middleware::AuthContext,
    models::empresa::{Empresa, EmpresaFilter, NewEmpresa},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use validator::Validate;

const NOT_FOUND: &str = "Empresa não encontrada";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub id: Option<String>,
    pub nome: Option<String>,
    pub cnpj: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> ApiResult<EmpresaFilter> {
        Ok(EmpresaFilter {
            id: parse_id_param(self.id)?,
            nome: non_empty(self.nome),
            cnpj: non_empty(self.cnpj),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateEmpresaRequest {
    #[validate(
        required(message = "Nome é obrigatório"),
        custom(function = "not_blank", message = "Nome é obrigatório")
    )]
    pub nome: Option<String>,

    #[validate(
        required(message = "Email é obrigatório"),
        custom(function = "not_blank", message = "Email é obrigatório")
    )]
    pub email: Option<String>,

    pub cnpj: Option<String>,
    pub telefone1: Option<String>,
    pub telefone2: Option<String>,
    pub celular1: Option<String>,
    pub celular2: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
}

impl From<CreateEmpresaRequest> for NewEmpresa {
    fn from(req: CreateEmpresaRequest) -> Self {
        NewEmpresa {
            nome: req.nome.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            cnpj: req.cnpj,
            telefone1: req.telefone1,
            telefone2: req.telefone2,
            celular1: req.celular1,
            celular2: req.celular2,
            cep: req.cep,
            logradouro: req.logradouro,
            numero: req.numero,
            complemento: req.complemento,
            bairro: req.bairro,
            cidade: req.cidade,
            uf: req.uf,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Empresa>>> {
    let Query(params) = query?;
    let filter = params.into_filter()?;
    let rows = Empresa::list(&state.db, &filter).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateEmpresaRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Empresa>)> {
    let Json(req) = payload?;
    req.validate()?;

    let created = Empresa::create(&state.db, req.into()).await?;

    info!(empresa_id = created.id, user_id = auth.user_id, "Empresa created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<Empresa>> {
    let Path(id) = path?;
    let Json(body) = payload?;

    let updated = Empresa::update(&state.db, id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    info!(empresa_id = id, user_id = auth.user_id, fields = body.len(), "Empresa updated");
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = path?;

    if !Empresa::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(empresa_id = id, user_id = auth.user_id, "Empresa deleted");
    Ok(Json(MessageResponse {
        mensagem: "Empresa deletada com sucesso".to_string(),
    }))
}
