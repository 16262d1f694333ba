/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": { "applied_migrations": 3, "known_migrations": 3, ... }
/// }
/// ```
///
/// Always 200; a database problem shows up as `"status": "degraded"`.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use cadastro_shared::db::{
    migrations::{get_migration_status, MigrationStatus},
    pool::health_check as ping,
};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationStatus>,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match ping(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    let migrations = if connected {
        get_migration_status(&state.db).await.ok()
    } else {
        None
    };

    let healthy = connected && migrations.as_ref().map_or(false, |m| m.is_up_to_date);

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations,
    }))
}
