/// Common test utilities for integration tests
///
/// Builds the full router over a migrated database. Requires `DATABASE_URL`
/// to point at a disposable PostgreSQL database; `JWT_SECRET` falls back to a
/// fixed test value.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use cadastro_api::app::{build_router, AppState};
use cadastro_api::config::Config;
use cadastro_shared::auth::jwt::SessionSubject;
use cadastro_shared::db::migrations::run_migrations;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};
use tower::Service as _;

const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub state: AppState,
}

impl TestContext {
    /// Creates a new test context on a migrated database
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => std::env::var(key)
                .ok()
                .or_else(|| Some(TEST_SECRET.to_string())),
            _ => std::env::var(key).ok(),
        })?;

        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config)?;
        let app = build_router(state.clone());

        Ok(TestContext { db, app, state })
    }

    /// Authorization header value for an arbitrary signed-in user
    pub fn auth_header(&self) -> String {
        let token = self
            .state
            .tokens
            .issue(&SessionSubject {
                user_id: 1,
                email: "tester@example.com".to_string(),
            })
            .expect("token issue");
        format!("Bearer {}", token)
    }

    /// Sends a request through the router and decodes the JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        let request = builder.body(Body::from(body)).unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// Unique suffix so parallel tests never collide on unique columns
pub fn unique(prefix: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!(
        "{}-{}-{}-{}",
        prefix,
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}
