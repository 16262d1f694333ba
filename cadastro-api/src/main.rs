//! # Cadastro API Server
//!
//! Registry backend for departments and companies, with user signup and
//! bearer-token login.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Connect the PostgreSQL pool and apply pending migrations
//! 3. Serve the router until Ctrl+C, then drain the pool
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/cadastro JWT_SECRET=... cargo run -p cadastro-api
//! ```

use cadastro_api::{
    app::{build_router, AppState},
    config::Config,
};
use cadastro_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadastro_api=debug,cadastro_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Cadastro API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let db = create_pool(config.database.pool_config()).await?;
    run_migrations(&db).await?;

    let state = AppState::new(db.clone(), config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
