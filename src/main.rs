use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod openapi;
mod routes;
mod services;
mod state;

use config::Config;
use routes::app;
use services::store::{MemoryStore, PgStore, RecordStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ─── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hr_payroll=debug,tower_http=info")),
        )
        .init();

    // ─── Config ───────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Invalid configuration")?;
    let addr = config.server_addr();

    // ─── Record Store ─────────────────────────────────────────────────────────
    let store: Arc<dyn RecordStore> = match config.database_url.as_deref() {
        Some(url) => Arc::new(
            PgStore::connect(url, &config)
                .await
                .context("Failed to connect to Postgres")?,
        ),
        None => {
            warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // ─── App State ────────────────────────────────────────────────────────────
    let state = AppState::new(store, config);

    // ─── Start Server ─────────────────────────────────────────────────────────
    info!("🚀 HR Payroll API listening on http://{}", addr);
    info!("📖 Swagger UI:  http://{}/docs", addr);
    info!("❤️  Health:      http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app(state))
        .await
        .context("Server failed")?;

    Ok(())
}
