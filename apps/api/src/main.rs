mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod store;
mod worries;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, WorryStore};
use crate::worries::moderation::ModerationFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Worry API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    info!("Content store initialized (backend: {})", store.backend());

    let moderation = Arc::new(ModerationFilter::new(config.blocked_terms.clone()));
    info!(
        "Moderation filter loaded with {} blocked terms",
        config.blocked_terms.len()
    );

    let state = AppState { store, moderation };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-process store.
async fn build_store(config: &Config) -> Result<Arc<dyn WorryStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None if config.seed_demo_data => Ok(Arc::new(MemoryStore::with_demo_data())),
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
