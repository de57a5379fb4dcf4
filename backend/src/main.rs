use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod rest;

use config::ServerConfig;
use db::DbConnection;
use domain::CollectionService;
use rest::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;
    if config.seed_demo && db.is_empty().await? {
        db.seed_demo().await?;
    }

    let state = AppState::new(CollectionService::new(db));
    if let Some(dir) = &config.static_dir {
        info!("Serving frontend bundle from {}", dir.display());
    }
    let app = create_router(state, config.allowed_origin.clone(), config.static_dir.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
