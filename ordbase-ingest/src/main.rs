//! ordbase-ingest - Dictionary Ingestion Service
//!
//! Accepts raw dictionary entries over HTTP, decomposes them into a
//! normalized lexical graph and persists it idempotently into SQLite.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ordbase_common::config::IngestConfig;
use ordbase_common::db::init_database_pool;
use ordbase_ingest::engine::IngestEngine;
use ordbase_ingest::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ordbase-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = IngestConfig::load(None)?;
    config.ensure_directories()?;
    info!("Database: {}", config.database_path.display());
    info!("Audio directory: {}", config.audio_dir.display());

    let db_pool = init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let engine = IngestEngine::from_config(db_pool.clone(), &config);
    let state = AppState::new(db_pool, engine);
    let app = ordbase_ingest::build_router(state);

    let addr = format!("127.0.0.1:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
