//! ordbase-ingest library interface
//!
//! Decomposes raw dictionary entries (Danish DDO style and
//! Merriam-Webster style) into a normalized relational graph of words,
//! senses, definitions, examples, audio and typed relationships. The
//! whole pipeline is idempotent: re-ingesting an entry is a no-op.

pub mod adapters;
pub mod api;
pub mod audio;
pub mod db;
pub mod engine;
pub mod error;
pub mod extract;
pub mod graph;
pub mod services;
pub mod transform;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use crate::engine::IngestEngine;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// The ingestion engine with its enrichment collaborators
    pub engine: Arc<IngestEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, engine: IngestEngine) -> Self {
        Self {
            db,
            engine: Arc::new(engine),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    api::routes().with_state(state)
}
