//! HTTP API handlers for ordbase-ingest

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::adapters::RawEntry;
use crate::db::projection::{load_word_graph, WordGraph};
use crate::error::{ApiError, ApiResult};
use crate::types::IngestReport;
use crate::AppState;
use ordbase_common::Language;

/// POST /ingest
///
/// Ingest one raw dictionary entry and return the row counts written.
pub async fn ingest_entry(
    State(state): State<AppState>,
    Json(entry): Json<RawEntry>,
) -> ApiResult<Json<IngestReport>> {
    let report = state.engine.ingest(&entry).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct WordQuery {
    /// ISO 639-1 language code; defaults to Danish
    pub language: Option<String>,
}

/// GET /words/{text}?language=
///
/// Read-only projection of one word's graph.
pub async fn get_word(
    State(state): State<AppState>,
    Path(text): Path<String>,
    Query(query): Query<WordQuery>,
) -> ApiResult<Json<WordGraph>> {
    let language = match query.language.as_deref() {
        None => Language::Danish,
        Some(code) => Language::from_code(code)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown language: {}", code)))?,
    };

    let graph = load_word_graph(&state.db, &text, language.code())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Word not found: {}", text)))?;

    Ok(Json(graph))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "ordbase-ingest".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}

/// Build ingest API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest_entry))
        .route("/words/:text", get(get_word))
        .route("/health", get(health_check))
}
