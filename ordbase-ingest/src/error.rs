//! Error types for ordbase-ingest

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Ingestion failure, carrying the headword it happened for
#[derive(Debug, Error)]
pub enum IngestError {
    /// The raw entry could not be decomposed
    #[error("Invalid entry for '{word}': {reason}")]
    InvalidEntry { word: String, reason: String },

    /// The graph write failed or was rolled back
    #[error("Persistence failed for '{word}': {source}")]
    Persistence {
        word: String,
        #[source]
        source: sqlx::Error,
    },

    /// The graph write exceeded the configured transaction timeout
    #[error("Transaction timed out for '{word}' after {seconds}s")]
    Timeout { word: String, seconds: u64 },

    /// ordbase-common error
    #[error("Common error: {0}")]
    Common(#[from] ordbase_common::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Ingestion failure
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Ingest(ref err) => match err {
                IngestError::InvalidEntry { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_ENTRY", err.to_string())
                }
                IngestError::Timeout { .. } => {
                    (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", err.to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INGEST_ERROR",
                    err.to_string(),
                ),
            },
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
