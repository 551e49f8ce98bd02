//! Translation service client
//!
//! Sends the ingested word graph for translation. A null response or
//! any failure leaves the entry untranslated; ingestion never fails
//! because of this collaborator.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Translation client errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Graph excerpt sent for translation
#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest {
    pub word_id: Uuid,
    pub word: String,
    pub phonetic: Option<String>,
    pub definitions: Vec<String>,
    pub stems: Vec<String>,
    pub related_words: Vec<String>,
}

/// Translated graph returned by the service; opaque to the engine
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatedGraph {
    pub word: String,
    pub definitions: Vec<String>,
}

/// Translation service client
pub struct TranslationClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TranslationClient {
    pub fn new(base_url: String) -> Result<Self, TranslationError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request translation of one word's graph; Ok(None) when the
    /// service has nothing for this word
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<Option<TranslatedGraph>, TranslationError> {
        let url = format!("{}/translate", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError(status.as_u16(), body));
        }

        response
            .json::<Option<TranslatedGraph>>()
            .await
            .map_err(|e| TranslationError::ParseError(e.to_string()))
    }
}
