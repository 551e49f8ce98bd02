//! Frequency lookup service client
//!
//! `GET {base}/frequency?word=&language=&pos=` returning general and
//! part-of-speech-specific ranks. Results are cached per
//! (word, language, pos) by the ingest context, not here.

use ordbase_common::{Language, PartOfSpeech};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Frequency client errors
#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Frequency ranks for one (word, language, pos)
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct FrequencyData {
    /// Rank across all parts of speech
    pub general: Option<i64>,
    /// Rank for the requested part of speech
    pub pos_specific: Option<i64>,
}

/// Frequency lookup client
pub struct FrequencyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl FrequencyClient {
    pub fn new(base_url: String) -> Result<Self, FrequencyError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FrequencyError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up frequency data for one word
    pub async fn lookup(
        &self,
        word: &str,
        language: Language,
        pos: PartOfSpeech,
    ) -> Result<FrequencyData, FrequencyError> {
        let url = format!("{}/frequency", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("word", word),
                ("language", language.code()),
                ("pos", pos.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FrequencyError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FrequencyError::ApiError(status.as_u16(), body));
        }

        response
            .json::<FrequencyData>()
            .await
            .map_err(|e| FrequencyError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_data_parses_partial_payload() {
        let data: FrequencyData = serde_json::from_str(r#"{"general": 412}"#).unwrap();
        assert_eq!(data.general, Some(412));
        assert_eq!(data.pos_specific, None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = FrequencyClient::new("http://localhost:7000/".to_string()).unwrap();
        assert_eq!(client.base_url, "http://localhost:7000");
    }
}
