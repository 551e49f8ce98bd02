//! Audio mirroring to durable local storage
//!
//! Downloads referenced external audio files into the configured audio
//! directory under deterministic sha256-derived names, skipping files
//! already mirrored. Individual download failures fall back to the
//! original remote URL and never fail ingestion.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of mirroring one remote file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Downloaded and stored at the local path
    Stored(String),
    /// Already present locally, download skipped
    AlreadyMirrored(String),
    /// Download failed; the remote URL stays the stored reference
    Failed(String),
}

impl DownloadOutcome {
    /// The URL/path to persist for this audio asset
    pub fn stored_url<'a>(&'a self, remote_url: &'a str) -> &'a str {
        match self {
            DownloadOutcome::Stored(local) | DownloadOutcome::AlreadyMirrored(local) => local,
            DownloadOutcome::Failed(_) => remote_url,
        }
    }
}

/// Local blob store for mirrored audio files
pub struct AudioStore {
    http_client: reqwest::Client,
    audio_dir: PathBuf,
}

impl AudioStore {
    pub fn new(audio_dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&audio_dir)?;
        let http_client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(Self {
            http_client,
            audio_dir,
        })
    }

    /// Deterministic local path for a remote URL
    pub fn local_path(&self, remote_url: &str, language: &str) -> PathBuf {
        let digest = Sha256::digest(remote_url.as_bytes());
        let digest_hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        let extension = remote_url
            .rsplit('.')
            .next()
            .filter(|ext| ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("mp3");
        self.audio_dir
            .join(format!("{}_{}.{}", language, digest_hex, extension))
    }

    /// Mirror one remote file, skipping already-present copies
    pub async fn mirror(&self, remote_url: &str, language: &str) -> DownloadOutcome {
        let path = self.local_path(remote_url, language);
        let local = path.to_string_lossy().to_string();

        if path.exists() {
            return DownloadOutcome::AlreadyMirrored(local);
        }

        match self.download(remote_url, &path).await {
            Ok(()) => DownloadOutcome::Stored(local),
            Err(e) => {
                tracing::warn!(
                    url = %remote_url,
                    error = %e,
                    "Audio download failed, keeping remote URL"
                );
                DownloadOutcome::Failed(e)
            }
        }
    }

    /// Mirror many files concurrently (fan-out/fan-in); outcomes are
    /// returned in input order
    pub async fn mirror_all(&self, remote_urls: &[String], language: &str) -> Vec<DownloadOutcome> {
        let downloads = remote_urls.iter().map(|url| self.mirror(url, language));
        futures::future::join_all(downloads).await
    }

    async fn download(&self, remote_url: &str, path: &PathBuf) -> Result<(), String> {
        let response = self
            .http_client
            .get(remote_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| e.to_string())?;

        tracing::debug!(url = %remote_url, path = %path.display(), "Audio mirrored");
        Ok(())
    }
}
