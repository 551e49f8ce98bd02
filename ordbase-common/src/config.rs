//! Configuration loading for ordbase services
//!
//! Resolution priority order:
//! 1. Environment variables (highest priority)
//! 2. TOML config file
//! 3. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ingest service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Directory for mirrored audio files
    pub audio_dir: PathBuf,
    /// HTTP listen port
    pub listen_port: u16,
    /// Frequency lookup service base URL (optional collaborator)
    pub frequency_service_url: Option<String>,
    /// Translation service base URL (optional collaborator)
    pub translation_service_url: Option<String>,
    /// Transaction timeout for one entry's graph write, in seconds.
    /// Generous because a single entry can touch dozens of rows.
    pub transaction_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database_path: data_dir.join("ordbase.db"),
            audio_dir: data_dir.join("audio"),
            listen_port: 5741,
            frequency_service_url: None,
            translation_service_url: None,
            transaction_timeout_secs: 300,
        }
    }
}

impl IngestConfig {
    /// Load configuration with env → TOML → default priority
    pub fn load(config_path: Option<&Path>) -> Result<IngestConfig> {
        let mut config = match resolve_config_file(config_path) {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?
            }
            None => IngestConfig::default(),
        };

        // Environment overrides
        if let Ok(path) = std::env::var("ORDBASE_DATABASE") {
            config.database_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("ORDBASE_AUDIO_DIR") {
            config.audio_dir = PathBuf::from(path);
        }
        if let Ok(port) = std::env::var("ORDBASE_PORT") {
            config.listen_port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid ORDBASE_PORT: {}", port)))?;
        }
        if let Ok(url) = std::env::var("ORDBASE_FREQUENCY_URL") {
            config.frequency_service_url = Some(url);
        }
        if let Ok(url) = std::env::var("ORDBASE_TRANSLATION_URL") {
            config.translation_service_url = Some(url);
        }

        Ok(config)
    }

    /// Ensure the data directories referenced by this config exist
    pub fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&self.audio_dir)?;
        Ok(())
    }
}

/// Locate the config file: explicit path, ORDBASE_CONFIG env, then the
/// platform config directory (~/.config/ordbase/config.toml on Linux)
fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("ORDBASE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let candidate = dirs::config_dir()?.join("ordbase").join("config.toml");
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ordbase"))
        .unwrap_or_else(|| PathBuf::from("./ordbase_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.transaction_timeout_secs, 300);
        assert!(config.frequency_service_url.is_none());
        assert!(config.database_path.ends_with("ordbase.db"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
database_path = "/tmp/ordbase-test.db"
listen_port = 6000
frequency_service_url = "http://localhost:7000"
transaction_timeout_secs = 60
"#,
        )
        .expect("write config");

        let config = IngestConfig::load(Some(&path)).expect("load config");
        assert_eq!(config.database_path, PathBuf::from("/tmp/ordbase-test.db"));
        assert_eq!(config.listen_port, 6000);
        assert_eq!(
            config.frequency_service_url.as_deref(),
            Some("http://localhost:7000")
        );
        assert_eq!(config.transaction_timeout_secs, 60);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "listen_port = 6100\n").expect("write config");

        let config = IngestConfig::load(Some(&path)).expect("load config");
        assert_eq!(config.listen_port, 6100);
        assert_eq!(config.transaction_timeout_secs, 300);
    }
}
