//! Application configuration.

use crate::backend::utils::paths::{get_config_path, get_credential_path};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "MINDCARE_API_URL";

/// Base URL used when neither the config file nor the environment set one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub credential_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("MindCare/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credential_file: get_credential_path(),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then `config.json` from the app directory, then the environment.
    pub async fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&get_config_path()).await?;
        config.apply_env(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Reads a config file, falling back to defaults when it does not exist.
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).await.map_err(ConfigError::IoError)?;
        serde_json::from_str(&content).map_err(ConfigError::SerdeError)
    }

    /// Applies an API URL override, ignoring blank values.
    pub fn apply_env(&mut self, api_url: Option<String>) {
        match api_url {
            Some(url) if !url.trim().is_empty() => self.api.base_url = url.trim().to_string(),
            Some(_) => warn!("{API_URL_ENV} is set but empty, keeping {}", self.api.base_url),
            None => {}
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(err) => write!(f, "IO error: {}", err),
            ConfigError::SerdeError(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = AppConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);

        config.apply_env(Some(" https://api.example.org/api ".to_string()));
        assert_eq!(config.api.base_url, "https://api.example.org/api");

        config.apply_env(Some("   ".to_string()));
        assert_eq!(config.api.base_url, "https://api.example.org/api");
    }

    #[tokio::test]
    async fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"timeout_secs": 5}}"#).unwrap();

        let config = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
