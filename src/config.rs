//! Configuration loader and validator for the six-cities client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    pub storage: Storage,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Header carrying the persisted session token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

/// Durable client-side storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Storage {
    pub data_dir: String,
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_token_header() -> String {
    "X-Token".to_string()
}

fn default_token_key() -> String {
    "six-cities-token".to_string()
}

impl Api {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Ensure required directories exist (creates `storage.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.storage.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.storage.data_dir)
    }

    /// Location of the persisted token file.
    pub fn token_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.token_key)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let url = Url::parse(cfg.api.base_url.trim())
        .map_err(|_| ConfigError::Invalid("api.base_url must be an absolute URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid("api.base_url must use http or https"));
    }
    if cfg.api.timeout_ms == 0 {
        return Err(ConfigError::Invalid("api.timeout_ms must be > 0"));
    }
    if cfg.api.token_header.trim().is_empty() {
        return Err(ConfigError::Invalid("api.token_header must be non-empty"));
    }

    if cfg.storage.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("storage.data_dir must be non-empty"));
    }
    if cfg.storage.token_key.trim().is_empty() {
        return Err(ConfigError::Invalid("storage.token_key must be non-empty"));
    }

    Ok(())
}

/// Returns the example YAML shipped with the client.
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://14.design.htmlacademy.pro/six-cities"
  timeout_ms: 5000
  token_header: "X-Token"

storage:
  data_dir: "./data"
  token_key: "six-cities-token"
"#
}
