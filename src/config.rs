//! Configuration module for the data room server.

use axum::http::HeaderValue;
use serde::Deserialize;
use std::path::Path;

use crate::{DataRoomError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins (empty = allow any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    8081
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
        }
    }
}

/// Artifact storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one artifact per file.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "uploads/dataroom".to_string()
}

fn default_max_upload_size() -> u64 {
    100
}

impl StorageConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dataroom.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Artifact storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DataRoomError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DataRoomError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DATAROOM_STORAGE_PATH`: Override the artifact storage directory
    /// - `DATAROOM_PORT`: Override the listening port
    ///
    /// A value that cannot be used is an error; the configuration keeps the
    /// overrides applied before it.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("DATAROOM_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }

        if let Ok(port) = std::env::var("DATAROOM_PORT") {
            self.web.port = port.parse().map_err(|_| {
                DataRoomError::Config(format!("invalid DATAROOM_PORT: {port:?}"))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.path.trim().is_empty() {
            return Err(DataRoomError::Config(
                "storage.path must not be empty".to_string(),
            ));
        }
        if self.storage.max_upload_size_mb == 0 {
            return Err(DataRoomError::Config(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.storage.max_upload_size_mb.checked_mul(1024 * 1024).is_none() {
            return Err(DataRoomError::Config(format!(
                "storage.max_upload_size_mb is too large: {}",
                self.storage.max_upload_size_mb
            )));
        }
        for origin in &self.web.cors_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(DataRoomError::Config(format!(
                    "invalid CORS origin in web.cors_origins: {origin:?}"
                )));
            }
        }
        Ok(())
    }
}
