//! Service configuration, read from the environment (optionally seeded by `.env`).

use crate::error::AppError;
use crate::fs_manager::app_root;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

pub const ENV_HOST: &str = "FROSTY_HOST";
pub const ENV_PORT: &str = "FROSTY_PORT";
pub const ENV_DATA_DIR: &str = "FROSTY_DATA_DIR";
pub const ENV_RESPONSES_PATH: &str = "FROSTY_RESPONSES_PATH";
pub const ENV_LOG_FORMAT: &str = "FROSTY_LOG_FORMAT";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// Bunyan-compatible JSON lines.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Runtime configuration of the chat service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceConfig {
    /// Interface the HTTP server binds to.
    #[validate(length(min = 1))]
    pub host: String,
    /// TCP port the HTTP server listens on.
    #[validate(range(min = 1, max = 65535))]
    pub port: u32,
    /// Root of the runtime data tree (model caches live under `models/`).
    /// Relative overrides are taken as given, against the working directory.
    pub data_dir: PathBuf,
    /// Path to the response table JSON asset.
    pub responses_path: PathBuf,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_dir: app_root().join("data"),
            responses_path: app_root().join("config").join("responses.json"),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServiceConfig {
    /// Builds the configuration from environment variables, falling back to defaults.
    ///
    /// Values are validated before being returned; an invalid value is a fatal
    /// configuration error.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| AppError::Config(format!("{} must be a number: {}", ENV_PORT, e)))?,
            Err(_) => defaults.port,
        };

        let log_format = match std::env::var(ENV_LOG_FORMAT) {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.log_format,
        };

        let config = Self {
            host: std::env::var(ENV_HOST).unwrap_or(defaults.host),
            port,
            data_dir: std::env::var(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            responses_path: std::env::var(ENV_RESPONSES_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.responses_path),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Address the HTTP listener binds to; host names are resolved by the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
