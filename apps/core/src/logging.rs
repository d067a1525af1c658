//! Tracing subscriber setup.
//!
//! `RUST_LOG` controls the filter (default `info`). The output is either
//! human-readable lines or Bunyan JSON, chosen by `FROSTY_LOG_FORMAT`.

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::LogFormat;
use crate::error::AppError;

const APP_NAME: &str = "frosty";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init(format: LogFormat) -> Result<(), AppError> {
    let result = match format {
        LogFormat::Json => Registry::default()
            .with(env_filter())
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(APP_NAME.to_string(), std::io::stdout))
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(env_filter())
            .with(fmt::layer().with_target(false))
            .try_init(),
    };

    result.map_err(|e| AppError::Internal(format!("Failed to initialise logging: {}", e)))
}
