// Frosty Backend Entry Point
// Loads the response table and the analyzer models, then serves /chat and /health.

mod api;
mod bootstrap;
mod brain;
mod config;
mod engine;
mod error;
mod fs_manager;
mod logging;
mod models;
mod preflight;

#[cfg(test)]
mod tests;

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use api::AppState;
use brain::ResponseTable;
use config::ServiceConfig;
use engine::ChatEngine;
use fs_manager::DataLayout;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    logging::init(config.log_format)?;

    info!("Starting Frosty chat service");
    let layout = DataLayout::new(&config.data_dir);
    let report = preflight::run_preflight_checks(&config, &layout);
    let failed = report.checks.iter().filter(|c| !c.passed).count();
    info!("Preflight: {} ({}/{} checks failed)", report.summary, failed, report.checks.len());
    if report.needs_bootstrap {
        info!("First run: model artifacts will be fetched before serving");
    } else if !report.all_passed {
        tracing::warn!("Preflight reported problems, continuing anyway");
    }

    let responses = ResponseTable::load(&config.responses_path)
        .with_context(|| format!("Cannot load response table {:?}", config.responses_path))?;

    // May download model files on first run
    let analyzer = tokio::task::spawn_blocking(move || bootstrap::load_analyzer(&layout))
        .await
        .context("Model bootstrap task panicked")?
        .context("Cannot load analyzer models")?;

    let state = AppState::new(ChatEngine::new(Arc::new(analyzer), responses));
    let app = api::router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("  POST   /chat");
    info!("  GET    /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
