//! FraudGuard Risk Engine - Main Entry Point
//!
//! Serves batch fraud predictions over HTTP.

use anyhow::{Context, Result};
use fraudguard::{
    api::{self, AppState},
    config::{AppConfig, LoggingConfig},
    metrics::MetricsReporter,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("fraudguard={}", logging.level).parse()?)
        .add_directive("tower_http=info".parse()?);

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so the log level can follow it
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting FraudGuard Risk Engine v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Risk levels: low<{:.2}, medium<{:.2}, high>={:.2}; max batch size {}",
        config.detection.risk_levels.low,
        config.detection.risk_levels.medium,
        config.detection.risk_levels.high,
        config.detection.max_batch_size
    );

    let state = AppState::from_config(&config);
    let metrics = state.metrics.clone();

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = api::app(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Risk engine shutting down...");
    metrics.print_summary();

    Ok(())
}
