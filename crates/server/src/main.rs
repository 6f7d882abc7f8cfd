mod bootstrap;
mod catalog;
mod health;

use std::time::Duration;

use std::future::Future;
use std::io;

use anyhow::Result;
use bootstrap::BootstrapError;
use vitrina_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use vitrina_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging has to be configured before bootstrap emits its first event.
    let config = bootstrap::load_config(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await;
    let address = app.config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| BootstrapError::Bind { address: address.clone(), source })?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "El servidor está corriendo el puerto {}",
        app.config.server.port
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    axum::serve(listener, app.router()).with_graceful_shutdown(wait_for_shutdown(grace)).await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "vitrina-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown(grace: Duration) {
    shutdown_on(tokio::signal::ctrl_c(), grace).await;
}

/// Resolves once `signal` reports a shutdown request. A signal listener that
/// fails never resolves, so the server keeps serving.
async fn shutdown_on(signal: impl Future<Output = io::Result<()>>, grace: Duration) {
    if let Err(error) = signal.await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for shutdown signal, serving until the process is killed"
        );
        std::future::pending::<()>().await;
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "shutdown requested, draining in-flight requests"
    );

    // Bound the drain: force exit if connections outlive the grace period.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!(
            event_name = "system.server.grace_elapsed",
            correlation_id = "shutdown",
            "graceful shutdown window elapsed, exiting"
        );
        std::process::exit(0);
    });
}
