//! Blog Service Main Entry Point
//!
//! Starts the gRPC server with:
//! - In-memory post store
//! - gRPC health service
//! - Server reflection (optional)

use anyhow::{Context, Result};
use blog_service::{
    config::{Config, LogFormat},
    grpc::{self, AppState},
    services::PostStore,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);
    info!("Starting blog-service");

    config
        .validate()
        .context("Configuration validation failed")?;
    let addr = config.grpc_addr().context("Invalid server address")?;
    info!("Configuration loaded and validated");

    let store = Arc::new(PostStore::new());
    let app_state = Arc::new(AppState::new(Arc::clone(&store)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(grpc::start_grpc_server(
        addr,
        app_state,
        config.enable_reflection,
        async move {
            // Sender dropped counts as shutdown too
            let _ = shutdown_rx.await;
        },
    ));

    tokio::select! {
        joined = &mut server => {
            // Server stopped before any signal, e.g. the port is already taken
            joined
                .context("gRPC server task panicked")?
                .context("gRPC server error")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(());

    let grace = Duration::from_secs(config.shutdown_grace_seconds);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined
            .context("gRPC server task panicked")?
            .context("gRPC server error")?,
        Err(_) => warn!(
            "In-flight requests did not finish within {}s, exiting",
            config.shutdown_grace_seconds
        ),
    }

    info!(posts = store.len().await, "Blog service shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,blog_service=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
