//! NAF Museum kiosk (nafm-kiosk) - Main entry point
//!
//! Serves the exhibit pages and, when a serial device is configured, reads
//! the exhibit controller's line protocol into the hub.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nafm_common::config::{ConfigOverrides, KioskConfig};
use nafm_common::events::EventBus;
use nafm_kiosk::exhibit::ExhibitHub;
use nafm_kiosk::{build_router, hardware, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for nafm-kiosk
///
/// Each option overrides its environment variable, which overrides the
/// config file.
#[derive(Parser, Debug)]
#[command(name = "nafm-kiosk")]
#[command(about = "NAF Museum exhibit kiosk")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:5550
    #[arg(short, long)]
    bind: Option<String>,

    /// Content document (JSON)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Directory served under /assets
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Serial device of the exhibit controller
    #[arg(long)]
    serial_port: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = KioskConfig::load(&ConfigOverrides {
        config_file: args.config,
        bind_addr: args.bind,
        content_path: args.content,
        assets_dir: args.assets,
        serial_port: args.serial_port,
    })
    .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting nafm-kiosk v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );
    match &config.source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: built-in defaults"),
    }
    info!("Content document: {}", config.content_path.display());
    info!("RFID table: {} tags", config.rfid.len());

    let bus = EventBus::new(config.event_capacity);
    let hub = Arc::new(ExhibitHub::new(bus, Arc::new(config.rfid.clone())));

    match &config.serial_port {
        Some(port) => {
            tokio::spawn(hardware::run_bridge(PathBuf::from(port), hub.clone()));
        }
        None => warn!("No serial port configured; use /api/simulate/* for exhibit input"),
    }

    let state = AppState::new(hub, config.content_path.clone(), config.assets_dir.clone());
    let app = build_router(state);

    info!("Starting HTTP server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Terminate handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
