//! v-router: documentation version router.
//!
//! Sits behind nginx and turns version-group and channel URLs into concrete
//! documentation versions, and renders the version menus.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                   V-ROUTER                    │
//!                     │                                               │
//!   nginx request     │  ┌─────────┐    ┌─────────┐    ┌──────────┐   │
//!   ──────────────────┼─▶│  http   │───▶│ routing │───▶│ handlers │   │
//!                     │  │ server  │    │  table  │    └────┬─────┘   │
//!                     │  └─────────┘    └─────────┘         │         │
//!                     │                                     ▼         │
//!                     │        ┌──────────┐          ┌────────────┐   │
//!                     │        │   menu   │◀─────────│  releases  │   │
//!                     │        │ builder  │          │  resolver  │   │
//!                     │        └────┬─────┘          └─────┬──────┘   │
//!                     │             ▼                      │          │
//!   redirect / menu   │        ┌──────────┐          ┌─────▼──────┐   │
//!   ◀─────────────────┼────────│ template │          │  manifest  │◀──┼── channels file
//!                     │        └──────────┘          │   store    │   │
//!                     │                              └────────────┘   │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use v_router::config::{loader, load_config};
use v_router::lifecycle::startup::log_configuration;
use v_router::observability::{logging, metrics};
use v_router::releases::watcher::ManifestWatcher;
use v_router::{HttpServer, ManifestStore, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(loader::config_path_from_env);

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.observability)?;
    tracing::info!("v-router v{} starting", env!("CARGO_PKG_VERSION"));
    log_configuration(&config);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let manifest = Arc::new(ManifestStore::new(&config.paths.channels_file));
    match manifest.refresh() {
        Ok(releases) => tracing::info!(groups = releases.groups.len(), "Channels file loaded"),
        Err(e) => tracing::error!(error = %e, "Failed to load channels file"),
    }

    let _watcher = if config.paths.watch_channels_file {
        match ManifestWatcher::new(manifest.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::error!(error = %e, "Failed to watch channels file");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, manifest)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
