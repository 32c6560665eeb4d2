//! Startup orchestration.
//!
//! # Responsibilities
//! - Construct the upstream client and object store from configuration
//! - Install metrics, bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, RouterConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::storage::{FsObjectStore, MemoryObjectStore, ObjectStore, StoreError};
use crate::upstream::{FetchError, Fetcher, HttpFetcher};

/// Anything that can stop the router from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wire the production collaborators into a server.
pub fn build_server(config: RouterConfig) -> Result<HttpServer, StartupError> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.timeouts)?);

    let store: Arc<dyn ObjectStore> = match &config.object_store.root {
        Some(root) => Arc::new(FsObjectStore::open(
            root,
            config.object_store.cache_control.clone(),
        )?),
        None => {
            tracing::warn!("No object store root configured, static object lookups will miss");
            Arc::new(MemoryObjectStore::new())
        }
    };

    Ok(HttpServer::new(config, fetcher, store))
}

/// Run the router until SIGINT/SIGTERM.
pub async fn run(config: RouterConfig) -> Result<(), StartupError> {
    let metrics_address = config
        .observability
        .metrics_enabled
        .then(|| config.observability.metrics_address.clone());
    let bind_address = config.listener.bind_address.clone();

    let server = build_server(config)?;

    if let Some(address) = metrics_address {
        match address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to install metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(metrics_address = %address, "Failed to parse metrics address");
            }
        }
    }

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        match signals::wait_for_signal().await {
            Ok(name) => tracing::info!(signal = name, "Shutdown signal received"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
