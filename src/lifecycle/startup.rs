//! Startup orchestration.
//!
//! # Responsibilities
//! - Build telemetry, the task store and the HTTP server in dependency order
//! - Bind the listener last, so traffic arrives only when everything is ready
//! - Tear down in reverse: stop serving, then flush telemetry
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Telemetry teardown runs on a blocking thread because provider shutdown
//!   waits for the exporter workers

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::{Telemetry, TelemetryError};
use crate::store::{MemoryTaskStore, StoreError, TaskStore};
use crate::todo::TodoService;

/// Fatal startup and serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("telemetry setup failed: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("task store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Open the configured task store.
pub fn open_store(config: &ServiceConfig) -> Result<Arc<dyn TaskStore>, StoreError> {
    let store = match &config.store.path {
        Some(path) => MemoryTaskStore::open(path)?,
        None => {
            tracing::warn!("No store path configured, tasks are kept in memory only");
            MemoryTaskStore::new()
        }
    };
    Ok(Arc::new(store))
}

/// Run the service until a termination signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    let telemetry = Arc::new(Telemetry::from_config(&config.telemetry)?);
    if config.telemetry.install_global {
        telemetry.install_global();
    }

    let result = serve(&config, telemetry.clone()).await;

    let flushed = telemetry.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || flushed.shutdown()).await {
        tracing::error!(error = %e, "Telemetry shutdown task failed");
    }

    result
}

async fn serve(config: &ServiceConfig, telemetry: Arc<Telemetry>) -> Result<(), StartupError> {
    let store = open_store(config)?;
    let todo = TodoService::new(store, telemetry);
    let server = HttpServer::new(config, todo);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(
        address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signals = spawn_signal_listener(shutdown);

    let result = server.run(listener, server_shutdown).await;
    signals.abort();

    result.map_err(StartupError::Serve)
}
