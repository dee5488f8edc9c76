//! To-do service with manual OpenTelemetry instrumentation.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                    TODO SERVICE                        │
//!     HTTP request   │  ┌────────┐    ┌──────────┐    ┌──────────────────┐  │
//!     ───────────────┼─▶│  http  │───▶│ handlers │───▶│   todo service   │  │
//!                    │  │ server │    └──────────┘    │ span + counter   │  │
//!                    │  └────────┘                    └────────┬─────────┘  │
//!                    │                                          │            │
//!                    │                                          ▼            │
//!                    │                                  ┌──────────────┐     │
//!                    │                                  │  task store  │     │
//!                    │                                  └──────────────┘     │
//!                    │                                                       │
//!                    │  ┌──────────────────────────────────────────────┐    │
//!                    │  │ observability: batch spans / periodic metrics │────┼──▶ OTLP collector
//!                    │  └──────────────────────────────────────────────┘    │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use todo_otel::config::{load_config, Overrides};
use todo_otel::lifecycle;
use todo_otel::observability::init_logging;

#[derive(Parser)]
#[command(name = "todo-otel")]
#[command(about = "To-do list service exporting traces and metrics over OTLP", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = Overrides {
        bind_address: cli.bind,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    init_logging(&config.observability.log_level);
    tracing::info!("todo-otel v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.telemetry.endpoint,
        store_path = ?config.store.path,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
