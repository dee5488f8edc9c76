//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the to-do service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Collector export settings.
    pub telemetry: TelemetryConfig,

    /// Task store settings.
    pub store: StoreConfig,

    /// Local logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Telemetry export configuration.
///
/// `endpoint` and `headers` have no usable default: they come from the
/// config file or from `OTEL_EXPORTER_OTLP_ENDPOINT` / `OTEL_EXPORTER_OTLP_HEADERS`
/// and are required at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Value of the `service.name` resource attribute.
    pub service_name: String,

    /// OTLP/gRPC collector endpoint (e.g., "http://collector:4317").
    pub endpoint: String,

    /// Raw authentication header string, `key:value` pairs joined by commas.
    pub headers: String,

    /// Period of the metric reader in seconds.
    pub metric_interval_secs: u64,

    /// Scheduled delay of the batch span processor in milliseconds.
    pub trace_batch_delay_ms: u64,

    /// Timeout for a single export call in seconds.
    pub export_timeout_secs: u64,

    /// Also register the providers as the process-wide defaults.
    pub install_global: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "todo-otel".to_string(),
            endpoint: String::new(),
            headers: String::new(),
            metric_interval_secs: 60,
            trace_batch_delay_ms: 5000,
            export_timeout_secs: 10,
            install_global: true,
        }
    }
}

/// Task store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file the store persists to. In-memory only when unset.
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
