//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (OTEL_EXPORTER_OTLP_*, TODO_*)
//!     → validation.rs (semantic checks, headers.rs for the header string)
//!     → ServiceConfig (validated, immutable)
//!     → handed to telemetry, store and http at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields except the collector endpoint and headers have defaults
//! - Any validation failure is fatal: the process does not start

pub mod headers;
pub mod loader;
pub mod schema;
pub mod validation;

pub use headers::{parse_headers, HeaderParseError};
pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ServiceConfig, StoreConfig, TelemetryConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
