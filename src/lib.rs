//! To-do list service with manual OpenTelemetry instrumentation.
//!
//! Every request runs inside one named span and increments the
//! `requests_count` counter; both signals are batched and exported to an
//! OTLP collector in the background.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod todo;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
pub use todo::TodoService;
