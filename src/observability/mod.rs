//! Observability subsystem: local logs, plus spans and request metrics
//! exported over OTLP.
//!
//! # Data Flow
//! ```text
//! handler
//!     → Telemetry::begin(operation)     (requests_count += 1, span opened)
//!     → OperationSpan::set / fail       (typed attributes, status)
//!     → guard dropped                   (span ended)
//!
//! background (SDK workers):
//!     batch span processor  → OTLP span exporter   → collector
//!     periodic reader       → OTLP metric exporter → collector
//! ```
//!
//! # Design Decisions
//! - `Telemetry` is constructed explicitly and injected into handlers;
//!   registering it globally is optional
//! - Export never runs on the request path; export failures are logged by
//!   the SDK and never reach the caller
//! - Shutdown flushes both pipelines before the process exits

pub mod attributes;
pub mod logging;
pub mod operation;
pub mod propagation;
pub mod providers;
pub mod resource;

pub use attributes::AttributeValue;
pub use logging::init_logging;
pub use operation::{Operation, OperationSpan};
pub use propagation::extract_parent;
pub use providers::{ExportSchedule, Telemetry, TelemetryError, REQUESTS_COUNTER};
pub use resource::build_resource;
