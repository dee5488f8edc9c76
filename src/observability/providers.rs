//! Signal providers and their OTLP exporters.
//!
//! One tracer provider (batch span processor) and one meter provider
//! (periodic reader) per process, both bound to the same resource. Export
//! runs on the SDK's background workers, never on a request task.

use std::collections::BTreeMap;
use std::time::Duration;

use opentelemetry::metrics::{Counter, MeterProvider as _};
use opentelemetry::trace::{Tracer as _, TracerProvider as _};
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::{
    ExporterBuildError, MetricExporter, SpanExporter, WithExportConfig, WithTonicConfig,
};
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, SdkTracer, SdkTracerProvider,
    SpanExporter as ExportSpans,
};
use thiserror::Error;
use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};
use tonic::transport::ClientTlsConfig;

use crate::config::headers::{parse_headers, HeaderParseError};
use crate::config::schema::TelemetryConfig;
use crate::observability::operation::{Operation, OperationSpan};
use crate::observability::resource::build_resource;

/// Instrumentation scope name for the tracer and meter.
pub const INSTRUMENTATION_NAME: &str = "todo-otel";

pub const REQUESTS_COUNTER: &str = "requests_count";

/// Errors raised while building the telemetry pipeline. All are fatal at startup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid collector headers: {0}")]
    Headers(#[from] HeaderParseError),

    #[error("header {0:?} is not valid gRPC metadata")]
    InvalidMetadata(String),

    #[error("failed to build {signal} exporter: {source}")]
    Exporter {
        signal: &'static str,
        #[source]
        source: ExporterBuildError,
    },
}

/// Background export cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSchedule {
    /// Period of the metric reader.
    pub metric_interval: Duration,
    /// Scheduled delay of the batch span processor.
    pub trace_batch_delay: Duration,
}

impl Default for ExportSchedule {
    fn default() -> Self {
        Self {
            metric_interval: Duration::from_secs(60),
            trace_batch_delay: Duration::from_secs(5),
        }
    }
}

impl From<&TelemetryConfig> for ExportSchedule {
    fn from(config: &TelemetryConfig) -> Self {
        Self {
            metric_interval: Duration::from_secs(config.metric_interval_secs),
            trace_batch_delay: Duration::from_millis(config.trace_batch_delay_ms),
        }
    }
}

/// Telemetry context handed to request handlers.
///
/// Owns the tracer and meter providers, the tracer, and the request
/// counter. Construct once at startup, share through `Arc`, and call
/// [`Telemetry::shutdown`] before exit so buffered signals are flushed.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    tracer: SdkTracer,
    requests: Counter<u64>,
}

impl Telemetry {
    /// Build OTLP/gRPC exporters from `config` and wire them up.
    ///
    /// Must run inside a Tokio runtime: the gRPC channel is created here.
    pub fn from_config(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let headers = parse_headers(&config.headers)?;
        let metadata = to_metadata(&headers)?;
        let timeout = Duration::from_secs(config.export_timeout_secs);
        let use_tls = config.endpoint.starts_with("https://");

        let mut span_builder = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.clone())
            .with_timeout(timeout)
            .with_metadata(metadata.clone());
        if use_tls {
            span_builder = span_builder.with_tls_config(ClientTlsConfig::new().with_enabled_roots());
        }
        let span_exporter = span_builder
            .build()
            .map_err(|source| TelemetryError::Exporter { signal: "span", source })?;

        let mut metric_builder = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.clone())
            .with_timeout(timeout)
            .with_metadata(metadata);
        if use_tls {
            metric_builder =
                metric_builder.with_tls_config(ClientTlsConfig::new().with_enabled_roots());
        }
        let metric_exporter = metric_builder
            .build()
            .map_err(|source| TelemetryError::Exporter { signal: "metric", source })?;

        let schedule = ExportSchedule::from(config);
        tracing::info!(
            endpoint = %config.endpoint,
            service_name = %config.service_name,
            header_keys = ?headers.keys().collect::<Vec<_>>(),
            metric_interval = ?schedule.metric_interval,
            trace_batch_delay = ?schedule.trace_batch_delay,
            "OTLP exporters configured"
        );

        Ok(Self::with_exporters(
            &config.service_name,
            span_exporter,
            metric_exporter,
            schedule,
        ))
    }

    /// Wire arbitrary exporters into the same provider pipeline.
    pub fn with_exporters<S, M>(
        service_name: &str,
        span_exporter: S,
        metric_exporter: M,
        schedule: ExportSchedule,
    ) -> Self
    where
        S: ExportSpans + 'static,
        M: PushMetricExporter,
    {
        let resource = build_resource(service_name);

        let processor = BatchSpanProcessor::builder(span_exporter)
            .with_batch_config(
                BatchConfigBuilder::default()
                    .with_scheduled_delay(schedule.trace_batch_delay)
                    .build(),
            )
            .build();
        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_span_processor(processor)
            .build();

        let reader = PeriodicReader::builder(metric_exporter)
            .with_interval(schedule.metric_interval)
            .build();
        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource)
            .with_reader(reader)
            .build();

        let tracer = tracer_provider.tracer(INSTRUMENTATION_NAME);
        let requests = meter_provider
            .meter(INSTRUMENTATION_NAME)
            .u64_counter(REQUESTS_COUNTER)
            .with_description("Number of requests received")
            .with_unit("1")
            .build();

        Self {
            tracer_provider,
            meter_provider,
            tracer,
            requests,
        }
    }

    /// Register both providers as the process-wide defaults.
    pub fn install_global(&self) {
        global::set_tracer_provider(self.tracer_provider.clone());
        global::set_meter_provider(self.meter_provider.clone());
    }

    /// Count one request for `operation` and open its span.
    ///
    /// The span is a child of `parent` when a remote context was propagated.
    pub fn begin(&self, operation: Operation, parent: Option<&Context>) -> OperationSpan {
        self.requests.add(
            1,
            &[
                KeyValue::new("method", operation.method()),
                KeyValue::new("endpoint", operation.endpoint().into_owned()),
            ],
        );

        let span = match parent {
            Some(cx) => self.tracer.start_with_context(operation.span_name(), cx),
            None => self.tracer.start(operation.span_name()),
        };
        OperationSpan::new(operation, span)
    }

    /// Export everything buffered so far. Failures are logged.
    pub fn force_flush(&self) {
        if let Err(e) = self.tracer_provider.force_flush() {
            tracing::warn!(error = %e, "Failed to flush spans");
        }
        if let Err(e) = self.meter_provider.force_flush() {
            tracing::warn!(error = %e, "Failed to flush metrics");
        }
    }

    /// Flush and stop both pipelines. Blocks until the exporters finish,
    /// so async callers should run it on a blocking thread.
    pub fn shutdown(&self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!(error = %e, "Meter provider shutdown failed");
        }
        tracing::info!("Telemetry shut down");
    }
}

/// Convert parsed headers into gRPC request metadata.
pub fn to_metadata(headers: &BTreeMap<String, String>) -> Result<MetadataMap, TelemetryError> {
    let mut metadata = MetadataMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = MetadataKey::<Ascii>::from_bytes(key.as_bytes())
            .map_err(|_| TelemetryError::InvalidMetadata(key.clone()))?;
        let value: MetadataValue<Ascii> = value
            .parse()
            .map_err(|_| TelemetryError::InvalidMetadata(key.clone()))?;
        metadata.insert(name, value);
    }
    Ok(metadata)
}
