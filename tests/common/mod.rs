//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use opentelemetry::Value;
use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
use opentelemetry_sdk::metrics::InMemoryMetricExporter;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SpanData};
use tokio::net::TcpListener;

use todo_otel::config::ServiceConfig;
use todo_otel::http::HttpServer;
use todo_otel::lifecycle::Shutdown;
use todo_otel::observability::{ExportSchedule, Telemetry, REQUESTS_COUNTER};
use todo_otel::store::{MemoryTaskStore, StoreError, StoreResult, Task, TaskId, TaskStore};
use todo_otel::todo::TodoService;

/// Telemetry wired to in-memory exporters instead of a collector.
pub struct TestTelemetry {
    pub telemetry: Arc<Telemetry>,
    spans: InMemorySpanExporter,
    metrics: InMemoryMetricExporter,
}

impl TestTelemetry {
    pub fn new() -> Self {
        let spans = InMemorySpanExporter::default();
        let metrics = InMemoryMetricExporter::default();
        let telemetry = Telemetry::with_exporters(
            "todo-test",
            spans.clone(),
            metrics.clone(),
            ExportSchedule {
                metric_interval: Duration::from_secs(3600),
                trace_batch_delay: Duration::from_secs(3600),
            },
        );
        Self {
            telemetry: Arc::new(telemetry),
            spans,
            metrics,
        }
    }

    /// Flush and return every span exported so far.
    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.telemetry.force_flush();
        self.spans.get_finished_spans().unwrap()
    }

    /// Flush and return the cumulative `requests_count` per (method, endpoint).
    pub fn request_counts(&self) -> HashMap<(String, String), u64> {
        self.telemetry.force_flush();

        let mut counts = HashMap::new();
        let exported = self.metrics.get_finished_metrics().unwrap();
        // Cumulative temporality: the latest export holds the totals.
        let Some(latest) = exported.last() else {
            return counts;
        };

        for scope in latest.scope_metrics() {
            for metric in scope.metrics().filter(|m| m.name() == REQUESTS_COUNTER) {
                let AggregatedMetrics::U64(MetricData::Sum(sum)) = metric.data() else {
                    panic!("requests_count is not a u64 sum");
                };
                for point in sum.data_points() {
                    let label = |name: &str| {
                        point
                            .attributes()
                            .find(|kv| kv.key.as_str() == name)
                            .map(|kv| kv.value.as_str().into_owned())
                            .unwrap_or_default()
                    };
                    counts.insert((label("method"), label("endpoint")), point.value());
                }
            }
        }
        counts
    }

    pub fn total_requests(&self) -> u64 {
        self.request_counts().values().sum()
    }
}

/// Look up an attribute recorded on `span`.
pub fn attr(span: &SpanData, key: &str) -> Option<Value> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.clone())
}

pub fn spans_named<'a>(spans: &'a [SpanData], name: &str) -> Vec<&'a SpanData> {
    spans.iter().filter(|s| s.name == name).collect()
}

/// A store whose every call fails.
pub struct FailingStore;

impl TaskStore for FailingStore {
    fn list_all(&self) -> StoreResult<Vec<Task>> {
        Err(StoreError::Unavailable("injected failure".into()))
    }

    fn create(&self, _description: &str) -> StoreResult<Task> {
        Err(StoreError::Unavailable("injected failure".into()))
    }

    fn delete_by_id(&self, _id: TaskId) -> StoreResult<Option<Task>> {
        Err(StoreError::Unavailable("injected failure".into()))
    }
}

/// An in-memory store whose writes take `delay`, like a slow disk.
pub struct SlowStore {
    inner: MemoryTaskStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryTaskStore::new(),
            delay,
        }
    }
}

impl TaskStore for SlowStore {
    fn list_all(&self) -> StoreResult<Vec<Task>> {
        self.inner.list_all()
    }

    fn create(&self, description: &str) -> StoreResult<Task> {
        std::thread::sleep(self.delay);
        self.inner.create(description)
    }

    fn delete_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        std::thread::sleep(self.delay);
        self.inner.delete_by_id(id)
    }
}

/// A to-do service over an empty in-memory store.
pub fn memory_service(telemetry: &TestTelemetry) -> TodoService {
    TodoService::new(Arc::new(MemoryTaskStore::new()), telemetry.telemetry.clone())
}

/// Serve `todo` on an ephemeral local port.
pub async fn start_server(todo: TodoService) -> (SocketAddr, Shutdown) {
    let config = ServiceConfig::default();
    let server = HttpServer::new(&config, todo);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
