//! Failure injection tests: unreachable collector, failing store, shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use todo_otel::config::TelemetryConfig;
use todo_otel::observability::{Telemetry, TelemetryError};
use todo_otel::store::MemoryTaskStore;
use todo_otel::todo::TodoService;

mod common;

use common::{start_server, FailingStore, TestTelemetry};

fn unreachable_collector() -> TelemetryConfig {
    TelemetryConfig {
        // Nothing listens on the discard port.
        endpoint: "http://127.0.0.1:9".to_string(),
        headers: "api-key:abc123".to_string(),
        metric_interval_secs: 1,
        trace_batch_delay_ms: 100,
        export_timeout_secs: 1,
        ..TelemetryConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_requests_succeed_with_unreachable_collector() {
    let telemetry = Arc::new(Telemetry::from_config(&unreachable_collector()).unwrap());
    let todo = TodoService::new(Arc::new(MemoryTaskStore::new()), telemetry.clone());
    let (addr, shutdown) = start_server(todo).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let start = Instant::now();
    for i in 0..5 {
        let res = client
            .post(format!("http://{addr}/add"))
            .form(&[("task", format!("task {i}"))])
            .send()
            .await
            .expect("service unreachable");
        assert_eq!(res.status(), 200, "redirect should land on the list page");
    }
    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("task 4"));

    // Export runs in the background; requests never wait for the collector.
    assert!(start.elapsed() < Duration::from_secs(5));

    // Let at least one export attempt fail in the background.
    tokio::time::sleep(Duration::from_millis(1500)).await;

    shutdown.trigger("test");
    let flushed = telemetry.clone();
    tokio::task::spawn_blocking(move || flushed.shutdown())
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_metadata_is_fatal() {
    let config = TelemetryConfig {
        headers: "bad key:abc".to_string(),
        ..unreachable_collector()
    };
    assert!(matches!(
        Telemetry::from_config(&config),
        Err(TelemetryError::InvalidMetadata(_))
    ));

    let config = TelemetryConfig {
        headers: "no-separator".to_string(),
        ..unreachable_collector()
    };
    assert!(matches!(
        Telemetry::from_config(&config),
        Err(TelemetryError::Headers(_))
    ));
}

#[tokio::test]
async fn test_store_outage_reported_to_user() {
    let telemetry = TestTelemetry::new();
    let todo = TodoService::new(Arc::new(FailingStore), telemetry.telemetry.clone());
    let (addr, shutdown) = start_server(todo).await;

    let client = reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let res = client
        .get(format!("http://{addr}/delete/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    // Both requests were counted and traced despite failing.
    assert_eq!(telemetry.total_requests(), 2);
    assert_eq!(telemetry.finished_spans().len(), 2);

    shutdown.trigger("test");
}

#[tokio::test]
async fn test_graceful_shutdown_stops_listener() {
    let telemetry = TestTelemetry::new();
    let todo = common::memory_service(&telemetry);
    let (addr, shutdown) = start_server(todo).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    drop(client);

    shutdown.trigger("test");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    assert!(client.get(format!("http://{addr}/")).send().await.is_err());
}
