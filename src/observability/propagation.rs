//! W3C trace-context extraction from inbound requests.

use axum::http::HeaderMap;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Extract the remote parent context carried by `traceparent`/`tracestate`.
///
/// Returns `None` when the headers carry no valid remote span context.
pub fn extract_parent(headers: &HeaderMap) -> Option<Context> {
    if headers.is_empty() {
        return None;
    }

    let cx = TraceContextPropagator::new().extract(&HeaderExtractor(headers));
    if cx.span().span_context().is_valid() {
        Some(cx)
    } else {
        None
    }
}
