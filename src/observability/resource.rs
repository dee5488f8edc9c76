//! Process identity attached to every exported span and metric.

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

/// Build the resource descriptor for this process.
pub fn build_resource(service_name: &str) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .build()
}
