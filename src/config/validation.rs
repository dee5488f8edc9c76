//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the collector endpoint and authentication headers
//! - Validate value ranges (timeouts > 0, intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::headers::{parse_headers, HeaderParseError};
use crate::config::schema::ServiceConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("collector endpoint is not set")]
    MissingEndpoint,

    #[error("collector endpoint {endpoint:?} is invalid: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("collector headers are not set")]
    MissingHeaders,

    #[error("collector headers are malformed: {0}")]
    MalformedHeaders(HeaderParseError),

    #[error("service name is empty")]
    EmptyServiceName,

    #[error("bind address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let telemetry = &config.telemetry;

    let endpoint = telemetry.endpoint.trim();
    if endpoint.is_empty() {
        errors.push(ValidationError::MissingEndpoint);
    } else if let Err(reason) = check_endpoint(endpoint) {
        errors.push(ValidationError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        });
    }

    if telemetry.headers.trim().is_empty() {
        errors.push(ValidationError::MissingHeaders);
    } else if let Err(e) = parse_headers(&telemetry.headers) {
        errors.push(ValidationError::MalformedHeaders(e));
    }

    if telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if telemetry.metric_interval_secs == 0 {
        errors.push(ValidationError::ZeroValue("telemetry.metric_interval_secs"));
    }
    if telemetry.trace_batch_delay_ms == 0 {
        errors.push(ValidationError::ZeroValue("telemetry.trace_batch_delay_ms"));
    }
    if telemetry.export_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("telemetry.export_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
