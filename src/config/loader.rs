//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const ENV_HEADERS: &str = "OTEL_EXPORTER_OTLP_HEADERS";
pub const ENV_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const ENV_BIND_ADDRESS: &str = "TODO_BIND_ADDRESS";
pub const ENV_STORE_PATH: &str = "TODO_STORE_PATH";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line overrides. They take precedence over the file and the
/// environment and are validated with everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
}

/// Load configuration from an optional TOML file, overlay the process
/// environment and `overrides`, and validate the result.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<ServiceConfig, ConfigError> {
    load_config_with(path, overrides, |key| std::env::var(key).ok())
}

/// Same as [`load_config`], reading variables through `lookup`.
pub fn load_config_with<F>(
    path: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);
    if let Some(bind) = &overrides.bind_address {
        config.listener.bind_address = bind.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`. Unset or empty variables
/// leave the file value in place.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.telemetry.endpoint = endpoint;
    }
    if let Some(headers) = get(ENV_HEADERS) {
        config.telemetry.headers = headers;
    }
    if let Some(name) = get(ENV_SERVICE_NAME) {
        config.telemetry.service_name = name;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(path) = get(ENV_STORE_PATH) {
        config.store.path = Some(path);
    }
}
