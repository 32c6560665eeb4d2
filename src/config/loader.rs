//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

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

/// Environment variables that override file settings, in application order.
pub const ENV_OVERRIDES: &[&str] = &[
    "DOMAIN",
    "MARKETING_SUBDOMAIN",
    "SUBDOMAINS",
    "BUCKET_HOST",
    "COMPUTE_BASE_URL",
    "OBJECT_STORE_ROOT",
    "BIND_ADDRESS",
];

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => RouterConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overwrite settings from variables returned by `lookup`.
pub fn apply_env_overrides<F>(config: &mut RouterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in ENV_OVERRIDES {
        let Some(value) = lookup(key) else {
            continue;
        };
        tracing::debug!(variable = %key, "Applying environment override");

        match *key {
            "DOMAIN" => config.site.domain = value,
            "MARKETING_SUBDOMAIN" => config.site.marketing_subdomain = value,
            "SUBDOMAINS" => config.site.subdomains = value,
            "BUCKET_HOST" => config.site.bucket_host = value,
            "COMPUTE_BASE_URL" => config.site.compute_base_url = value,
            "OBJECT_STORE_ROOT" => config.object_store.root = Some(value),
            "BIND_ADDRESS" => config.listener.bind_address = value,
            _ => {}
        }
    }
}
