//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Site values are taken verbatim; an empty subdomain list is valid

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener.bind_address '{0}'")]
    BindAddress(String),

    #[error("site.domain must not be empty")]
    EmptyDomain,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_rewrite_bytes must be greater than zero")]
    ZeroRewriteLimit,

    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.site.domain.trim().is_empty() {
        errors.push(ValidationError::EmptyDomain);
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
        ("request_secs", config.timeouts.request_secs),
    ];
    for (name, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.limits.max_rewrite_bytes == 0 {
        errors.push(ValidationError::ZeroRewriteLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_empty_subdomain_list_is_valid() {
        let mut config = RouterConfig::default();
        config.site.subdomains = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.site.domain = "  ".into();
        config.timeouts.upstream_secs = 0;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::EmptyDomain,
                ValidationError::ZeroTimeout("upstream_secs"),
                ValidationError::MetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn test_zero_rewrite_limit() {
        let mut config = RouterConfig::default();
        config.limits.max_rewrite_bytes = 0;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroRewriteLimit])
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = RouterConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
