//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The public site and its backing origins.
    pub site: SiteConfig,

    /// Static object store settings.
    pub object_store: ObjectStoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Body size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The canonical domain and the origins serving its sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical public domain (e.g., "example.com").
    pub domain: String,

    /// Subdomain prefix of the marketing platform that serves everything
    /// no section claims.
    pub marketing_subdomain: String,

    /// Comma-separated section names served from virtual origins.
    pub subdomains: String,

    /// Host name of the object-storage bucket.
    pub bucket_host: String,

    /// First path segment of app-owned objects inside the bucket.
    pub bucket_app_root: String,

    /// `host[:port]` of the compute platform; fetched over plain http.
    pub compute_base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "example.com".to_string(),
            marketing_subdomain: "marketing".to_string(),
            subdomains: String::new(),
            bucket_host: String::new(),
            bucket_app_root: "app-root".to_string(),
            compute_base_url: String::new(),
        }
    }
}

/// Object store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// Directory holding the objects. `None` means every lookup misses.
    pub root: Option<String>,

    /// `Cache-Control` value attached to served objects.
    pub cache_control: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time for an upstream to answer with response headers, in seconds.
    /// Relayed bodies stream afterwards without a deadline.
    pub upstream_secs: u64,

    /// Total time for an inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 20,
            request_secs: 30,
        }
    }
}

/// Body size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest virtual-origin HTML body buffered for link rewriting.
    pub max_rewrite_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rewrite_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
