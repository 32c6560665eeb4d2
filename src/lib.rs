//! Edge router for a multi-section site.
//!
//! Serves one canonical domain while sections live on independently deployed
//! origins: virtual origins reached by subdomain, object-storage buckets, a
//! compute platform, and a marketing platform that takes everything else.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod storage;
pub mod upstream;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteDecision, RouteResolver};
