//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! RouteDecision target URL
//!     → client.rs (parse, GET, follow redirects)
//!     → UpstreamResponse (status, headers, unread body, final URL, redirected)
//!     → http layer (guard, rewrite, relay)
//! ```

pub mod client;

pub use client::{parse_target, FetchError, Fetcher, HttpFetcher, UpstreamResponse};
