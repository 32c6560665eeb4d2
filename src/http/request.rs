//! Request target extraction.
//!
//! # Responsibilities
//! - Derive scheme, authority and hostname from the inbound request
//! - Hand the raw path and query to the resolver untouched
//!
//! # Design Decisions
//! - `Host` header first, then the URI authority, then the canonical domain
//! - Hostname is lowercased; section names themselves stay case-sensitive
//! - Scheme comes from `X-Forwarded-Proto` when a TLS terminator sits in
//!   front, and defaults to `https`

use axum::http::{header, HeaderMap, Uri};
use url::Url;

use crate::routing::RouteRequest;

pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

const DEFAULT_SCHEME: &str = "https";

/// The routing-relevant view of one request, owned so it can outlive the
/// request parts it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub origin: String,
    pub hostname: String,
    pub path: String,
    pub search: String,
}

impl RequestTarget {
    pub fn from_parts(uri: &Uri, headers: &HeaderMap, default_host: &str) -> Self {
        let authority = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or(default_host);

        let scheme = headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| uri.scheme_str())
            .unwrap_or(DEFAULT_SCHEME)
            .to_ascii_lowercase();

        Self {
            origin: format!("{scheme}://{authority}"),
            hostname: strip_port(authority).to_ascii_lowercase(),
            path: uri.path().to_string(),
            search: search(uri.query()),
        }
    }

    /// Build from an absolute URL, as typed on the command line.
    pub fn from_url(url: &Url) -> Self {
        Self {
            origin: url.origin().ascii_serialization(),
            hostname: url.host_str().unwrap_or_default().to_ascii_lowercase(),
            path: url.path().to_string(),
            search: search(url.query()),
        }
    }

    pub fn route_request(&self) -> RouteRequest<'_> {
        RouteRequest {
            origin: &self.origin,
            hostname: &self.hostname,
            path: &self.path,
            search: &self.search,
        }
    }
}

fn search(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => String::new(),
    }
}

fn strip_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        // IPv6 literal: keep the brackets, drop anything after them.
        return authority
            .find(']')
            .map_or(authority, |end| &authority[..=end]);
    }
    authority.split(':').next().unwrap_or(authority)
}
