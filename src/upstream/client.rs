//! Upstream fetch primitive.
//!
//! # Responsibilities
//! - GET a URL, following redirects with the client's default hop limit
//! - Report the final URL and whether a redirect was followed
//! - Hand back the body unread so it can be streamed to the client
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pooling across requests)
//! - The upstream deadline covers the response head only; bodies stream
//!   for as long as the upstream keeps sending
//! - No retries; transport failures are returned to the caller as errors
//! - Client request headers are not forwarded upstream

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;

/// Errors that can occur while talking to an upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The constructed target is not a valid absolute URL.
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection or protocol failure before the response head arrived.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response head within the upstream deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// The body failed mid-read or exceeded the buffering limit.
    #[error("upstream body could not be buffered: {0}")]
    Body(#[source] axum::Error),
}

/// An upstream response whose body has not been read yet.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
    /// URL the response was finally served from.
    pub url: Url,
    /// Whether reaching `url` involved following a redirect.
    pub redirected: bool,
}

impl UpstreamResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Read the whole body, failing once it grows past `limit` bytes.
    pub async fn buffer(&mut self, limit: usize) -> Result<Bytes, FetchError> {
        let body = std::mem::replace(&mut self.body, Body::empty());
        axum::body::to_bytes(body, limit)
            .await
            .map_err(FetchError::Body)
    }
}

/// Something that can GET a URL.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    async fn fetch(&self, url: &Url) -> Result<UpstreamResponse, FetchError>;
}

/// Parse a target URL built by the resolver.
pub fn parse_target(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// `Fetcher` backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    head_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(concat!("edge-router/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            head_timeout: Duration::from_secs(timeouts.upstream_secs),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<UpstreamResponse, FetchError> {
        let response = tokio::time::timeout(self.head_timeout, self.client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout(self.head_timeout))??;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let redirected = final_url != *url;

        tracing::debug!(
            url = %url,
            final_url = %final_url,
            status = %status,
            redirected,
            content_length = ?response.content_length(),
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            headers,
            body: Body::from_stream(response.bytes_stream()),
            url: final_url,
            redirected,
        })
    }
}
