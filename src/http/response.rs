//! Response construction.
//!
//! # Responsibilities
//! - Build the 301 redirects the router issues
//! - Relay upstream responses (status, headers, streamed body)
//! - Serve stored objects with their HTTP metadata
//! - Map execution failures to status codes
//!
//! # Design Decisions
//! - Hop-by-hop headers are stripped when relaying
//! - `Content-Length` is relayed with an untouched body; callers that replace
//!   the body drop it so the new body's own length is sent

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::storage::{StoreError, StoredObject};
use crate::upstream::{FetchError, UpstreamResponse};

/// Headers that describe a single connection.
const STRIPPED_HEADERS: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Failures while executing a routing decision.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("redirect location is not a valid header value: {0}")]
    Location(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::Fetch(FetchError::Body(_)) => {
                (StatusCode::BAD_GATEWAY, "Upstream body too large to rewrite")
            }
            ProxyError::Fetch(_) => (StatusCode::BAD_GATEWAY, "Upstream request failed"),
            ProxyError::Location(_) => (StatusCode::BAD_GATEWAY, "Invalid upstream redirect"),
            ProxyError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Object store unavailable"),
        };
        (status, message).into_response()
    }
}

/// A `301 Moved Permanently` to `location`.
pub fn redirect(location: &str) -> Result<Response, ProxyError> {
    let value = HeaderValue::from_str(location)
        .map_err(|_| ProxyError::Location(location.to_string()))?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}

/// Relay an upstream response as-is, streaming its body.
pub fn from_upstream(upstream: UpstreamResponse) -> Response {
    with_body(upstream.status, &upstream.headers, upstream.body)
}

/// A response with `status`, the relayable subset of `headers`, and `body`.
pub fn with_body(status: StatusCode, headers: &HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let relayed = response.headers_mut();
    for (name, value) in headers {
        if is_relayable(name) {
            relayed.append(name.clone(), value.clone());
        }
    }
    response
}

/// A `200 OK` carrying a stored object.
pub fn from_object(object: StoredObject) -> Response {
    let mut response = Response::new(Body::from(object.body));
    let headers = response.headers_mut();

    let metadata = [
        (header::CONTENT_TYPE, Some(object.content_type)),
        (header::ETAG, Some(object.etag)),
        (header::LAST_MODIFIED, object.last_modified),
        (header::CACHE_CONTROL, object.cache_control),
    ];
    for (name, value) in metadata {
        let Some(value) = value else { continue };
        match HeaderValue::try_from(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::warn!(header = %name, "Skipping unencodable object metadata"),
        }
    }
    response
}

fn is_relayable(name: &HeaderName) -> bool {
    !STRIPPED_HEADERS.contains(name) && name.as_str() != "keep-alive"
}
