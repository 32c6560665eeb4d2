//! Routing decision execution.
//!
//! # Responsibilities
//! - Turn a `RouteDecision` into a client response
//! - Apply the redirect loop guard and link rewriting to virtual origins
//! - Fall back to the marketing platform on an object store miss
//!
//! # Design Decisions
//! - No retries: the first upstream answer is the answer
//! - Upstream error statuses are relayed untouched
//! - Bucket responses are relayed verbatim, redirects included
//! - Bodies stream through; only virtual-origin HTML is buffered, up to
//!   `limits.max_rewrite_bytes`, because rewriting needs all of it

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::http::link_rewriter::{is_html, LinkRewriter};
use crate::http::response::{self, ProxyError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::{GuardVerdict, RedirectLoopGuard};
use crate::routing::RouteDecision;
use crate::upstream::{parse_target, UpstreamResponse};

/// Execute `decision` against the state's collaborators.
pub async fn execute(state: &AppState, decision: RouteDecision) -> Result<Response, ProxyError> {
    match decision {
        RouteDecision::Redirect { target_url } => response::redirect(&target_url),
        RouteDecision::ProxyBucket { target_url, .. } => {
            let upstream = fetch(state, &target_url).await?;
            Ok(response::from_upstream(upstream))
        }
        RouteDecision::ProxyOrigin {
            target_url,
            subdomain,
            wildcard_paths,
        } => proxy_origin(state, &target_url, &subdomain, &wildcard_paths).await,
        RouteDecision::ServeObject { key, fallback_url } => {
            serve_object(state, &key, &fallback_url).await
        }
        RouteDecision::ProxyFallback { target_url } => proxy_fallback(state, &target_url).await,
    }
}

async fn fetch(state: &AppState, target_url: &str) -> Result<UpstreamResponse, ProxyError> {
    let url = parse_target(target_url)?;
    Ok(state.fetcher.fetch(&url).await?)
}

async fn proxy_origin(
    state: &AppState,
    target_url: &str,
    subdomain: &str,
    wildcard_paths: &[String],
) -> Result<Response, ProxyError> {
    let mut upstream = fetch(state, target_url).await?;

    if upstream.redirected {
        match RedirectLoopGuard.inspect(wildcard_paths, &upstream.url) {
            GuardVerdict::Redirect(location) => {
                metrics::record_upstream_redirect("redirect");
                tracing::info!(
                    subdomain = %subdomain,
                    location = %location,
                    "Virtual origin redirected elsewhere, redirecting client"
                );
                return response::redirect(location.as_str());
            }
            GuardVerdict::Refetch(location) => {
                metrics::record_upstream_redirect("refetch");
                tracing::debug!(
                    subdomain = %subdomain,
                    location = %location,
                    "Virtual origin normalised the path, refetching"
                );
                upstream = state.fetcher.fetch(&location).await?;
                upstream.status = StatusCode::OK;
            }
        }
    }

    if is_html(upstream.content_type()) {
        let html = upstream.buffer(state.max_rewrite_bytes).await?;
        let rewritten = LinkRewriter::new(subdomain).rewrite(&html);
        upstream.headers.remove(header::CONTENT_LENGTH);
        upstream.body = Body::from(rewritten);
    }

    Ok(response::from_upstream(upstream))
}

async fn serve_object(
    state: &AppState,
    key: &str,
    fallback_url: &str,
) -> Result<Response, ProxyError> {
    match state.store.get(key).await {
        Ok(Some(object)) => {
            metrics::record_object_lookup("hit");
            tracing::debug!(key = %key, "Serving stored object");
            Ok(response::from_object(object))
        }
        Ok(None) => {
            metrics::record_object_lookup("miss");
            proxy_fallback(state, fallback_url).await
        }
        Err(e) => {
            metrics::record_object_lookup("error");
            Err(e.into())
        }
    }
}

async fn proxy_fallback(state: &AppState, target_url: &str) -> Result<Response, ProxyError> {
    let upstream = fetch(state, target_url).await?;

    if upstream.redirected {
        metrics::record_upstream_redirect("passthrough");
        tracing::info!(
            location = %upstream.url,
            "Marketing platform redirected, redirecting client"
        );
        return response::redirect(upstream.url.as_str());
    }

    Ok(response::from_upstream(upstream))
}
