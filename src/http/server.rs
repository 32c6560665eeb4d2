//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the wildcard GET route
//! - Wire up middleware (tracing, request ID, timeout)
//! - Resolve each request and execute the decision
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::proxy;
use crate::http::request::RequestTarget;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::RouteResolver;
use crate::storage::ObjectStore;
use crate::upstream::Fetcher;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<RouteResolver>,
    pub fetcher: Arc<dyn Fetcher>,
    pub store: Arc<dyn ObjectStore>,
    /// Largest virtual-origin HTML body buffered for rewriting.
    pub max_rewrite_bytes: usize,
}

/// HTTP server for the edge router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a server over the given upstream and object store.
    pub fn new(config: RouterConfig, fetcher: Arc<dyn Fetcher>, store: Arc<dyn ObjectStore>) -> Self {
        let resolver = Arc::new(RouteResolver::new(config.site.clone()));

        tracing::info!(
            domain = %config.site.domain,
            sections = resolver.matcher().subdomains().len(),
            "Route resolver ready"
        );

        let state = AppState {
            resolver,
            fetcher,
            store,
            max_rewrite_bytes: config.limits.max_rewrite_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(route_handler))
            .route("/{*path}", get(route_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Resolve the request and execute the decision.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();

    let request_id = parts
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let target = RequestTarget::from_parts(&parts.uri, &parts.headers, &state.resolver.site().domain);
    let decision = state.resolver.resolve(&target.route_request());
    let kind = decision.kind();

    tracing::debug!(
        request_id = %request_id,
        hostname = %target.hostname,
        path = %target.path,
        decision = %decision,
        "Routing request"
    );

    let response = match proxy::execute(&state, decision).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                hostname = %target.hostname,
                path = %target.path,
                error = %e,
                "Request failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(kind, response.status().as_u16(), start_time);
    response
}
