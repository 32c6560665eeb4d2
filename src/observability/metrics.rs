//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by decision, status
//! - `router_request_duration_seconds` (histogram): latency by decision
//! - `router_upstream_redirects_total` (counter): redirected upstream
//!   responses by outcome (`refetch`, `redirect`, `passthrough`)
//! - `router_object_lookups_total` (counter): object store lookups by
//!   result (`hit`, `miss`, `error`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(decision: &'static str, status: u16, start: Instant) {
    counter!(
        "router_requests_total",
        "decision" => decision,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_redirect(outcome: &'static str) {
    counter!("router_upstream_redirects_total", "outcome" => outcome).increment(1);
}

pub fn record_object_lookup(result: &'static str) {
    counter!("router_object_lookups_total", "result" => result).increment(1);
}
