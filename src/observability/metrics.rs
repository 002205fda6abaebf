//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_upstream_calls_total` (counter): upstream calls by endpoint, outcome
//! - `gateway_upstream_call_duration_seconds` (histogram): upstream latency by endpoint
//! - `gateway_pages_total` (counter): rendered pages by route, degraded
//! - `gateway_mutations_total` (counter): proxied mutations by kind, success
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one upstream call.
pub fn record_upstream_call(endpoint: String, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_upstream_calls_total",
        "endpoint" => endpoint.clone(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_call_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one rendered page.
pub fn record_page(route: &'static str, degraded: bool) {
    metrics::counter!(
        "gateway_pages_total",
        "route" => route,
        "degraded" => if degraded { "true" } else { "false" }
    )
    .increment(1);
}

/// Record one proxied mutation.
pub fn record_mutation(kind: &'static str, success: bool) {
    metrics::counter!(
        "gateway_mutations_total",
        "kind" => kind,
        "success" => if success { "true" } else { "false" }
    )
    .increment(1);
}
