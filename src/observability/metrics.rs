//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): image requests by outcome
//! - `gateway_forward_duration_seconds` (histogram): time spent on the
//!   resize backend, refused and failed attempts included
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels limited to the outcome to keep cardinality fixed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one image request that reached a terminal state.
pub fn record_request(outcome: &'static str) {
    metrics::counter!("gateway_requests_total", "outcome" => outcome).increment(1);
}

/// Record the duration of one forward to the resize backend.
pub fn record_forward(outcome: &'static str, start: Instant) {
    metrics::histogram!("gateway_forward_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
