//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (requests, latency, route updates)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, route
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `admin_route_updates_total` (counter): admin updates by outcome
//! - `proxy_routes` (gauge): routes in the live table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Route label is the registered prefix, never the raw request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished proxy request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    ::metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    ::metrics::histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an admin route update attempt.
pub fn record_route_update(outcome: &'static str) {
    ::metrics::counter!("admin_route_updates_total", "outcome" => outcome).increment(1);
}

/// Record the size of the live routing table.
pub fn record_route_count(count: usize) {
    ::metrics::gauge!("proxy_routes").set(count as f64);
}
