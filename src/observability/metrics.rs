//! Metrics collection and exposition.
//!
//! # Metrics
//! - `geo_redirect_requests_total` (counter): requests by status, region
//! - `geo_redirect_request_duration_seconds` (histogram): handler latency
//! - `geo_redirect_failures_total` (counter): failed requests by stage

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record a successful redirect.
pub fn record_redirect(region: &str, start: Instant) {
    counter!(
        "geo_redirect_requests_total",
        "status" => "302",
        "region" => region.to_string()
    )
    .increment(1);
    histogram!("geo_redirect_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a request that ended in an error response.
pub fn record_failure(stage: &'static str, status: u16, start: Instant) {
    counter!(
        "geo_redirect_requests_total",
        "status" => status.to_string(),
        "region" => "none"
    )
    .increment(1);
    counter!("geo_redirect_failures_total", "stage" => stage).increment(1);
    histogram!("geo_redirect_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
