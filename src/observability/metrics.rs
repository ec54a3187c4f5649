//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vrouter_requests_total` (counter): requests by route, status
//! - `vrouter_request_duration_seconds` (histogram): latency by route
//! - `vrouter_manifest_reloads_total` (counter): channels file loads by result
//! - `vrouter_redirects_total` (counter): redirects by kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels stay low-cardinality (route names, not paths)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("vrouter_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("vrouter_request_duration_seconds", "route" => route).record(start.elapsed().as_secs_f64());
}

pub fn record_manifest_reload(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("vrouter_manifest_reloads_total", "result" => result).increment(1);
}

pub fn record_redirect(kind: &'static str) {
    counter!("vrouter_redirects_total", "kind" => kind).increment(1);
}
