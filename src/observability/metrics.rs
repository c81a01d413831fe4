//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): gateway requests by action, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency by action
//! - `gateway_upstream_duration_seconds` (histogram): upstream call latency by action
//! - `locale_route_decisions_total` (counter): router outcomes by class, outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_gateway_request(action: &'static str, status: u16, start: Instant) {
    counter!("gateway_requests_total", "action" => action, "status" => status.to_string())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_duration(action: &'static str, start: Instant) {
    histogram!("gateway_upstream_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_route_decision(class: &'static str, outcome: &'static str) {
    counter!("locale_route_decisions_total", "class" => class, "outcome" => outcome).increment(1);
}
