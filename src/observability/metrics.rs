//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, cache, upstream failures)
//! - Expose a Prometheus-compatible endpoint when enabled
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_cache_lookups_total` (counter): lookups by result (HIT/MISS)
//! - `gateway_cache_entries` (gauge): entries held, stale ones included
//! - `gateway_upstream_failures_total` (counter): failed forwards by route
//! - `gateway_rejections_total` (counter): guard/auth/routing rejections by reason
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are static strings except status codes

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::cache::CacheStatus;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("gateway_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(status: CacheStatus) {
    counter!("gateway_cache_lookups_total", "result" => status.as_str()).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gateway_cache_entries").set(entries as f64);
}

pub fn record_upstream_failure(route: &'static str) {
    counter!("gateway_upstream_failures_total", "route" => route).increment(1);
}

pub fn record_rejection(reason: &'static str) {
    counter!("gateway_rejections_total", "reason" => reason).increment(1);
}
