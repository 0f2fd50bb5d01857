//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define cache and routing metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `delivery_cache_lookups_total` (counter): lookups by scope, outcome (hit/miss/error)
//! - `delivery_cache_computations_total` (counter): value computations by cache level
//! - `delivery_route_resolutions_total` (counter): resolutions by outcome
//! - `delivery_domain_table_size` (gauge): domains in the active table
//! - `delivery_snapshots_opened_total` (counter): snapshots opened
//!
//! # Design Decisions
//! - Low-overhead metric updates (no-ops until a recorder is installed)
//! - Labels are static strings only

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::cache::{CacheLevel, Scope};

/// Install the Prometheus recorder and its HTTP listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cache_lookup(scope: Scope, outcome: &'static str) {
    ::metrics::counter!(
        "delivery_cache_lookups_total",
        "scope" => scope.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_computation(level: CacheLevel) {
    ::metrics::counter!("delivery_cache_computations_total", "level" => level.as_str()).increment(1);
}

pub fn record_route_resolution(outcome: &'static str) {
    ::metrics::counter!("delivery_route_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_domain_table(size: usize) {
    ::metrics::gauge!("delivery_domain_table_size").set(size as f64);
}

pub fn record_snapshot_opened() {
    ::metrics::counter!("delivery_snapshots_opened_total").increment(1);
}
