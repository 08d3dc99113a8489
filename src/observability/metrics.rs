//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome
//! - `sitemap_rules` (gauge): compiled rules per language, set on every load
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Prometheus endpoint only when enabled in config

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Count one resolution.
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

/// Publish the rule count of a freshly loaded sitemap.
pub fn record_sitemap_rules(language: &str, rules: usize) {
    metrics::gauge!("sitemap_rules", "language" => language.to_string()).set(rules as f64);
}
