//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feature_proxy_requests_total` (counter): requests by layer and outcome
//! - `feature_proxy_upstream_duration_seconds` (histogram): upstream latency
//! - `feature_proxy_features` (gauge): feature count of the last good response
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one API request for `layer`; `outcome` is "ok" or an error kind.
pub fn record_request(layer: &str, status: u16, outcome: &'static str) {
    counter!(
        "feature_proxy_requests_total",
        "layer" => layer.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_upstream(type_name: &str, start: Instant) {
    histogram!(
        "feature_proxy_upstream_duration_seconds",
        "layer" => type_name.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_feature_count(layer: &str, count: usize) {
    gauge!("feature_proxy_features", "layer" => layer.to_string()).set(count as f64);
}
