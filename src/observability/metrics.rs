//! Metrics collection and exposition.
//!
//! # Metrics
//! - `asset_resolutions_total` (counter): resolutions by outcome
//!   (`matched`, `fallback`, `empty`)
//! - `asset_template_blocks_total` (counter): template blocks produced
//! - `asset_requests_total` (counter): preview server requests by route, status
//! - `asset_request_duration_seconds` (histogram): preview server latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "metrics endpoint listening");
    Ok(())
}

/// Count one resolution by outcome.
pub fn record_resolution(outcome: &'static str) {
    counter!("asset_resolutions_total", "outcome" => outcome).increment(1);
}

/// Count the blocks produced by one aggregation.
pub fn record_template_blocks(count: usize) {
    counter!("asset_template_blocks_total").increment(count as u64);
}

/// Count a served request and record its latency.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "asset_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("asset_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
