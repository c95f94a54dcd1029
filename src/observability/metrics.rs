//! Metrics collection and exposition.
//!
//! # Metrics
//! - `satto_requests_total` (counter): page responses by page, status
//! - `satto_render_duration_seconds` (histogram): page pipeline latency
//! - `satto_fetch_total` (counter): SSR data fetches by outcome
//! - `satto_fetch_duration_seconds` (histogram): SSR data fetch latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a completed page request.
pub fn record_request(page: &str, status: u16, start: Instant) {
    metrics::counter!(
        "satto_requests_total",
        "page" => page.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("satto_render_duration_seconds", "page" => page.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record an SSR data fetch.
pub fn record_fetch(outcome: &'static str, start: Instant) {
    metrics::counter!("satto_fetch_total", "outcome" => outcome).increment(1);
    metrics::histogram!("satto_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}
