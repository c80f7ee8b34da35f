//! Metrics collection and exposition.
//!
//! # Metrics
//! - `news_proxy_requests_total` (counter): proxied requests by provider, status
//! - `news_proxy_upstream_duration_seconds` (histogram): upstream latency by provider
//! - `news_proxy_rate_limited_total` (counter): requests rejected by the rate limiter
//!
//! # Design Decisions
//! - The `metrics` facade is a no-op until a recorder is installed
//! - Prometheus exporter runs on its own listener, off the public router

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(provider: &'static str, status: u16) {
    counter!(
        "news_proxy_requests_total",
        "provider" => provider,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_upstream(provider: &'static str, start_time: Instant) {
    histogram!("news_proxy_upstream_duration_seconds", "provider" => provider)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("news_proxy_rate_limited_total").increment(1);
}
