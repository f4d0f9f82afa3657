//! Metrics collection and exposition.
//!
//! # Metrics
//! - `page_renders_total` (counter): renders by component, kind, status
//! - `page_render_duration_seconds` (histogram): render latency by component, kind
//!
//! `kind` is one of `html`, `json`, `conflict`.
//!
//! Recording is a no-op until a recorder is installed, so unit tests and
//! binaries with metrics disabled pay nothing.

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one page render.
pub fn record_render(component: &str, kind: &'static str, status: StatusCode, started: Instant) {
    ::metrics::counter!(
        "page_renders_total",
        "component" => component.to_owned(),
        "kind" => kind,
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "page_render_duration_seconds",
        "component" => component.to_owned(),
        "kind" => kind
    )
    .record(started.elapsed().as_secs_f64());
}
