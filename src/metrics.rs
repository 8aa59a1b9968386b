//! Prometheus metrics: recorder setup, metric names, and the scrape
//! endpoint served on the metrics listener.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use metrics_process::Collector;

use crate::error::BlogError;
use crate::server::AppState;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const REDIRECTS_TOTAL: &str = "bitbyte_redirects_total";
pub const REPLAYS_TOTAL: &str = "bitbyte_replays_total";
pub const RENDERS_TOTAL: &str = "bitbyte_renders_total";

const DURATION_BUCKETS: [f64; 11] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Install the global recorder. Must be called once, before the first request.
pub fn install() -> Result<PrometheusHandle, BlogError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &DURATION_BUCKETS,
        )?
        .install_recorder()?;
    describe();
    Collector::default().describe();
    record_build_info();
    Ok(handle)
}

fn describe() {
    describe_counter!(REQUESTS_TOTAL, "Total HTTP requests by method and status code");
    describe_histogram!(
        REQUEST_DURATION,
        "HTTP request duration in seconds by method and status code"
    );
    describe_counter!(
        REDIRECTS_TOTAL,
        "Requests answered with a redirect, by the policy that issued it"
    );
    describe_counter!(
        REPLAYS_TOTAL,
        "Write requests sent back to the primary region"
    );
    describe_counter!(RENDERS_TOTAL, "Requests handed to the page renderer");
    describe_gauge!("process_uptime_seconds", "Seconds since the process started");
    describe_gauge!("bitbyte_build_info", "Build metadata; the value is always 1");
}

fn record_build_info() {
    gauge!(
        "bitbyte_build_info",
        "version" => env!("CARGO_PKG_VERSION"),
        "git_sha" => env!("BITBYTE_GIT_SHORT"),
        "rustc" => env!("BITBYTE_RUSTC_VERSION")
    )
    .set(1.0);
}

/// Drain histogram buckets periodically; the recorder has no upkeep thread of its own.
pub async fn upkeep_loop(handle: PrometheusHandle, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => handle.run_upkeep(),
            _ = shutdown.changed() => {
                tracing::debug!("metrics upkeep loop shutting down");
                return;
            }
        }
    }
}

/// `GET /metrics` in the Prometheus text exposition format.
///
/// Process gauges (CPU seconds, resident memory, open fds, threads, start
/// time) are sampled on every scrape.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Collector::default().collect();
    gauge!("process_uptime_seconds").set(state.start_time.elapsed().as_secs_f64());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
