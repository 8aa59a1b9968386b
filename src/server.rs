//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the policy chain,
//! its configuration, the renderer, stats, and uptime), [`build_router`]
//! for the public listener with the middleware chain layered in order,
//! [`build_metrics_router`] for the metrics listener, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::RuntimeEnv;
use crate::health::health_handler;
use crate::metrics::metrics_handler;
use crate::middleware::access_log::access_log;
use crate::middleware::assets::{serve_static, AssetRoots};
use crate::middleware::chain::{Chain, ChainConfig};
use crate::middleware::instrument::track_metrics;
use crate::middleware::apply_policies;
use crate::render::{render_handler, Renderer};

#[derive(Debug)]
pub struct Stats {
    pub redirects: AtomicU64,
    pub replays: AtomicU64,
    pub renders: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            redirects: AtomicU64::new(0),
            replays: AtomicU64::new(0),
            renders: AtomicU64::new(0),
        }
    }
}

pub struct AppState {
    pub env: RuntimeEnv,
    pub chain: Chain,
    pub chain_config: ChainConfig,
    pub assets: AssetRoots,
    pub renderer: Arc<dyn Renderer>,
    pub metrics: PrometheusHandle,
    pub start_time: Instant,
    pub stats: Stats,
}

/// The public listener. Layers listed first wrap the ones after them, so a
/// request meets them top to bottom and falls through to the renderer.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(render_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(track_metrics))
                .layer(from_fn_with_state(Arc::clone(&state), apply_policies))
                .layer(CompressionLayer::new())
                .layer(from_fn_with_state(Arc::clone(&state), serve_static))
                .layer(from_fn(access_log)),
        )
        .with_state(state)
}

/// The metrics listener: Prometheus scrape plus a JSON health summary.
pub fn build_metrics_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
