//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the build, uptime,
//! region and mode of the process, how many posts are cached, and
//! cumulative counts of what the chain has done.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_sha: String,
    pub uptime_seconds: u64,
    pub region: String,
    pub primary_region: Option<String>,
    pub mode: String,
    /// `None` in development, where posts are read per request.
    pub posts: Option<usize>,
    pub stats: StatsResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub redirects: u64,
    pub replays: u64,
    pub renders: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: env!("BITBYTE_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        region: state.chain_config.region_label().to_string(),
        primary_region: state.chain_config.primary_region.clone(),
        mode: state.env.mode.as_str().to_string(),
        posts: state.renderer.cached_posts(),
        stats: StatsResponse {
            redirects: state.stats.redirects.load(Ordering::Relaxed),
            replays: state.stats.replays.load(Ordering::Relaxed),
            renders: state.stats.renders.load(Ordering::Relaxed),
        },
    })
}
