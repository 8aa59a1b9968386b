//! The request middleware chain.
//!
//! Every request on the public listener passes through these stages, in
//! this order (outermost first, see [`build_router`](crate::server::build_router)):
//!
//! 1. [`instrument::track_metrics`] -- request counters and latency.
//! 2. [`apply_policies`] -- security headers, then the pure policy
//!    [`chain::Chain`]: canonical-host redirect, trailing-slash redirect,
//!    write replay to the primary region.
//! 3. Response compression (`tower-http`).
//! 4. [`assets::serve_static`] -- build output and public files.
//! 5. [`access_log::access_log`] -- one line per rendered request.
//! 6. The renderer ([`render::render_handler`](crate::render::render_handler)).

pub mod access_log;
pub mod assets;
pub mod chain;
pub mod instrument;
pub mod policy;
pub mod security;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::counter;

use crate::metrics::{REDIRECTS_TOTAL, REPLAYS_TOTAL};
use crate::server::AppState;
use chain::{RequestContext, Terminal};

/// Run the policy chain; answer from it when a stage terminates, otherwise
/// hand the request on. Security headers go on either way.
pub async fn apply_policies(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_parts(request.method(), request.uri(), request.headers());

    let mut response = match state.chain.evaluate(&ctx, &state.chain_config) {
        None => next.run(request).await,
        Some((stage, terminal @ Terminal::Redirect { .. })) => {
            state.stats.redirects.fetch_add(1, Ordering::Relaxed);
            counter!(REDIRECTS_TOTAL, "kind" => stage).increment(1);
            tracing::debug!(stage, path = %ctx.path, host = %ctx.host, "redirecting");
            terminal.into_response()
        }
        Some((_, terminal @ Terminal::ShortCircuit { .. })) => {
            state.stats.replays.fetch_add(1, Ordering::Relaxed);
            counter!(REPLAYS_TOTAL).increment(1);
            terminal.into_response()
        }
    };

    security::apply(response.headers_mut(), &state.chain_config);
    response
}
