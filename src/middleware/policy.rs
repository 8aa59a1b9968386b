//! The request policies run by [`Chain::standard`](super::chain::Chain::standard).
//!
//! Every function here is total and pure: it reads the request context and
//! the chain config and returns a [`Decision`]. None of them touch the
//! process environment or keep state between calls.

use axum::http::{HeaderName, Method, StatusCode};

use super::chain::{ChainConfig, Decision, RequestContext};

pub const FLY_REPLAY: HeaderName = HeaderName::from_static("fly-replay");

/// Hosts that never get redirected so local development keeps working.
#[must_use]
pub fn is_local_host(host: &str) -> bool {
    host == "localhost" || host.starts_with("localhost:") || host == "127.0.0.1"
}

/// Steer the platform's default domain to the canonical origin.
pub fn canonical_host(req: &RequestContext, config: &ChainConfig) -> Decision {
    if is_local_host(&req.host) {
        return Decision::Continue;
    }
    if req.host.eq_ignore_ascii_case(&config.hosts.legacy_host) {
        return Decision::permanent_redirect(format!(
            "{}{}",
            config.hosts.canonical_origin,
            req.path_and_query()
        ));
    }
    Decision::Continue
}

/// Normalize a path that ends in `/`: runs of slashes collapse to one and
/// the trailing slash goes. `/` itself is already normal.
#[must_use]
pub fn normalize_path(path: &str) -> Option<String> {
    if path.len() <= 1 || !path.ends_with('/') {
        return None;
    }

    let mut collapsed = String::with_capacity(path.len());
    for ch in path.chars() {
        if ch == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(ch);
    }
    if collapsed.len() > 1 {
        collapsed.pop();
    }
    Some(collapsed)
}

/// Redirect `/blogs/post/` to `/blogs/post`, keeping the query.
pub fn trailing_slash(req: &RequestContext, _config: &ChainConfig) -> Decision {
    match normalize_path(&req.path) {
        Some(clean) => {
            let location = match &req.query {
                Some(q) => format!("{clean}?{q}"),
                None => clean,
            };
            Decision::permanent_redirect(location)
        }
        None => Decision::Continue,
    }
}

/// Methods that read-only replicas may serve.
#[must_use]
pub fn is_read_only_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// The primary region to replay to, when this instance is a read replica.
#[must_use]
pub fn replica_of(config: &ChainConfig) -> Option<&str> {
    match (config.fly_region.as_deref(), config.primary_region.as_deref()) {
        (Some(current), Some(primary))
            if !current.is_empty() && !primary.is_empty() && current != primary =>
        {
            Some(primary)
        }
        _ => None,
    }
}

/// Send writes that land on a replica region back to the primary.
pub fn replay_writes(req: &RequestContext, config: &ChainConfig) -> Decision {
    if is_read_only_method(&req.method) {
        return Decision::Continue;
    }
    let Some(primary) = replica_of(config) else {
        return Decision::Continue;
    };

    tracing::info!(
        path = %req.path,
        method = %req.method,
        primary_region = %primary,
        fly_region = %config.region_label(),
        "replaying write to primary region"
    );

    Decision::short_circuit(
        StatusCode::CONFLICT,
        vec![(FLY_REPLAY, format!("region={primary}"))],
    )
}
