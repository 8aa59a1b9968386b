//! The policy chain as data.
//!
//! A [`Chain`] is an ordered list of named [`Stage`] functions. Each stage
//! looks at an immutable [`RequestContext`] and the process-wide
//! [`ChainConfig`] and returns a [`Decision`]. [`Chain::evaluate`] runs the
//! stages in order and stops at the first [`Decision::Stop`], so at most
//! one stage ever answers a request. Only a [`Terminal`] can become a
//! response.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use super::policy;
use crate::config::model::HostPolicy;
use crate::config::RuntimeEnv;

/// Read-only view of the parts of a request the policies inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    /// Hostname without port, lowercased. Empty when the request carried none.
    pub host: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, host: &str, path: &str, query: Option<&str>) -> Self {
        Self {
            method,
            host: host.to_ascii_lowercase(),
            path: path.to_string(),
            query: query.map(String::from),
        }
    }

    /// Build the context the way a proxy-aware server sees the request:
    /// `X-Forwarded-Host` first, then `Host`, then the URI authority.
    #[must_use]
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let raw_host = headers
            .get("x-forwarded-host")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or("");

        Self::new(method.clone(), hostname(raw_host), uri.path(), uri.query())
    }

    /// The original path plus `?query` when one was sent.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Strip the port from a `Host` value, leaving bracketed IPv6 literals intact.
fn hostname(host: &str) -> &str {
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Values every stage reads; built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub fly_region: Option<String>,
    pub primary_region: Option<String>,
    pub hosts: HostPolicy,
}

impl ChainConfig {
    #[must_use]
    pub fn new(env: &RuntimeEnv, hosts: &HostPolicy) -> Self {
        Self {
            fly_region: env.fly_region.clone(),
            primary_region: env.primary_region.clone(),
            hosts: hosts.clone(),
        }
    }

    /// The region named in `x-fly-region`.
    #[must_use]
    pub fn region_label(&self) -> &str {
        self.fly_region.as_deref().unwrap_or("unknown")
    }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(Terminal),
}

/// A response a stage answers with instead of passing the request on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Redirect {
        status: StatusCode,
        location: String,
    },
    ShortCircuit {
        status: StatusCode,
        headers: Vec<(HeaderName, String)>,
    },
}

impl Decision {
    #[must_use]
    pub fn permanent_redirect(location: String) -> Self {
        Self::Stop(Terminal::Redirect {
            status: StatusCode::MOVED_PERMANENTLY,
            location,
        })
    }

    #[must_use]
    pub fn short_circuit(status: StatusCode, headers: Vec<(HeaderName, String)>) -> Self {
        Self::Stop(Terminal::ShortCircuit { status, headers })
    }
}

impl IntoResponse for Terminal {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect { status, location } => match HeaderValue::from_str(&location) {
                Ok(value) => {
                    let body = format!("Redirecting to {location}");
                    let mut response = (status, body).into_response();
                    response.headers_mut().insert(header::LOCATION, value);
                    response
                }
                Err(e) => {
                    tracing::error!(location = %location, error = %e, "unencodable redirect target");
                    StatusCode::BAD_REQUEST.into_response()
                }
            },
            Self::ShortCircuit { status, headers } => {
                let reason = status.canonical_reason().unwrap_or_default();
                let mut response = Response::builder()
                    .status(status)
                    .header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
                for (name, value) in &headers {
                    response = response.header(name, value);
                }
                response.body(Body::from(reason)).unwrap_or_else(|e| {
                    tracing::error!(error = %e, "failed to build short-circuit response");
                    status.into_response()
                })
            }
        }
    }
}

pub type Stage = fn(&RequestContext, &ChainConfig) -> Decision;

#[derive(Clone)]
pub struct Chain {
    stages: Vec<(&'static str, Stage)>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::standard()
    }
}

impl Chain {
    /// Host redirect, then trailing-slash cleanup, then write replay.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_stages(vec![
            ("canonical_host", policy::canonical_host as Stage),
            ("trailing_slash", policy::trailing_slash as Stage),
            ("replay_writes", policy::replay_writes as Stage),
        ])
    }

    #[must_use]
    pub fn from_stages(stages: Vec<(&'static str, Stage)>) -> Self {
        Self { stages }
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(name, _)| *name).collect()
    }

    /// Run stages in order; the first stage to stop wins and is returned
    /// with its name. `None` means every stage continued.
    #[must_use]
    pub fn evaluate(
        &self,
        request: &RequestContext,
        config: &ChainConfig,
    ) -> Option<(&'static str, Terminal)> {
        self.stages.iter().find_map(|(name, stage)| match stage(request, config) {
            Decision::Continue => None,
            Decision::Stop(terminal) => {
                tracing::debug!(stage = *name, path = %request.path, "chain terminated");
                Some((*name, terminal))
            }
        })
    }
}
