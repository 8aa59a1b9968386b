//! Static file short-circuit.
//!
//! Fingerprinted build output under `/build` is cached for a year and
//! marked immutable; everything else in the public root is cached for an
//! hour. Only GET and HEAD are served. A miss falls through to the next
//! stage so the renderer can answer (and 404 if it must).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::server::AppState;

pub const BUILD_PREFIX: &str = "/build";

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";
const SHORT_CACHE: &str = "public, max-age=3600";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Content-hashed build output.
    Fingerprinted,
    /// Everything else in the public root (favicon, images).
    Public,
}

impl Mount {
    #[must_use]
    pub const fn cache_control(self) -> &'static str {
        match self {
            Self::Fingerprinted => IMMUTABLE_CACHE,
            Self::Public => SHORT_CACHE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetRoots {
    pub public_dir: PathBuf,
}

impl AssetRoots {
    #[must_use]
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    #[must_use]
    pub fn root(&self, mount: Mount) -> PathBuf {
        match mount {
            Mount::Fingerprinted => self.public_dir.join("build"),
            Mount::Public => self.public_dir.clone(),
        }
    }
}

/// Which mount a path belongs to and the path relative to that mount.
#[must_use]
pub fn resolve_mount(path: &str) -> (Mount, &str) {
    match path.strip_prefix(BUILD_PREFIX) {
        Some("") => (Mount::Fingerprinted, "/"),
        Some(rest) if rest.starts_with('/') => (Mount::Fingerprinted, rest),
        _ => (Mount::Public, path),
    }
}

pub async fn serve_static(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let (mount, relative) = resolve_mount(request.uri().path());
    let root = state.assets.root(mount);

    let found = lookup(&root, request.method(), relative, request.headers()).await;
    match found {
        Some(mut response) => {
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static(mount.cache_control()),
            );
            response
        }
        None => next.run(request).await,
    }
}

/// Ask `ServeDir` for the file; `None` on any miss.
async fn lookup(
    root: &Path,
    method: &Method,
    relative: &str,
    headers: &axum::http::HeaderMap,
) -> Option<Response> {
    let uri: Uri = relative.parse().ok()?;
    let mut probe = Request::builder()
        .method(method.clone())
        .uri(uri)
        .body(Body::empty())
        .ok()?;
    // Conditional, range and encoding headers still apply to the file lookup.
    for name in [
        header::IF_NONE_MATCH,
        header::IF_MODIFIED_SINCE,
        header::RANGE,
        header::ACCEPT_ENCODING,
    ] {
        if let Some(value) = headers.get(&name) {
            probe.headers_mut().insert(name, value.clone());
        }
    }

    let service = ServeDir::new(root).append_index_html_on_directories(false);
    let response = match service.oneshot(probe).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, path = %relative, "static lookup failed");
            return None;
        }
    };

    match response.status() {
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => None,
        _ => Some(response.map(Body::new)),
    }
}
