//! Content rendering: the last stage of the chain.
//!
//! The server only knows the [`Renderer`] trait. [`SiteRenderer`] is the
//! built-in implementation (blog posts, listings, projects); tests swap in
//! their own to observe what reaches the end of the chain.

pub mod content;
pub mod pages;
pub mod seo;
mod site;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use metrics::counter;

use crate::error::BlogError;
use crate::metrics::RENDERS_TOTAL;
use crate::server::AppState;

pub use site::SiteRenderer;

/// What the renderer gets to see of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
}

impl RenderRequest {
    #[must_use]
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(String::from),
        }
    }

    /// `?_data` (with or without a value) asks for loader data as JSON.
    #[must_use]
    pub fn wants_data(&self) -> bool {
        self.query.as_deref().is_some_and(|q| {
            url::form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == "_data")
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Html(String),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub status: StatusCode,
    pub body: PageBody,
}

impl Page {
    #[must_use]
    pub const fn html(status: StatusCode, html: String) -> Self {
        Self {
            status,
            body: PageBody::Html(html),
        }
    }

    #[must_use]
    pub const fn json(status: StatusCode, value: serde_json::Value) -> Self {
        Self {
            status,
            body: PageBody::Json(value),
        }
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            PageBody::Html(html) => (self.status, Html(html)).into_response(),
            PageBody::Json(value) => (self.status, Json(value)).into_response(),
        };
        if self.status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<Page, BlogError>;

    /// Number of posts held in memory, when the renderer caches them.
    fn cached_posts(&self) -> Option<usize> {
        None
    }
}

/// Router fallback: every request that got past the chain and the static
/// files ends up here.
pub async fn render_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    state.stats.renders.fetch_add(1, Ordering::Relaxed);
    counter!(RENDERS_TOTAL).increment(1);

    let request = RenderRequest::new(method, &uri);
    match state.renderer.render(&request).await {
        Ok(page) => page.into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %request.path, "render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::internal_error())).into_response()
        }
    }
}
