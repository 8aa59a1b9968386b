//! Integration tests for the request middleware chain, driven through the
//! full router with a recording renderer at the end.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use bitbyte::config::model::HostPolicy;
use bitbyte::config::RuntimeEnv;
use bitbyte::error::BlogError;
use bitbyte::middleware::assets::AssetRoots;
use bitbyte::middleware::chain::{Chain, ChainConfig};
use bitbyte::render::{Page, RenderRequest, Renderer};
use bitbyte::server::{self, AppState, Stats};

#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<RenderRequest>>,
}

impl RecordingRenderer {
    fn calls(&self) -> Vec<RenderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Page, BlogError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(Page::html(
            StatusCode::OK,
            "<p>rendered by the recording renderer</p>\n".repeat(8),
        ))
    }
}

struct FailingRenderer;

#[async_trait]
impl Renderer for FailingRenderer {
    async fn render(&self, _request: &RenderRequest) -> Result<Page, BlogError> {
        Err(BlogError::FrontMatter {
            path: "content/blog/broken.md".into(),
            reason: "expected a '---' fenced front matter block".into(),
        })
    }
}

fn env(fly: Option<&str>, primary: Option<&str>) -> RuntimeEnv {
    RuntimeEnv {
        fly_region: fly.map(String::from),
        primary_region: primary.map(String::from),
        ..RuntimeEnv::default()
    }
}

fn app_state(env: RuntimeEnv, renderer: Arc<dyn Renderer>) -> Arc<AppState> {
    Arc::new(AppState {
        chain: Chain::standard(),
        chain_config: ChainConfig::new(&env, &HostPolicy::default()),
        env,
        assets: AssetRoots::new("demo/public"),
        renderer,
        metrics: PrometheusBuilder::new().build_recorder().handle(),
        start_time: Instant::now(),
        stats: Stats::new(),
    })
}

struct Harness {
    state: Arc<AppState>,
    renderer: Arc<RecordingRenderer>,
}

impl Harness {
    fn new(fly: Option<&str>, primary: Option<&str>) -> Self {
        let renderer = Arc::new(RecordingRenderer::default());
        let state = app_state(env(fly, primary), renderer.clone());
        Self { state, renderer }
    }

    async fn send(&self, method: Method, host: &str, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap();
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> Response {
        server::build_router(Arc::clone(&self.state))
            .oneshot(request)
            .await
            .unwrap()
    }
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn assert_security_headers(response: &Response, region: &str) {
    assert_eq!(response.headers()["x-fly-region"], region);
    assert_eq!(
        response.headers()[header::STRICT_TRANSPORT_SECURITY],
        "max-age=3153600000"
    );
}

// --- canonical host ---

#[tokio::test]
async fn local_hosts_are_never_redirected() {
    let h = Harness::new(None, None);
    for host in ["localhost", "localhost:3000", "127.0.0.1"] {
        let response = h.send(Method::GET, host, "/blogs").await;
        assert_eq!(response.status(), StatusCode::OK, "host {host}");
    }
    assert_eq!(h.renderer.calls().len(), 3);
}

#[tokio::test]
async fn legacy_host_redirects_to_canonical_origin() {
    let h = Harness::new(None, None);
    let response = h
        .send(Method::GET, "bitoflearning-9a57.fly.dev", "/foo?x=1")
        .await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "https://www.makebitbyte.com/foo?x=1");
    assert_security_headers(&response, "unknown");
    assert!(h.renderer.calls().is_empty());
}

#[tokio::test]
async fn legacy_host_redirect_keeps_path_byte_for_byte() {
    let h = Harness::new(None, None);
    let response = h
        .send(Method::GET, "bitoflearning-9a57.fly.dev:443", "/blogs//post/")
        .await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "https://www.makebitbyte.com/blogs//post/");
}

#[tokio::test]
async fn other_hosts_pass_through() {
    let h = Harness::new(None, None);
    let response = h.send(Method::GET, "www.makebitbyte.com", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.renderer.calls().len(), 1);
}

// --- trailing slash ---

#[tokio::test]
async fn trailing_slash_is_stripped_with_query() {
    let h = Harness::new(None, None);
    let response = h
        .send(Method::GET, "localhost", "/blogs/my-post/?utm=feed")
        .await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/blogs/my-post?utm=feed");
    assert_security_headers(&response, "unknown");
}

#[tokio::test]
async fn repeated_slashes_collapse() {
    let h = Harness::new(None, None);
    let response = h.send(Method::GET, "localhost", "/a//b/").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/a/b");
}

#[tokio::test]
async fn redirect_target_is_not_redirected_again() {
    let h = Harness::new(None, None);
    let first = h.send(Method::GET, "localhost", "/a///b//?q=1").await;
    let target = location(&first).to_string();

    let second = h.send(Method::GET, "localhost", &target).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(h.renderer.calls().len(), 1);
    assert_eq!(h.renderer.calls()[0].path, "/a/b");
}

#[tokio::test]
async fn root_is_never_slash_redirected() {
    let h = Harness::new(None, None);
    let response = h.send(Method::GET, "localhost", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// --- write replay ---

#[tokio::test]
async fn write_on_replica_is_replayed_without_rendering() {
    let h = Harness::new(Some("lhr"), Some("iad"));
    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let response = h.send(method.clone(), "localhost", "/blogs").await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "{method}");
        assert_eq!(response.headers()["fly-replay"], "region=iad");
        assert_security_headers(&response, "lhr");
    }
    assert!(h.renderer.calls().is_empty());
    assert_eq!(
        h.state.stats.replays.load(std::sync::atomic::Ordering::Relaxed),
        4
    );
}

#[tokio::test]
async fn reads_on_replica_pass_through() {
    let h = Harness::new(Some("lhr"), Some("iad"));
    for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
        let response = h.send(method.clone(), "localhost", "/blogs").await;
        assert_eq!(response.status(), StatusCode::OK, "{method}");
        assert!(response.headers().get("fly-replay").is_none());
    }
    assert_eq!(h.renderer.calls().len(), 3);
}

#[tokio::test]
async fn writes_pass_through_outside_replicas() {
    for (fly, primary) in [
        (None, Some("iad")),
        (Some("iad"), Some("iad")),
        (Some("lhr"), None),
    ] {
        let h = Harness::new(fly, primary);
        let response = h.send(Method::POST, "localhost", "/blogs").await;
        assert_eq!(response.status(), StatusCode::OK, "{fly:?}/{primary:?}");
        assert_eq!(h.renderer.calls().len(), 1);
        assert_eq!(h.renderer.calls()[0].method, Method::POST);
    }
}

#[tokio::test]
async fn trailing_slash_wins_over_replay() {
    let h = Harness::new(Some("lhr"), Some("iad"));
    let response = h.send(Method::POST, "localhost", "/blogs/").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert!(response.headers().get("fly-replay").is_none());
}

// --- static assets ---

#[tokio::test]
async fn build_assets_are_immutable() {
    let h = Harness::new(None, None);
    let response = h
        .send(Method::GET, "localhost", "/build/app-5VKM3QZC.js")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_security_headers(&response, "unknown");
    assert!(h.renderer.calls().is_empty());
}

#[tokio::test]
async fn public_files_cache_for_an_hour() {
    let h = Harness::new(None, None);
    let response = h.send(Method::GET, "localhost", "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.starts_with(b"User-agent"));
    assert!(h.renderer.calls().is_empty());
}

#[tokio::test]
async fn static_miss_falls_through_to_renderer() {
    let h = Harness::new(None, None);
    for path in ["/build/app-MISSING.js", "/favicon.ico", "/static/missing.png"] {
        let response = h.send(Method::GET, "localhost", path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }
    assert_eq!(h.renderer.calls().len(), 3);
}

#[tokio::test]
async fn static_files_only_answer_reads() {
    let h = Harness::new(None, None);
    let response = h.send(Method::POST, "localhost", "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.renderer.calls().len(), 1);
}

// --- compression, logging, errors ---

#[tokio::test]
async fn rendered_pages_are_compressed_when_asked() {
    let h = Harness::new(None, None);
    let request = Request::builder()
        .uri("/blogs")
        .header(header::HOST, "localhost")
        .header(header::ACCEPT_ENCODING, "gzip")
        .body(Body::empty())
        .unwrap();
    let response = h.send_request(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
    assert_security_headers(&response, "unknown");
}

#[tokio::test]
async fn uncompressed_without_accept_encoding() {
    let h = Harness::new(None, None);
    let response = h.send(Method::GET, "localhost", "/blogs").await;
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let h = Harness::new(None, None);
    let request = Request::builder()
        .uri("/")
        .header(header::HOST, "localhost")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = h.send_request(request).await;
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = h.send(Method::GET, "localhost", "/").await;
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn renderer_failure_is_a_500_with_security_headers() {
    let state = app_state(env(Some("iad"), Some("iad")), Arc::new(FailingRenderer));
    let request = Request::builder()
        .uri("/blogs/broken")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let response = server::build_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_security_headers(&response, "iad");
}

#[tokio::test]
async fn forwarded_host_is_used_behind_the_edge() {
    let h = Harness::new(None, None);
    let request = Request::builder()
        .uri("/about")
        .header(header::HOST, "localhost:8080")
        .header("x-forwarded-host", "bitoflearning-9a57.fly.dev")
        .body(Body::empty())
        .unwrap();
    let response = h.send_request(request).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "https://www.makebitbyte.com/about");
    assert_eq!(
        h.state.stats.redirects.load(std::sync::atomic::Ordering::Relaxed),
        1
    );
}
