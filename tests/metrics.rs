//! Prometheus exposition on the metrics listener.
//!
//! Installs the global recorder, so this file holds a single test.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use bitbyte::config::model::{HostPolicy, SiteConfig};
use bitbyte::config::{Mode, RuntimeEnv};
use bitbyte::middleware::assets::AssetRoots;
use bitbyte::middleware::chain::{Chain, ChainConfig};
use bitbyte::render::content::ContentStore;
use bitbyte::render::SiteRenderer;
use bitbyte::server::{self, AppState, Stats};

fn request(method: Method, host: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn scrape_reports_requests_redirects_and_replays() {
    let handle = bitbyte::metrics::install().unwrap();

    let env = RuntimeEnv {
        fly_region: Some("syd".into()),
        primary_region: Some("iad".into()),
        mode: Mode::Production,
        ..RuntimeEnv::default()
    };
    let content = ContentStore::open("demo/content", Mode::Production)
        .await
        .unwrap();
    let state = Arc::new(AppState {
        chain: Chain::standard(),
        chain_config: ChainConfig::new(&env, &HostPolicy::default()),
        env,
        assets: AssetRoots::new("demo/public"),
        renderer: Arc::new(SiteRenderer::new(Arc::new(SiteConfig::default()), content)),
        metrics: handle,
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    let public = server::build_router(Arc::clone(&state));
    let responses = [
        (request(Method::GET, "localhost", "/"), StatusCode::OK),
        (
            request(Method::GET, "bitoflearning-9a57.fly.dev", "/blogs"),
            StatusCode::MOVED_PERMANENTLY,
        ),
        (request(Method::GET, "localhost", "/blogs/"), StatusCode::MOVED_PERMANENTLY),
        (request(Method::DELETE, "localhost", "/blogs"), StatusCode::CONFLICT),
    ];
    for (req, expected) in responses {
        let response = public.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), expected);
    }

    let response = server::build_metrics_router(state)
        .oneshot(request(Method::GET, "localhost", "/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains(r#"http_requests_total{method="GET",status_code="200"} 1"#));
    assert!(text.contains(r#"http_requests_total{method="GET",status_code="301"} 2"#));
    assert!(text.contains(r#"http_requests_total{method="DELETE",status_code="409"} 1"#));
    assert!(text.contains(r#"bitbyte_redirects_total{kind="canonical_host"} 1"#));
    assert!(text.contains(r#"bitbyte_redirects_total{kind="trailing_slash"} 1"#));
    assert!(text.contains("bitbyte_replays_total 1"));
    assert!(text.contains("http_request_duration_seconds_bucket"));
    assert!(text.contains("process_uptime_seconds"));
    assert!(text.contains("bitbyte_build_info{"));
    assert!(text.contains("process_start_time_seconds"));
    assert!(text.contains("process_resident_memory_bytes"));
}
