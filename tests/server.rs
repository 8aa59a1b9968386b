//! Integration tests for the two listeners, the built-in renderer over the
//! demo site, the health endpoint, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;

use bitbyte::cli::{Cli, Commands, RunArgs};
use bitbyte::cmd::run::build_state;
use bitbyte::health::HealthResponse;
use bitbyte::server::{self, AppState};

fn demo_args(node_env: &str) -> RunArgs {
    let cli = Cli::try_parse_from([
        "bitbyte",
        "run",
        "--config",
        "demo/bitbyte.yaml",
        "--content-dir",
        "demo/content",
        "--public-dir",
        "demo/public",
        "--node-env",
        node_env,
        "--fly-region",
        "lhr",
        "--primary-region",
        "iad",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Run(args)) => *args,
        _ => panic!("expected run"),
    }
}

async fn demo_state(node_env: &str) -> Arc<AppState> {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    Arc::new(build_state(&demo_args(node_env), handle).await.unwrap())
}

async fn serve(router: Router) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_reports_runtime_and_stats() {
    let state = demo_state("production").await;
    let (public, stop_public) = serve(server::build_router(Arc::clone(&state))).await;
    let (metrics, stop_metrics) = serve(server::build_metrics_router(state)).await;

    let client = client();
    let resp = client
        .get(format!("http://{public}/blogs/"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 301);
    let resp = client
        .post(format!("http://{public}/blogs"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let resp = client
        .get(format!("http://{public}/blogs"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let health: HealthResponse = client
        .get(format!("http://{metrics}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.region, "lhr");
    assert_eq!(health.primary_region.as_deref(), Some("iad"));
    assert_eq!(health.mode, "production");
    assert_eq!(health.posts, Some(3));
    assert_eq!(health.stats.redirects, 1);
    assert_eq!(health.stats.replays, 1);
    assert_eq!(health.stats.renders, 1);

    let _ = stop_public.send(());
    let _ = stop_metrics.send(());
}

#[tokio::test]
async fn development_mode_reads_posts_per_request() {
    let state = demo_state("development").await;
    let (metrics, stop) = serve(server::build_metrics_router(state)).await;

    let health: HealthResponse = reqwest::get(format!("http://{metrics}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.mode, "development");
    assert_eq!(health.posts, None);

    let _ = stop.send(());
}

#[tokio::test]
async fn demo_site_renders() {
    let state = demo_state("production").await;
    let (addr, stop) = serve(server::build_router(state)).await;
    let client = client();

    let home = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(home.status(), 200);
    assert_eq!(home.headers()["x-fly-region"], "lhr");
    let html = home.text().await.unwrap();
    assert!(html.contains("<title>MakeBitByte</title>"));
    assert!(html.contains("data-theme=\"dark\""));
    assert!(html.contains("/blogs/fly-regions"));
    assert!(html.contains("/blogs/hello-world"));
    assert!(!html.contains("/blogs/next-big-thing"));

    let post = client
        .get(format!("http://{addr}/blogs/hello-world"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(post.contains("<title>Hello, World | MakeBitByte</title>"));
    assert!(post.contains("<meta name=\"description\" content=\"Why this blog exists.\">"));
    assert!(post.contains("println!(&quot;hello &lt;world&gt;&quot;);"));

    let draft = client
        .get(format!("http://{addr}/blogs/next-big-thing"))
        .send()
        .await
        .unwrap();
    assert_eq!(draft.status(), 200);
    let draft = draft.text().await.unwrap();
    assert!(draft.contains("Under Construction"));
    assert!(!draft.contains("Nothing to see yet."));

    let projects = client
        .get(format!("http://{addr}/projects"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(projects.contains("<a href=\"/blogs\" rel=\"noopener\">bitbyte</a>"));

    let missing = client
        .get(format!("http://{addr}/blogs/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    let _ = stop.send(());
}

#[tokio::test]
async fn data_requests_return_loader_json() {
    let state = demo_state("development").await;
    let (addr, stop) = serve(server::build_router(state)).await;

    let listing: serde_json::Value = reqwest::get(format!("http://{addr}/blogs?_data"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let slugs: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["fly-regions", "hello-world"]);

    let post: serde_json::Value =
        reqwest::get(format!("http://{addr}/blogs/fly-regions?_data=routes"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(post["front_matter"]["title"], "Running in many regions");
    assert_eq!(post["front_matter"]["tags"][1], "ops");

    let _ = stop.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let state = demo_state("development").await;
    let (addr, shutdown) = serve(server::build_metrics_router(state)).await;

    // Verify server is running
    let url = format!("http://{addr}/health");
    assert!(reqwest::get(&url).await.is_ok());

    let _ = shutdown.send(());

    // Give it a moment to shut down
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(reqwest::get(&url).await.is_err());
}

#[tokio::test]
async fn missing_content_dir_fails_startup() {
    let mut args = demo_args("production");
    args.content_dir = "demo/no-such-dir".into();
    let handle = PrometheusBuilder::new().build_recorder().handle();

    let result = build_state(&args, handle).await;
    assert!(matches!(
        result,
        Err(bitbyte::error::BlogError::ContentDirMissing { .. })
    ));
}
