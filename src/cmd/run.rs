//! `bitbyte run`: start the blog server.
//!
//! Resolves the site config and runtime environment, opens the content
//! store, installs the metrics recorder, then serves the public listener
//! and the metrics listener until Ctrl+C or SIGTERM.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::watch;

use crate::cli::RunArgs;
use crate::config::{self, RuntimeEnv};
use crate::error::BlogError;
use crate::logging;
use crate::middleware::assets::AssetRoots;
use crate::middleware::chain::{Chain, ChainConfig};
use crate::middleware::policy;
use crate::render::content::ContentStore;
use crate::render::SiteRenderer;
use crate::server::{self, AppState, Stats};

pub async fn execute(args: RunArgs) -> Result<(), BlogError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let metrics_handle = crate::metrics::install()?;
    let state = Arc::new(build_state(&args, metrics_handle.clone()).await?);

    let addr: SocketAddr = format!("{}:{}", args.host, state.env.port).parse()?;
    let metrics_addr: SocketAddr = format!("{}:{}", args.host, state.env.metrics_port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let metrics_listener = tokio::net::TcpListener::bind(metrics_addr).await?;

    tracing::info!(
        addr = %addr,
        metrics_addr = %metrics_addr,
        mode = state.env.mode.as_str(),
        region = state.chain_config.region_label(),
        primary_region = state.chain_config.primary_region.as_deref().unwrap_or("-"),
        "bitbyte started"
    );

    // Shutdown signal: one sender, a receiver per listener plus the upkeep loop
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let upkeep_handle = tokio::spawn(crate::metrics::upkeep_loop(
        metrics_handle,
        shutdown_rx.clone(),
    ));

    let public = axum::serve(listener, server::build_router(Arc::clone(&state)))
        .with_graceful_shutdown(stopped(shutdown_rx.clone()))
        .into_future();
    let metrics = axum::serve(metrics_listener, server::build_metrics_router(state))
        .with_graceful_shutdown(stopped(shutdown_rx))
        .into_future();
    let signal = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    let (public_result, metrics_result, ()) = tokio::join!(public, metrics, signal);
    public_result?;
    metrics_result?;

    if let Err(e) = upkeep_handle.await {
        tracing::error!(error = %e, "metrics upkeep task failed");
    }

    tracing::info!("bitbyte stopped");
    Ok(())
}

/// Everything the routers share, built from the parsed `run` flags.
pub async fn build_state(
    args: &RunArgs,
    metrics: PrometheusHandle,
) -> Result<AppState, BlogError> {
    let (site, source) = config::resolve_site_config(args.config.as_deref()).await?;
    let env = RuntimeEnv::from_args(args);
    let content = ContentStore::open(args.content_dir.clone(), env.mode).await?;
    let chain_config = ChainConfig::new(&env, &site.hosts);

    if !tokio::fs::try_exists(&args.public_dir).await.unwrap_or(false) {
        tracing::warn!(
            path = %args.public_dir.display(),
            "public directory not found, static files will not be served"
        );
    }
    if let Some(primary) = policy::replica_of(&chain_config) {
        tracing::info!(
            primary_region = %primary,
            region = chain_config.region_label(),
            "running as a read replica, writes will be replayed"
        );
    }

    let chain = Chain::standard();
    tracing::info!(
        config = %source,
        legacy_host = %site.hosts.legacy_host,
        canonical_origin = %site.hosts.canonical_origin,
        stages = ?chain.stage_names(),
        "site config loaded"
    );

    Ok(AppState {
        env,
        chain,
        chain_config,
        assets: AssetRoots::new(args.public_dir.clone()),
        renderer: Arc::new(SiteRenderer::new(Arc::new(site), content)),
        metrics,
        start_time: Instant::now(),
        stats: Stats::new(),
    })
}

async fn stopped(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.changed().await;
}
