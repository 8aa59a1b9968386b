//! `bitbyte health`: check the health of a running instance.
//!
//! Sends a `GET /health` request to the metrics listener and displays
//! the response as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::BlogError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), BlogError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| BlogError::UriParse {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| BlogError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| BlogError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| BlogError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| BlogError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(BlogError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", summary(&args.url, &health)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn summary(url: &str, health: &HealthResponse) -> String {
    let posts = health
        .posts
        .map_or_else(|| "read per request".to_string(), |n| format!("{n} cached"));
    let primary = health.primary_region.as_deref().unwrap_or("-");
    format!(
        "\u{2713} bitbyte is healthy ({url})\n  \
         version:  {} ({})\n  \
         uptime:   {}\n  \
         mode:     {}\n  \
         region:   {} (primary: {primary})\n  \
         posts:    {posts}\n  \
         requests: {} rendered, {} redirected, {} replayed\n",
        health.version,
        health.git_sha,
        format_uptime(health.uptime_seconds),
        health.mode,
        health.region,
        health.stats.renders,
        health.stats.redirects,
        health.stats.replays,
    )
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::StatsResponse;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }

    #[test]
    fn summary_mentions_regions_and_counts() {
        let health = HealthResponse {
            status: "healthy".into(),
            version: "0.1.0".into(),
            git_sha: "abc1234".into(),
            uptime_seconds: 61,
            region: "lhr".into(),
            primary_region: Some("iad".into()),
            mode: "production".into(),
            posts: Some(3),
            stats: StatsResponse {
                redirects: 2,
                replays: 1,
                renders: 10,
            },
        };
        let text = summary("http://localhost:3001", &health);
        assert!(text.contains("region:   lhr (primary: iad)"));
        assert!(text.contains("posts:    3 cached"));
        assert!(text.contains("10 rendered, 2 redirected, 1 replayed"));
        assert!(text.contains("uptime:   1m 1s"));
    }
}
