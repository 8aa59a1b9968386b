//! Optional Sentry error tracking.
//!
//! The returned guard must be held for the lifetime of the process so
//! render failures and panics are flushed before exit.

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    let parsed_dsn = match dsn.parse() {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled");
            None
        }
    };

    sentry::init(sentry::ClientOptions {
        dsn: parsed_dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: Some(release().into()),
        ..Default::default()
    })
}

fn release() -> String {
    format!(
        "bitbyte@{}+{}",
        env!("CARGO_PKG_VERSION"),
        env!("BITBYTE_GIT_SHORT")
    )
}
