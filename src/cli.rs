//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health), and their associated
//! argument structs. Every `run` flag has an environment variable
//! equivalent so the hosting platform can configure the process
//! without a command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "bitbyte",
    version,
    about = "Server-rendered personal blog",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        bitbyte init                         Create a starter site config\n  \
        bitbyte run                          Serve ./content and ./public on :3000\n  \
        bitbyte run --pretty -p 8080         Local dev mode\n\n  \
        Docs: https://github.com/SangeetAgarwal/bitbyte"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the blog server and the metrics listener
    Run(Box<RunArgs>),

    /// Generate a starter site config file
    Init(InitArgs),

    /// Validate a site config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        bitbyte run                                        Auto-detect site config\n  \
        bitbyte run -c bitbyte.yaml                        Specific site config\n  \
        FLY_REGION=lhr PRIMARY_REGION=iad bitbyte run      Read-replica region")]
pub struct RunArgs {
    /// Site config file path (.yaml, .yml, .json)
    #[arg(short, long, env = "SITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Metrics listen port
    #[arg(long, env = "METRICS_PORT", default_value_t = 3001)]
    pub metrics_port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Runtime mode; "production" caches content at startup
    #[arg(long, env = "NODE_ENV", default_value = "development")]
    pub node_env: String,

    // -- Content --
    /// Directory holding `blog/<slug>.md` posts
    #[arg(
        long,
        env = "CONTENT_DIR",
        default_value = "content",
        help_heading = "Content"
    )]
    pub content_dir: PathBuf,

    /// Static asset root; fingerprinted assets live under `<dir>/build`
    #[arg(
        long,
        env = "PUBLIC_DIR",
        default_value = "public",
        help_heading = "Content"
    )]
    pub public_dir: PathBuf,

    // -- Multi-region --
    /// Region this instance runs in
    #[arg(long, env = "FLY_REGION", help_heading = "Multi-region")]
    pub fly_region: Option<String>,

    /// Region whose database accepts writes
    #[arg(long, env = "PRIMARY_REGION", help_heading = "Multi-region")]
    pub primary_region: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Observability --
    /// Sentry DSN (enables error tracking)
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_DSN", help_heading = "Observability")]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_ENVIRONMENT", help_heading = "Observability")]
    pub sentry_environment: Option<String>,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        bitbyte init                          Minimal config (yaml)\n  \
        bitbyte init --full                   Every field with its default\n  \
        bitbyte init -f json -o site.json     JSON format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include every field with its default value
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Site config file to validate
    #[arg(default_value = "bitbyte.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance's metrics listener
    #[arg(default_value = "http://localhost:3001")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
