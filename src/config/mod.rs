//! Process configuration: runtime environment and site configuration.
//!
//! [`RuntimeEnv`] holds the values the hosting platform injects
//! (`FLY_REGION`, `PRIMARY_REGION`, `PORT`, `METRICS_PORT`, `NODE_ENV`),
//! resolved once at startup and never re-read. The site configuration
//! ([`model::SiteConfig`]) comes from an optional YAML or JSON file and
//! is validated before the server starts.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::cli::RunArgs;
use crate::error::BlogError;
use model::SiteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Anything other than the literal `production` is development.
    #[must_use]
    pub fn from_node_env(value: &str) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

/// Platform-provided values, constant for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub fly_region: Option<String>,
    pub primary_region: Option<String>,
    pub port: u16,
    pub metrics_port: u16,
    pub mode: Mode,
}

impl RuntimeEnv {
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        Self {
            fly_region: non_empty(args.fly_region.as_deref()),
            primary_region: non_empty(args.primary_region.as_deref()),
            port: args.port,
            metrics_port: args.metrics_port,
            mode: Mode::from_node_env(&args.node_env),
        }
    }
}

impl Default for RuntimeEnv {
    fn default() -> Self {
        Self {
            fly_region: None,
            primary_region: None,
            port: 3000,
            metrics_port: 3001,
            mode: Mode::Development,
        }
    }
}

// An empty variable counts as unset, matching how the platform treats it.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Parse a site config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<SiteConfig, BlogError> {
    match ext {
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| BlogError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| BlogError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(BlogError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse and validate a site config file.
pub async fn load_file(path: &Path) -> Result<SiteConfig, BlogError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BlogError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BlogError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(BlogError::ConfigValidation { errors });
    }
    Ok(config)
}

/// Load the explicit config file, else an auto-detected one in the
/// working directory, else the built-in defaults.
pub async fn resolve_site_config(
    explicit: Option<&Path>,
) -> Result<(SiteConfig, String), BlogError> {
    if let Some(path) = explicit {
        let config = load_file(path).await?;
        return Ok((config, path.display().to_string()));
    }

    let candidates = ["bitbyte.yaml", "bitbyte.yml", "bitbyte.json"];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected site config");
            let config = load_file(&path).await?;
            return Ok((config, path.display().to_string()));
        }
    }

    tracing::debug!("no site config file found, using built-in defaults");
    Ok((SiteConfig::default(), "built-in".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_production_is_production() {
        assert_eq!(Mode::from_node_env("production"), Mode::Production);
        assert_eq!(Mode::from_node_env("Production"), Mode::Development);
        assert_eq!(Mode::from_node_env("test"), Mode::Development);
        assert_eq!(Mode::from_node_env(""), Mode::Development);
    }

    #[test]
    fn empty_region_counts_as_unset() {
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some("iad")), Some("iad".into()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let result = parse_config_str("toml", "", "site.toml");
        assert!(matches!(result, Err(BlogError::UnsupportedFormat(ext)) if ext == "toml"));
    }
}
