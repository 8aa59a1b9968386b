//! Site configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`SiteConfig`] for values
//! that would break the request policies or the rendered pages: a
//! canonical origin that is not a bare http(s) origin, a legacy host
//! carrying a scheme or path, a title template without `%s`, and
//! projects with empty titles or unusable links.

use url::Url;

use super::model::SiteConfig;
use crate::error::ValidationError;

/// Validate a canonical origin such as `https://www.example.com`.
pub fn validate_origin(origin: &str) -> Result<(), String> {
    let parsed = Url::parse(origin).map_err(|_| format!("'{origin}' is not a valid URL"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.host_str().is_none() {
        return Err("origin must include a host".into());
    }
    // Url normalizes an empty path to "/", so a trailing slash shows up here too
    if parsed.path() != "/" || origin.ends_with('/') {
        return Err("origin must not include a path or trailing slash".into());
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("origin must not include a query or fragment".into());
    }
    Ok(())
}

/// Validate a bare hostname such as `app.fly.dev`.
pub fn validate_hostname(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("hostname cannot be empty".into());
    }
    if host.contains("://") || host.contains('/') {
        return Err(format!("'{host}' must be a bare hostname"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(format!("'{host}' contains whitespace"));
    }
    // Request hosts are matched with the port stripped
    if host.contains(':') {
        return Err(format!("'{host}' must not include a port"));
    }
    Ok(())
}

/// Validate a link that is either absolute http(s) or site-relative.
pub fn validate_link(link: &str) -> Result<(), String> {
    if link.starts_with('/') && !link.starts_with("//") {
        return Ok(());
    }
    match Url::parse(link) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(format!(
            "unsupported scheme '{}' (expected http or https)",
            parsed.scheme()
        )),
        Err(_) => Err(format!("'{link}' is not a valid URL or site path")),
    }
}

pub fn validate(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_origin(&config.hosts.canonical_origin) {
        errors.push(ValidationError {
            field: "hosts.canonical_origin".into(),
            suggestion: config
                .hosts
                .canonical_origin
                .strip_suffix('/')
                .map(|trimmed| format!("did you mean '{trimmed}'?")),
            message: msg,
        });
    }

    if let Err(msg) = validate_hostname(&config.hosts.legacy_host) {
        errors.push(ValidationError {
            field: "hosts.legacy_host".into(),
            message: msg,
            suggestion: legacy_host_suggestion(&config.hosts.legacy_host),
        });
    }

    let canonical = Url::parse(&config.hosts.canonical_origin).ok();
    if canonical
        .as_ref()
        .and_then(Url::host_str)
        .is_some_and(|h| h.eq_ignore_ascii_case(&config.hosts.legacy_host))
    {
        errors.push(ValidationError {
            field: "hosts".into(),
            message: "canonical origin points at the legacy host (redirect loop)".into(),
            suggestion: None,
        });
    }

    if let Err(msg) = validate_link(&config.site.site_url) {
        errors.push(ValidationError {
            field: "site.site_url".into(),
            message: msg,
            suggestion: None,
        });
    }

    if config.site.title.trim().is_empty() {
        errors.push(ValidationError {
            field: "site.title".into(),
            message: "title cannot be empty".into(),
            suggestion: None,
        });
    }

    if !config.seo.title_template.contains("%s") {
        errors.push(ValidationError {
            field: "seo.title_template".into(),
            message: "template must contain '%s' where the page title goes".into(),
            suggestion: Some(format!("did you mean '%s | {}'?", config.seo.title)),
        });
    }

    for (i, project) in config.projects.iter().enumerate() {
        if project.title.trim().is_empty() {
            errors.push(ValidationError {
                field: format!("projects[{i}].title"),
                message: "title cannot be empty".into(),
                suggestion: None,
            });
        }
        for (name, value) in [("href", &project.href), ("img_src", &project.img_src)] {
            if let Some(link) = value {
                if let Err(msg) = validate_link(link) {
                    errors.push(ValidationError {
                        field: format!("projects[{i}].{name}"),
                        message: msg,
                        suggestion: None,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn legacy_host_suggestion(host: &str) -> Option<String> {
    let bare = match Url::parse(host) {
        Ok(url) => url.host_str().map(String::from),
        Err(_) => None,
    }
    .or_else(|| host.split_once(':').map(|(name, _)| name.to_string()))
    .filter(|name| !name.is_empty())?;
    Some(format!("did you mean '{bare}'?"))
}

#[must_use]
pub fn format_validation_report(path: &str, config: &SiteConfig) -> String {
    let lines = [
        format!("  site:      {} ({})", config.site.title, config.site.site_url),
        format!(
            "  redirect:  {} -> {}",
            config.hosts.legacy_host, config.hosts.canonical_origin
        ),
        format!("  seo title: {}", config.seo.title_template),
        format!("  projects:  {}", config.projects.len()),
    ];
    format!("{} is valid\n{}", path, lines.join("\n"))
}
