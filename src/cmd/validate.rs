//! `bitbyte validate`: check a site config file before deploying it.
//!
//! Problems are grouped by the part of the site they break (host
//! redirect, site metadata, SEO tags, project cards) so the report reads
//! like the config file itself.

use std::path::Path;

use serde_json::{json, Value};

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::SiteConfig;
use crate::config::{parse_config_str, validation};
use crate::error::{BlogError, ValidationError};

const SECTIONS: [(&str, &str); 5] = [
    ("hosts", "host redirect"),
    ("site", "site metadata"),
    ("seo", "seo tags"),
    ("projects", "project cards"),
    ("", "other"),
];

pub fn execute(args: &ValidateArgs) -> Result<(), BlogError> {
    let config = read(&args.config)?;
    let errors = validation::validate(&config).err().unwrap_or_default();
    let file = args.config.display().to_string();

    match args.format {
        ValidateFormat::Text if errors.is_empty() => {
            println!("\u{2713} {}", validation::format_validation_report(&file, &config));
        }
        ValidateFormat::Text => eprint!("{}", problems_text(&file, &errors)),
        ValidateFormat::Json => println!("{:#}", report_json(&file, &config, &errors)),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BlogError::ConfigValidation { errors })
    }
}

fn read(path: &Path) -> Result<SiteConfig, BlogError> {
    if !path.exists() {
        return Err(BlogError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

/// Top-level config key an error field belongs to: `projects[1].href` is
/// a `projects` error, a bare `hosts` is a `hosts` error.
fn section_of(field: &str) -> &'static str {
    let key = field.split(['.', '[']).next().unwrap_or(field);
    SECTIONS
        .iter()
        .map(|(name, _)| *name)
        .find(|name| !name.is_empty() && *name == key)
        .unwrap_or("")
}

fn problems_text(file: &str, errors: &[ValidationError]) -> String {
    let mut out = format!(
        "\u{2717} {file}: {} problem{}\n",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
    for (section, heading) in SECTIONS {
        let in_section: Vec<_> = errors
            .iter()
            .filter(|e| section_of(&e.field) == section)
            .collect();
        if in_section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n  [{heading}]\n"));
        for error in in_section {
            out.push_str(&format!("  {error}\n"));
        }
    }
    out
}

fn report_json(file: &str, config: &SiteConfig, errors: &[ValidationError]) -> Value {
    let problems: Vec<Value> = errors
        .iter()
        .map(|e| {
            json!({
                "section": section_of(&e.field),
                "field": e.field,
                "message": e.message,
                "suggestion": e.suggestion,
            })
        })
        .collect();
    json!({
        "file": file,
        "valid": errors.is_empty(),
        "errors": problems,
        "redirect": {
            "from": config.hosts.legacy_host,
            "to": config.hosts.canonical_origin,
        },
        "title_template": config.seo.title_template,
        "projects": config.projects.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
    })
}
