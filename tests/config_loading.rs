//! Integration tests for site config loading in both file formats.

use std::path::Path;

use bitbyte::config::model::Theme;
use bitbyte::config::parse_config_str;
use bitbyte::config::validation::validate;
use bitbyte::config::{load_file, resolve_site_config};
use bitbyte::error::BlogError;

fn load_demo(name: &str) -> String {
    let path = format!("demo/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn yaml_demo_loads_and_validates() {
    let content = load_demo("bitbyte.yaml");
    let config = parse_config_str("yaml", &content, "bitbyte.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.site.theme, Theme::Dark);
    assert_eq!(config.seo.title_template, "%s | MakeBitByte");
    assert_eq!(config.projects.len(), 2);
}

#[test]
fn json_demo_loads_and_validates() {
    let content = load_demo("bitbyte.json");
    let config = parse_config_str("json", &content, "bitbyte.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.hosts.legacy_host, "bitoflearning-9a57.fly.dev");
}

#[test]
fn both_formats_produce_equivalent_configs() {
    let yaml = parse_config_str("yaml", &load_demo("bitbyte.yaml"), "yaml").unwrap();
    let json = parse_config_str("json", &load_demo("bitbyte.json"), "json").unwrap();

    assert_eq!(yaml.hosts, json.hosts);
    assert_eq!(yaml.projects, json.projects);
    assert_eq!(yaml.site.title, json.site.title);
    assert_eq!(yaml.site.theme, json.site.theme);
    assert_eq!(yaml.seo.title_template, json.seo.title_template);
    // Fields neither file sets keep their defaults
    assert_eq!(yaml.site.locale, "en-US");
    assert_eq!(json.seo.twitter.card, "summary_large_image");
}

#[test]
fn unknown_keys_fail_to_parse() {
    let result = parse_config_str("yaml", "site:\n  titel: typo\n", "bad.yaml");
    assert!(matches!(result, Err(BlogError::ConfigParse { .. })));
}

#[tokio::test]
async fn load_file_rejects_invalid_values() {
    let dir = std::env::temp_dir().join(format!("bitbyte-config-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("loop.yaml");
    tokio::fs::write(
        &path,
        "hosts:\n  legacy_host: www.example.com\n  canonical_origin: https://www.example.com/\n",
    )
    .await
    .unwrap();

    let err = load_file(&path).await.unwrap_err();
    let BlogError::ConfigValidation { errors } = err else {
        panic!("expected validation error, got {err}");
    };
    assert!(errors.iter().any(|e| e.field == "hosts.canonical_origin"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn missing_explicit_file_is_reported() {
    let err = resolve_site_config(Some(Path::new("demo/nope.yaml")))
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::ConfigFileNotFound { .. }));
}

#[tokio::test]
async fn explicit_file_names_its_source() {
    let (config, source) = resolve_site_config(Some(Path::new("demo/bitbyte.json")))
        .await
        .unwrap();
    assert_eq!(source, "demo/bitbyte.json");
    assert_eq!(config.projects[1].href.as_deref(), Some("/blogs"));
}
