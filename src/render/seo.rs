//! `<title>` and `<meta>` tags for every rendered page.
//!
//! Pages start from the site's [`SeoDefaults`]; a page may override the
//! title (run through the title template) and the description. Open
//! Graph and Twitter tags always come from the defaults.

use crate::config::model::SeoDefaults;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    /// `name` or `property`.
    pub attr: &'static str,
    pub key: &'static str,
    pub content: String,
}

impl MetaTag {
    fn name(key: &'static str, content: &str) -> Self {
        Self {
            attr: "name",
            key,
            content: content.to_string(),
        }
    }

    fn property(key: &'static str, content: &str) -> Self {
        Self {
            attr: "property",
            key,
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageSeo<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoMeta {
    pub title: String,
    pub tags: Vec<MetaTag>,
}

impl SeoMeta {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.content.as_str())
    }
}

#[must_use]
pub fn seo_meta(defaults: &SeoDefaults, page: &PageSeo<'_>) -> SeoMeta {
    let title = page.title.map_or_else(
        || defaults.title.clone(),
        |t| defaults.title_template.replace("%s", t),
    );
    let description = page.description.unwrap_or(&defaults.description);
    let og = &defaults.open_graph;
    let tw = &defaults.twitter;

    SeoMeta {
        title,
        tags: vec![
            MetaTag::name("description", description),
            MetaTag::property("og:url", &og.url),
            MetaTag::property("og:type", &og.kind),
            MetaTag::property("og:site_name", &og.site_name),
            MetaTag::property("og:title", &og.title),
            MetaTag::property("og:description", &og.description),
            MetaTag::name("twitter:card", &tw.card),
            MetaTag::name("twitter:site", &tw.site),
            MetaTag::name("twitter:title", &tw.title),
            MetaTag::name("twitter:description", &tw.description),
        ],
    }
}
