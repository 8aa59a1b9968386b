//! Serde data structures for the site configuration file.
//!
//! Contains [`SiteConfig`] (the root), [`SiteMetadata`], [`SeoDefaults`],
//! [`HostPolicy`] and [`Project`]. Every section is optional in the
//! file; missing sections and fields fall back to the values the blog
//! ships with. All types use `deny_unknown_fields` for strict parsing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LEGACY_HOST: &str = "bitoflearning-9a57.fly.dev";
pub const DEFAULT_CANONICAL_ORIGIN: &str = "https://www.makebitbyte.com";

const SEO_SITE_TITLE: &str = "Tailwind Remix-run Starter Blog";
const SEO_DESCRIPTION: &str = "A blog created with Remix-run and Tailwind.css";
const SEO_SITE_URL: &str = "https://tailwind-remix-run-mdxjs-typescript-starter-blog.fly.dev";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteMetadata,

    #[serde(default)]
    pub seo: SeoDefaults,

    #[serde(default)]
    pub hosts: HostPolicy,

    #[serde(default = "default_projects")]
    pub projects: Vec<Project>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMetadata::default(),
            seo: SeoDefaults::default(),
            hosts: HostPolicy::default(),
            projects: default_projects(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SiteMetadata {
    pub title: String,
    pub author: String,
    pub header_title: String,
    pub description: String,
    pub site_url: String,
    pub language: String,
    pub locale: String,
    pub theme: Theme,
    pub social: SocialLinks,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "MakeBitByte".into(),
            author: "Sangeet Agarwal".into(),
            header_title: "MakeBitByte".into(),
            description: "Musings of a restless mind".into(),
            site_url: "https://makebitbyte.com".into(),
            language: "en-us".into(),
            locale: "en-US".into(),
            theme: Theme::System,
            social: SocialLinks::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackoverflow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            github: Some("https://github.com/SangeetAgarwal".into()),
            twitter: Some("https://twitter.com/sangymohan".into()),
            linkedin: Some("https://www.linkedin.com/in/sangeetagarwal/".into()),
            stackoverflow: Some("https://stackoverflow.com/users/2188275/sangeet-agarwal".into()),
            youtube: Some("https://www.youtube.com/channel/UCtNmwaDH4rDTO7Fh-P84HRw".into()),
        }
    }
}

impl SocialLinks {
    /// `(label, url)` pairs for the links that are set, in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub", &self.github),
            ("Twitter", &self.twitter),
            ("LinkedIn", &self.linkedin),
            ("Stack Overflow", &self.stackoverflow),
            ("YouTube", &self.youtube),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.as_deref().map(|u| (label, u)))
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SeoDefaults {
    pub title: String,
    pub title_template: String,
    pub description: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

impl Default for SeoDefaults {
    fn default() -> Self {
        Self {
            title: SEO_SITE_TITLE.into(),
            title_template: format!("%s | {SEO_SITE_TITLE}"),
            description: SEO_DESCRIPTION.into(),
            open_graph: OpenGraph::default(),
            twitter: TwitterCard::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct OpenGraph {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub site_name: String,
    pub title: String,
    pub description: String,
}

impl Default for OpenGraph {
    fn default() -> Self {
        Self {
            url: SEO_SITE_URL.into(),
            kind: "website".into(),
            site_name: SEO_SITE_TITLE.into(),
            title: SEO_SITE_TITLE.into(),
            description: SEO_DESCRIPTION.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TwitterCard {
    pub title: String,
    pub card: String,
    pub site: String,
    pub description: String,
}

impl Default for TwitterCard {
    fn default() -> Self {
        Self {
            title: "Remix-run tailwindcss starter blog".into(),
            card: "summary_large_image".into(),
            site: SEO_SITE_URL.into(),
            description: SEO_DESCRIPTION.into(),
        }
    }
}

/// Which hostname gets steered to which origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct HostPolicy {
    /// Platform-assigned default domain that must not serve traffic.
    pub legacy_host: String,
    /// Scheme and authority the legacy host redirects to, no trailing slash.
    pub canonical_origin: String,
}

impl Default for HostPolicy {
    fn default() -> Self {
        Self {
            legacy_host: DEFAULT_LEGACY_HOST.into(),
            canonical_origin: DEFAULT_CANONICAL_ORIGIN.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

fn default_projects() -> Vec<Project> {
    vec![Project {
        title: "Tailwind Remix-run Starter Blog".into(),
        description: "This blog is constructed from Tailwind Remix-run Starter Blog. \
                      It is a distinct project that I maintain in my spare time. \
                      It uses Remix-run's blues stack."
            .into(),
        img_src: Some("/static/images/twitter-card.png".into()),
        href: Some(
            "https://github.com/SangeetAgarwal/tailwind-remix-run-mdxjs-typescript-starter-blog"
                .into(),
        ),
    }]
}
