//! `bitbyte init`: generate a starter site config file.
//!
//! Creates a YAML or JSON config file with either a minimal template or
//! one listing every field at its default.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::BlogError;

pub fn execute(args: &InitArgs) -> Result<(), BlogError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("bitbyte.{}", args.format.extension())));

    if output.exists() {
        return Err(BlogError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# bitbyte site config
#
# Every section is optional; anything left out keeps its built-in default.

site:
  title: "MakeBitByte"
  author: "Sangeet Agarwal"
  site_url: "https://makebitbyte.com"

hosts:
  legacy_host: "bitoflearning-9a57.fly.dev"
  canonical_origin: "https://www.makebitbyte.com"
"#;

const YAML_FULL: &str = r#"# bitbyte site config
#
# All values shown are defaults.

site:
  title: "MakeBitByte"
  author: "Sangeet Agarwal"
  header_title: "MakeBitByte"
  description: "Musings of a restless mind"
  site_url: "https://makebitbyte.com"
  language: "en-us"
  locale: "en-US"
  theme: system                # system | dark | light
  social:
    github: "https://github.com/SangeetAgarwal"
    twitter: "https://twitter.com/sangymohan"
    linkedin: "https://www.linkedin.com/in/sangeetagarwal/"
    stackoverflow: "https://stackoverflow.com/users/2188275/sangeet-agarwal"
    youtube: "https://www.youtube.com/channel/UCtNmwaDH4rDTO7Fh-P84HRw"

seo:
  title: "Tailwind Remix-run Starter Blog"
  title_template: "%s | Tailwind Remix-run Starter Blog"   # must contain %s
  description: "A blog created with Remix-run and Tailwind.css"
  open_graph:
    url: "https://tailwind-remix-run-mdxjs-typescript-starter-blog.fly.dev"
    type: "website"
    site_name: "Tailwind Remix-run Starter Blog"
    title: "Tailwind Remix-run Starter Blog"
    description: "A blog created with Remix-run and Tailwind.css"
  twitter:
    title: "Remix-run tailwindcss starter blog"
    card: "summary_large_image"
    site: "https://tailwind-remix-run-mdxjs-typescript-starter-blog.fly.dev"
    description: "A blog created with Remix-run and Tailwind.css"

# Requests for legacy_host get a 301 to canonical_origin + path + query.
hosts:
  legacy_host: "bitoflearning-9a57.fly.dev"
  canonical_origin: "https://www.makebitbyte.com"

projects:
  - title: "Tailwind Remix-run Starter Blog"
    description: "This blog is constructed from Tailwind Remix-run Starter Blog."
    img_src: "/static/images/twitter-card.png"
    href: "https://github.com/SangeetAgarwal/tailwind-remix-run-mdxjs-typescript-starter-blog"
"#;

const JSON_MINIMAL: &str = r#"{
  "site": {
    "title": "MakeBitByte",
    "author": "Sangeet Agarwal",
    "site_url": "https://makebitbyte.com"
  },
  "hosts": {
    "legacy_host": "bitoflearning-9a57.fly.dev",
    "canonical_origin": "https://www.makebitbyte.com"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "site": {
    "title": "MakeBitByte",
    "author": "Sangeet Agarwal",
    "header_title": "MakeBitByte",
    "description": "Musings of a restless mind",
    "site_url": "https://makebitbyte.com",
    "language": "en-us",
    "locale": "en-US",
    "theme": "system",
    "social": {
      "github": "https://github.com/SangeetAgarwal",
      "twitter": "https://twitter.com/sangymohan",
      "linkedin": "https://www.linkedin.com/in/sangeetagarwal/",
      "stackoverflow": "https://stackoverflow.com/users/2188275/sangeet-agarwal",
      "youtube": "https://www.youtube.com/channel/UCtNmwaDH4rDTO7Fh-P84HRw"
    }
  },
  "seo": {
    "title": "Tailwind Remix-run Starter Blog",
    "title_template": "%s | Tailwind Remix-run Starter Blog",
    "description": "A blog created with Remix-run and Tailwind.css",
    "open_graph": {
      "url": "https://tailwind-remix-run-mdxjs-typescript-starter-blog.fly.dev",
      "type": "website",
      "site_name": "Tailwind Remix-run Starter Blog",
      "title": "Tailwind Remix-run Starter Blog",
      "description": "A blog created with Remix-run and Tailwind.css"
    },
    "twitter": {
      "title": "Remix-run tailwindcss starter blog",
      "card": "summary_large_image",
      "site": "https://tailwind-remix-run-mdxjs-typescript-starter-blog.fly.dev",
      "description": "A blog created with Remix-run and Tailwind.css"
    }
  },
  "hosts": {
    "legacy_host": "bitoflearning-9a57.fly.dev",
    "canonical_origin": "https://www.makebitbyte.com"
  },
  "projects": [
    {
      "title": "Tailwind Remix-run Starter Blog",
      "description": "This blog is constructed from Tailwind Remix-run Starter Blog.",
      "img_src": "/static/images/twitter-card.png",
      "href": "https://github.com/SangeetAgarwal/tailwind-remix-run-mdxjs-typescript-starter-blog"
    }
  ]
}
"#;
