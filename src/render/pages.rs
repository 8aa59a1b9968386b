//! HTML for the built-in pages.
//!
//! Deliberately plain: a shared layout, a handful of page bodies, and a
//! small body formatter that handles headings, paragraphs and fenced
//! code. Everything interpolated into markup goes through
//! [`escape_html`].

use std::fmt::Write;

use super::content::Post;
use super::seo::SeoMeta;
use crate::config::model::{Project, SiteConfig};

#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[must_use]
pub fn layout(site: &SiteConfig, meta: &SeoMeta, main: &str) -> String {
    let mut head = String::new();
    let _ = write!(head, "<title>{}</title>", escape_html(&meta.title));
    for tag in &meta.tags {
        let _ = write!(
            head,
            "\n<meta {}=\"{}\" content=\"{}\">",
            tag.attr,
            tag.key,
            escape_html(&tag.content)
        );
    }

    let mut social = String::new();
    for (label, url) in site.site.social.entries() {
        let _ = write!(
            social,
            "<a href=\"{}\" rel=\"noopener\">{}</a> ",
            escape_html(url),
            label
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\" data-theme=\"{theme}\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         {head}\n</head>\n<body>\n\
         <header><a href=\"/\">{header}</a> <nav><a href=\"/blogs\">Blog</a> <a href=\"/projects\">Projects</a></nav></header>\n\
         <main>\n{main}\n</main>\n\
         <footer><p>{author}</p><p>{social}</p></footer>\n\
         </body>\n</html>\n",
        lang = escape_html(&site.site.language),
        theme = site.site.theme.as_str(),
        header = escape_html(&site.site.header_title),
        author = escape_html(&site.site.author),
    )
}

fn post_summary(post: &Post) -> String {
    let fm = &post.front_matter;
    let mut html = format!(
        "<li><article><h2><a href=\"/blogs/{}\">{}</a></h2>",
        escape_html(&post.slug),
        escape_html(&fm.title)
    );
    if let Some(date) = &fm.date {
        let _ = write!(html, "<time datetime=\"{0}\">{0}</time>", escape_html(date));
    }
    if !fm.tags.is_empty() {
        let tags: Vec<String> = fm.tags.iter().map(|t| escape_html(t)).collect();
        let _ = write!(html, "<p class=\"tags\">{}</p>", tags.join(", "));
    }
    if let Some(blurb) = fm.blurb() {
        let _ = write!(html, "<p>{}</p>", escape_html(blurb));
    }
    html.push_str("</article></li>");
    html
}

fn post_list(posts: &[&Post]) -> String {
    if posts.is_empty() {
        return "<p>No posts found.</p>".into();
    }
    let items: Vec<String> = posts.iter().map(|p| post_summary(p)).collect();
    format!("<ul class=\"posts\">{}</ul>", items.join("\n"))
}

#[must_use]
pub fn home(site: &SiteConfig, latest: &[&Post]) -> String {
    format!(
        "<section><h1>Latest</h1><p>{}</p></section>\n{}\n<p><a href=\"/blogs\">All Posts &rarr;</a></p>",
        escape_html(&site.site.description),
        post_list(latest)
    )
}

#[must_use]
pub fn blog_index(posts: &[&Post]) -> String {
    format!("<h1>All Posts</h1>\n{}", post_list(posts))
}

#[must_use]
pub fn post(post: &Post) -> String {
    let fm = &post.front_matter;
    let date = fm
        .date
        .as_deref()
        .map(|d| format!("<time datetime=\"{0}\">{0}</time>", escape_html(d)))
        .unwrap_or_default();
    format!(
        "<article><header><h1>{}</h1>{}</header>\n{}</article>",
        escape_html(&fm.title),
        date,
        format_body(&post.body)
    )
}

#[must_use]
pub fn under_construction() -> String {
    "<div class=\"under-construction\"><h1>Under Construction \
     <span role=\"img\" aria-label=\"roadwork sign\">\u{1f6a7}</span></h1></div>"
        .into()
}

fn project_card(project: &Project) -> String {
    let title = match &project.href {
        Some(href) => format!(
            "<a href=\"{}\" rel=\"noopener\">{}</a>",
            escape_html(href),
            escape_html(&project.title)
        ),
        None => escape_html(&project.title),
    };
    let image = project
        .img_src
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(&project.title)
            )
        })
        .unwrap_or_default();
    format!(
        "<li><article>{image}<h2>{title}</h2><p>{}</p></article></li>",
        escape_html(&project.description)
    )
}

#[must_use]
pub fn projects(projects: &[Project]) -> String {
    let cards: Vec<String> = projects.iter().map(project_card).collect();
    format!("<h1>Projects</h1>\n<ul class=\"projects\">{}</ul>", cards.join("\n"))
}

#[must_use]
pub fn not_found() -> String {
    "<h1>404</h1><p>Sorry we couldn't find this page.</p><p><a href=\"/\">Back to homepage</a></p>"
        .into()
}

#[must_use]
pub fn method_not_allowed() -> String {
    "<h1>405</h1><p>This page only answers GET requests.</p>".into()
}

#[must_use]
pub fn internal_error() -> String {
    "<!DOCTYPE html>\n<html><head><title>Server Error</title></head>\
     <body><h1>500</h1><p>Something went wrong.</p></body></html>\n"
        .into()
}

/// Render a post body: `#` headings, blank-line separated paragraphs and
/// fenced code blocks. Everything else is escaped text.
#[must_use]
pub fn format_body(body: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Option<Vec<&str>> = None;

    let flush = |paragraph: &mut Vec<&str>, html: &mut String| {
        if !paragraph.is_empty() {
            let _ = writeln!(html, "<p>{}</p>", escape_html(&paragraph.join(" ")));
            paragraph.clear();
        }
    };

    for line in body.lines() {
        if let Some(block) = code.as_mut() {
            if line.trim_start().starts_with("```") {
                let _ = writeln!(html, "<pre><code>{}</code></pre>", escape_html(&block.join("\n")));
                code = None;
            } else {
                block.push(line);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            flush(&mut paragraph, &mut html);
            code = Some(Vec::new());
        } else if trimmed.is_empty() {
            flush(&mut paragraph, &mut html);
        } else if let Some((level, text)) = heading(trimmed) {
            flush(&mut paragraph, &mut html);
            let _ = writeln!(html, "<h{level}>{}</h{level}>", escape_html(text));
        } else {
            paragraph.push(trimmed);
        }
    }

    // An unterminated fence still shows its contents.
    if let Some(block) = code {
        let _ = writeln!(html, "<pre><code>{}</code></pre>", escape_html(&block.join("\n")));
    }
    flush(&mut paragraph, &mut html);
    html
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::seo::{seo_meta, PageSeo};

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn body_headings_paragraphs_and_code() {
        let html = format_body("# Title\n\nfirst line\nsecond line\n\n```rust\nlet x = 1 < 2;\n```\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>first line second line</p>"));
        assert!(html.contains("<pre><code>let x = 1 &lt; 2;</code></pre>"));
    }

    #[test]
    fn hash_without_space_is_text() {
        let html = format_body("#hashtag");
        assert_eq!(html, "<p>#hashtag</p>\n");
    }

    #[test]
    fn unterminated_fence_is_kept() {
        let html = format_body("```\nfn main() {}");
        assert!(html.contains("<pre><code>fn main() {}</code></pre>"));
    }

    #[test]
    fn layout_carries_seo_tags() {
        let site = SiteConfig::default();
        let meta = seo_meta(&site.seo, &PageSeo::default());
        let html = layout(&site, &meta, "<p>hi</p>");
        assert!(html.contains("<title>Tailwind Remix-run Starter Blog</title>"));
        assert!(html.contains("<meta property=\"og:type\" content=\"website\">"));
        assert!(html.contains("<html lang=\"en-us\" data-theme=\"system\">"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn project_cards_link_out() {
        let html = projects(&SiteConfig::default().projects);
        assert!(html.contains("Tailwind Remix-run Starter Blog</a>"));
        assert!(html.contains("<img src=\"/static/images/twitter-card.png\""));
    }
}
