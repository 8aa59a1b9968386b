//! Blog posts on disk.
//!
//! Posts live at `<content>/blog/<slug>.md` (or `.mdx`) and open with a
//! YAML front matter block fenced by `---` lines. In production the
//! whole set is read once at startup and served from memory; in
//! development every request reads the files again so edits show up
//! without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Mode;
use crate::error::BlogError;

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FrontMatter {
    /// Text for the description meta tag and listing blurbs.
    #[must_use]
    pub fn blurb(&self) -> Option<&str> {
        self.description.as_deref().or(self.summary.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Post {
    #[must_use]
    pub const fn is_published(&self) -> bool {
        !self.front_matter.draft
    }
}

/// Slugs are a single path segment of letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split `---\n<yaml>\n---\n<body>` into its two halves.
#[must_use]
pub fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rest = raw.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

pub fn parse_post(slug: &str, raw: &str, path: &Path) -> Result<Post, BlogError> {
    let (yaml, body) = split_front_matter(raw).ok_or_else(|| BlogError::FrontMatter {
        path: path.to_path_buf(),
        reason: "expected a '---' fenced front matter block at the top of the file".into(),
    })?;

    let front_matter: FrontMatter =
        serde_yml::from_str(yaml).map_err(|e| BlogError::FrontMatter {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if front_matter.title.trim().is_empty() {
        return Err(BlogError::FrontMatter {
            path: path.to_path_buf(),
            reason: "title cannot be empty".into(),
        });
    }

    Ok(Post {
        slug: slug.to_string(),
        front_matter,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

fn blog_dir(root: &Path) -> PathBuf {
    root.join("blog")
}

/// Newest first; undated posts sink to the end, ties break on slug.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.front_matter
            .date
            .cmp(&a.front_matter.date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Read and parse every post under `<root>/blog`. A missing `blog`
/// directory is an empty blog, not an error.
pub async fn load_posts(root: &Path) -> Result<Vec<Post>, BlogError> {
    let dir = blog_dir(root);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BlogError::Io(e)),
    };

    let mut posts = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_post = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| POST_EXTENSIONS.contains(&ext));
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_post || !is_valid_slug(slug) {
            continue;
        }
        let raw = tokio::fs::read_to_string(&path).await?;
        posts.push(parse_post(slug, &raw, &path)?);
    }

    sort_posts(&mut posts);
    Ok(posts)
}

/// Read one post by slug straight from disk.
pub async fn load_post(root: &Path, slug: &str) -> Result<Post, BlogError> {
    if !is_valid_slug(slug) {
        return Err(BlogError::PostNotFound {
            slug: slug.to_string(),
        });
    }
    for ext in POST_EXTENSIONS {
        let path = blog_dir(root).join(format!("{slug}.{ext}"));
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => return parse_post(slug, &raw, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(BlogError::Io(e)),
        }
    }
    Err(BlogError::PostNotFound {
        slug: slug.to_string(),
    })
}

#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    cached: Option<Arc<Vec<Post>>>,
}

impl ContentStore {
    /// Open the content root. Production mode reads every post now, so a
    /// broken post stops the deploy instead of a request.
    pub async fn open(root: impl Into<PathBuf>, mode: Mode) -> Result<Self, BlogError> {
        let root = root.into();
        if !tokio::fs::try_exists(&root).await.unwrap_or(false) {
            return Err(BlogError::ContentDirMissing { path: root });
        }

        let cached = match mode {
            Mode::Production => {
                let posts = load_posts(&root).await?;
                tracing::info!(posts = posts.len(), root = %root.display(), "content loaded");
                Some(Arc::new(posts))
            }
            Mode::Development => None,
        };

        Ok(Self { root, cached })
    }

    /// Build a store over an already loaded set of posts.
    #[must_use]
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        sort_posts(&mut posts);
        Self {
            root: PathBuf::new(),
            cached: Some(Arc::new(posts)),
        }
    }

    pub async fn posts(&self) -> Result<Arc<Vec<Post>>, BlogError> {
        match &self.cached {
            Some(posts) => Ok(Arc::clone(posts)),
            None => load_posts(&self.root).await.map(Arc::new),
        }
    }

    pub async fn post(&self, slug: &str) -> Result<Post, BlogError> {
        match &self.cached {
            Some(posts) => posts
                .iter()
                .find(|p| p.slug == slug)
                .cloned()
                .ok_or_else(|| BlogError::PostNotFound {
                    slug: slug.to_string(),
                }),
            None => load_post(&self.root, slug).await,
        }
    }

    #[must_use]
    pub fn cached_len(&self) -> Option<usize> {
        self.cached.as_ref().map(|p| p.len())
    }
}
