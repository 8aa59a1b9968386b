use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use super::content::{is_valid_slug, ContentStore, Post};
use super::seo::{seo_meta, PageSeo};
use super::{pages, Page, RenderRequest, Renderer};
use crate::config::model::SiteConfig;
use crate::error::BlogError;

const HOME_POSTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Home,
    Blogs,
    Post(&'a str),
    Projects,
    NotFound,
}

fn route(path: &str) -> Route<'_> {
    match path {
        "/" => Route::Home,
        "/blogs" => Route::Blogs,
        "/projects" => Route::Projects,
        _ => match path.strip_prefix("/blogs/") {
            Some(slug) if is_valid_slug(slug) => Route::Post(slug),
            _ => Route::NotFound,
        },
    }
}

/// The blog itself: posts from a [`ContentStore`], pages from
/// [`pages`], metadata from the site configuration.
#[derive(Debug)]
pub struct SiteRenderer {
    site: Arc<SiteConfig>,
    content: ContentStore,
}

impl SiteRenderer {
    #[must_use]
    pub const fn new(site: Arc<SiteConfig>, content: ContentStore) -> Self {
        Self { site, content }
    }

    fn page(&self, status: StatusCode, seo: &PageSeo<'_>, main: &str) -> Page {
        let meta = seo_meta(&self.site.seo, seo);
        Page::html(status, pages::layout(&self.site, &meta, main))
    }

    fn not_found(&self, data: bool) -> Page {
        if data {
            return Page::json(StatusCode::NOT_FOUND, json!({ "error": "not found" }));
        }
        self.page(
            StatusCode::NOT_FOUND,
            &PageSeo {
                title: Some("Page Not Found"),
                description: None,
            },
            &pages::not_found(),
        )
    }

    async fn published(&self) -> Result<Vec<Post>, BlogError> {
        let posts = self.content.posts().await?;
        Ok(posts.iter().filter(|p| p.is_published()).cloned().collect())
    }

    async fn listing(&self, limit: Option<usize>, data: bool) -> Result<Page, BlogError> {
        let mut posts = self.published().await?;
        if let Some(limit) = limit {
            posts.truncate(limit);
        }

        if data {
            let front_matter: Vec<_> = posts
                .iter()
                .map(|p| json!({ "slug": p.slug, "front_matter": p.front_matter }))
                .collect();
            return Ok(Page::json(StatusCode::OK, json!(front_matter)));
        }

        let refs: Vec<&Post> = posts.iter().collect();
        Ok(match limit {
            Some(_) => self.page(
                StatusCode::OK,
                &PageSeo::default(),
                &pages::home(&self.site, &refs),
            ),
            None => self.page(
                StatusCode::OK,
                &PageSeo {
                    title: Some("Blog"),
                    description: None,
                },
                &pages::blog_index(&refs),
            ),
        })
    }

    async fn post(&self, slug: &str, data: bool) -> Result<Page, BlogError> {
        let post = match self.content.post(slug).await {
            Ok(post) => post,
            Err(BlogError::PostNotFound { .. }) => return Ok(self.not_found(data)),
            Err(e) => return Err(e),
        };

        if data {
            return Ok(Page::json(StatusCode::OK, json!(post)));
        }

        let fm = &post.front_matter;
        let seo = PageSeo {
            title: Some(&fm.title),
            description: fm.blurb(),
        };
        let main = if post.is_published() {
            pages::post(&post)
        } else {
            pages::under_construction()
        };
        Ok(self.page(StatusCode::OK, &seo, &main))
    }

    fn projects(&self, data: bool) -> Page {
        if data {
            return Page::json(StatusCode::OK, json!(self.site.projects));
        }
        self.page(
            StatusCode::OK,
            &PageSeo {
                title: Some("Projects"),
                description: None,
            },
            &pages::projects(&self.site.projects),
        )
    }
}

#[async_trait]
impl Renderer for SiteRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Page, BlogError> {
        if !matches!(request.method, Method::GET | Method::HEAD) {
            return Ok(self.page(
                StatusCode::METHOD_NOT_ALLOWED,
                &PageSeo::default(),
                &pages::method_not_allowed(),
            ));
        }

        let data = request.wants_data();
        match route(&request.path) {
            Route::Home => self.listing(Some(HOME_POSTS), data).await,
            Route::Blogs => self.listing(None, data).await,
            Route::Post(slug) => self.post(slug, data).await,
            Route::Projects => Ok(self.projects(data)),
            Route::NotFound => Ok(self.not_found(data)),
        }
    }

    fn cached_posts(&self) -> Option<usize> {
        self.content.cached_len()
    }
}
