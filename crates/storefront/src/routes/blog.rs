//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shop_core::blog::{BLOG_PAGE_SIZE, BlogPost};
use shop_core::{Language, PageMeta, PageRequest, Paginated};

use crate::content::{image_url, process_article_html};
use crate::db::{BlogRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Preferences;
use crate::routes::views::{PageContext, PostCardView};
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub page: Option<String>,
}

/// Article ready for display.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub title: String,
    pub date: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    /// Sanitized and processed HTML, safe to render unescaped.
    pub content_html: String,
}

impl ArticleView {
    #[must_use]
    pub fn new(post: &BlogPost, language: Language) -> Self {
        Self {
            title: post.title.clone(),
            date: post.display_date(language),
            excerpt: post.excerpt().map(str::to_owned),
            featured_image: post
                .featured_image
                .as_deref()
                .map(image_url)
                .filter(|u| !u.is_empty()),
            content_html: process_article_html(post.content_html.as_deref().unwrap_or_default()),
        }
    }
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub page: PageContext,
    pub posts: Vec<PostCardView>,
    pub meta: PageMeta,
}

impl BlogIndexTemplate {
    #[allow(clippy::unused_self)]
    fn page_url(&self, page: u32) -> String {
        format!("/blog?page={page}")
    }
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub page: PageContext,
    pub post: ArticleView,
}

/// Blog post not found template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/not_found.html")]
pub struct BlogNotFoundTemplate {
    pub page: PageContext,
}

/// Display the blog index page with published posts.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Preferences,
    Query(query): Query<BlogQuery>,
) -> impl IntoResponse {
    let request = PageRequest::parse(query.page.as_deref(), None, BLOG_PAGE_SIZE);
    let listing = match BlogRepository::new(state.pool())
        .list_published(prefs.language, request)
        .await
    {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load blog posts");
            Paginated::empty(BLOG_PAGE_SIZE)
        }
    };

    BlogIndexTemplate {
        page: PageContext::new(prefs),
        posts: listing
            .data
            .iter()
            .map(|post| PostCardView::new(post, prefs.language))
            .collect(),
        meta: listing.meta,
    }
}

/// Display a single blog post by slug.
///
/// # Errors
///
/// Renders the not-found page for missing or unpublished posts; other
/// failures are returned as `AppError`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    prefs: Preferences,
    Path(slug): Path<String>,
) -> Result<Response> {
    match BlogRepository::new(state.pool())
        .find_published(&slug, prefs.language)
        .await
    {
        Ok(post) => Ok(BlogShowTemplate {
            page: PageContext::new(prefs),
            post: ArticleView::new(&post, prefs.language),
        }
        .into_response()),
        Err(RepositoryError::NotFound) => Ok((
            StatusCode::NOT_FOUND,
            BlogNotFoundTemplate {
                page: PageContext::new(prefs),
            },
        )
            .into_response()),
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shop_core::BlogPostId;

    use super::*;

    #[test]
    fn test_article_view_processes_content() {
        let created = Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap();
        let post = BlogPost {
            id: BlogPostId::generate(),
            slug: "care".to_owned(),
            title: "Caring for wool".to_owned(),
            content_html: Some(r#"<h1>Wash</h1><a href='/faq'>FAQ</a>"#.to_owned()),
            excerpt: Some("  ".to_owned()),
            featured_image: Some("blog/wool.jpg".to_owned()),
            created_at: created,
            updated_at: created,
            published_at: None,
        };
        let view = ArticleView::new(&post, Language::En);
        assert_eq!(view.date, "January 5, 2025");
        assert!(view.excerpt.is_none());
        assert_eq!(view.featured_image.as_deref(), Some("/blog/wool.jpg"));
        assert_eq!(
            view.content_html,
            r#"<h2>Wash</h2><a href="/faq" class="internal-link">FAQ</a>"#
        );
    }

    #[test]
    fn test_page_url() {
        let template = BlogIndexTemplate {
            page: PageContext::new(Preferences::default()),
            posts: Vec::new(),
            meta: PageMeta::empty(BLOG_PAGE_SIZE),
        };
        assert_eq!(template.page_url(3), "/blog?page=3");
    }
}
