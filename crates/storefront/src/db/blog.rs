//! Blog post queries.
//!
//! Only published posts are visible. Fields are read from the requested
//! language with a fallback to English.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shop_core::blog::BlogPost;
use shop_core::{BlogPostId, Language, PageRequest, Paginated};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    slug: String,
    title: String,
    content_html: Option<String>,
    excerpt: Option<String>,
    featured_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: BlogPostId::new(row.id),
            slug: row.slug,
            title: row.title,
            content_html: row.content_html,
            excerpt: row.excerpt,
            featured_image: row.featured_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        }
    }
}

const SELECT_POST: &str = r"
    SELECT
        p.id, p.slug, p.featured_image, p.created_at, p.updated_at, p.published_at,
        COALESCE(t.title, en.title, p.slug) AS title,
        COALESCE(t.excerpt, en.excerpt) AS excerpt,
        COALESCE(t.content_html, en.content_html) AS content_html
    FROM shop.blog_posts p
    LEFT JOIN shop.blog_post_translations t ON t.post_id = p.id AND t.locale = $1
    LEFT JOIN shop.blog_post_translations en ON en.post_id = p.id AND en.locale = 'en'
";

/// Repository for blog reads.
pub struct BlogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_published(
        &self,
        language: Language,
        page: PageRequest,
    ) -> Result<Paginated<BlogPost>, RepositoryError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM shop.blog_posts WHERE published")
                .fetch_one(self.pool)
                .await?;

        let sql = format!(
            "{SELECT_POST}
            WHERE p.published
            ORDER BY COALESCE(p.published_at, p.created_at) DESC, p.id
            LIMIT $2 OFFSET $3"
        );
        let rows: Vec<BlogPostRow> = sqlx::query_as(&sql)
            .bind(language.code())
            .bind(page.sql_limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        let total = u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count {total}")))?;
        Ok(Paginated::new(
            rows.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    /// Find a published post by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post is missing or unpublished.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_published(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<BlogPost, RepositoryError> {
        let sql = format!("{SELECT_POST} WHERE p.slug = $2 AND p.published");
        let row: Option<BlogPostRow> = sqlx::query_as(&sql)
            .bind(language.code())
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
