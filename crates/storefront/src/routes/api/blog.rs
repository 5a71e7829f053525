//! Blog API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use shop_core::blog::{BLOG_PAGE_SIZE, BlogPost};
use shop_core::{Language, PageRequest, Paginated};

use super::Data;
use crate::db::{BlogRepository, RepositoryError};
use crate::error::{ApiResult, AppError, ProblemInstance};
use crate::state::AppState;

/// Blog list query.
#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub lang: Option<String>,
}

/// Blog post query.
#[derive(Debug, Deserialize)]
pub struct BlogPostQuery {
    pub lang: Option<String>,
}

/// `GET /api/v1/blog`
///
/// # Errors
///
/// Returns a 500 problem if the query fails.
#[instrument(skip(state, instance))]
pub async fn list(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<BlogListQuery>,
) -> ApiResult<Json<Paginated<BlogPost>>> {
    let language = Language::resolve_api(query.lang.as_deref());
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref(), BLOG_PAGE_SIZE);

    let posts = BlogRepository::new(state.pool())
        .list_published(language, request)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(posts))
}

/// `GET /api/v1/blog/{slug}`
///
/// # Errors
///
/// Returns a 404 problem ("Blog post not found") for missing or unpublished
/// posts and a 500 problem for any other failure.
#[instrument(skip(state, instance))]
pub async fn show(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(slug): Path<String>,
    Query(query): Query<BlogPostQuery>,
) -> ApiResult<Json<Data<BlogPost>>> {
    let language = Language::resolve_api(query.lang.as_deref());

    let post = BlogRepository::new(state.pool())
        .find_published(&slug, language)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Blog post not found".to_string()),
            other => AppError::from(other),
        })
        .map_err(|e| e.at(&instance))?;

    Ok(Json(Data { data: post }))
}
