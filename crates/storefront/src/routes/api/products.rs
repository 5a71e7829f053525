//! Product API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use shop_core::catalog::{
    PRODUCTS_PAGE_SIZE, ProductCard, ProductDetail, ProductFacets, ProductFilters, ProductQuery,
};
use shop_core::{Language, PageRequest, Paginated};

use super::Data;
use crate::db::products::FacetScope;
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{ApiResult, AppError, ProblemInstance};
use crate::state::AppState;

/// Query for a single product.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// `GET /api/v1/products`
///
/// # Errors
///
/// Returns a 500 problem if the catalog query fails.
#[instrument(skip(state, instance))]
pub async fn list(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Paginated<ProductCard>>> {
    let filters = ProductFilters::from_query(&query);
    let language = Language::resolve_api(query.lang.as_deref());
    let request = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        PRODUCTS_PAGE_SIZE,
    );

    let listing = ProductRepository::new(state.pool())
        .list(&filters, language, request)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(listing))
}

/// `GET /api/v1/products/filters`
///
/// Facets for the category, search and price window of the query. Served
/// from the catalog cache.
///
/// # Errors
///
/// Returns a 500 problem if the facet queries fail.
#[instrument(skip(state, instance))]
pub async fn filters(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<ProductFacets>> {
    let filters = ProductFilters::from_query(&query);
    let language = Language::resolve_api(query.lang.as_deref());
    let scope = FacetScope::new(&filters, language);

    let facets = state
        .catalog_cache()
        .facets(state.pool(), scope)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(facets))
}

/// `GET /api/v1/products/{slug}`
///
/// # Errors
///
/// Returns a 404 problem for unknown slugs and a 500 problem on query failure.
#[instrument(skip(state, instance))]
pub async fn show(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> ApiResult<Json<Data<ProductDetail>>> {
    let language = Language::resolve_api(query.lang.as_deref());

    let product = ProductRepository::new(state.pool())
        .find_by_slug(&slug, language)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::from(other),
        })
        .map_err(|e| e.at(&instance))?;

    Ok(Json(Data { data: product }))
}
