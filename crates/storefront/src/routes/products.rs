//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use shop_core::catalog::{
    PRODUCTS_PAGE_SIZE, ProductDetail, ProductFacets, ProductFilters, ProductQuery, ProductSort,
};
use shop_core::order::color_hex;
use shop_core::types::money::format_amount;
use shop_core::{Currency, PageMeta, PageRequest, Paginated, format_price};

use crate::content::image_url;
use crate::db::products::FacetScope;
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Preferences;
use crate::routes::views::{PageContext, ProductCardView};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// A clickable facet value in the sidebar.
#[derive(Debug, Clone)]
pub struct FacetLinkView {
    pub label: String,
    pub count: i64,
    pub url: String,
    pub selected: bool,
    /// CSS color for color facets.
    pub swatch: Option<&'static str>,
}

/// Sort dropdown entry.
#[derive(Debug, Clone)]
pub struct SortOptionView {
    pub label: &'static str,
    pub url: String,
    pub selected: bool,
}

/// Sidebar facets ready for display.
#[derive(Debug, Clone, Default)]
pub struct FacetsView {
    pub price_min: String,
    pub price_max: String,
    pub colors: Vec<FacetLinkView>,
    pub sizes: Vec<FacetLinkView>,
    pub brands: Vec<FacetLinkView>,
}

impl FacetsView {
    fn new(facets: ProductFacets, filters: &ProductFilters) -> Self {
        let colors = facets
            .colors
            .into_iter()
            .map(|facet| FacetLinkView {
                url: filters.toggle_color_url(&facet.value),
                selected: filters.is_color_selected(&facet.value),
                swatch: Some(color_hex(&facet.value)),
                label: facet.value,
                count: facet.count,
            })
            .collect();
        let sizes = facets
            .sizes
            .into_iter()
            .map(|facet| FacetLinkView {
                url: filters.toggle_size_url(&facet.value),
                selected: filters.is_size_selected(&facet.value),
                swatch: None,
                label: facet.value,
                count: facet.count,
            })
            .collect();
        let brands = facets
            .brands
            .into_iter()
            .map(|brand| FacetLinkView {
                url: filters.toggle_brand_url(&brand.slug),
                selected: filters.is_brand_selected(&brand.slug),
                swatch: None,
                label: brand.name,
                count: brand.count,
            })
            .collect();

        Self {
            price_min: format_amount(facets.price_range.min, Currency::AMD),
            price_max: format_amount(facets.price_range.max, Currency::AMD),
            colors,
            sizes,
            brands,
        }
    }
}

/// Pagination links.
#[derive(Debug, Clone)]
pub struct PagerView {
    pub show: bool,
    pub page: u32,
    pub total_pages: u32,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PagerView {
    fn new(meta: &PageMeta, filters: &ProductFilters) -> Self {
        Self {
            show: meta.show_controls(),
            page: meta.page,
            total_pages: meta.total_pages,
            previous_url: meta
                .has_previous()
                .then(|| filters.pagination_url(meta.previous())),
            next_url: meta.has_next().then(|| filters.pagination_url(meta.next())),
        }
    }
}

/// Variant row on the product page.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub sku: String,
    pub color: Option<String>,
    pub swatch: Option<&'static str>,
    pub size: Option<String>,
    pub price: String,
    pub in_stock: bool,
}

/// Product detail ready for display.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub in_stock: bool,
    pub variants: Vec<VariantView>,
}

impl ProductView {
    fn new(product: ProductDetail, currency: Currency) -> Self {
        let in_stock = product.in_stock();
        let compare_at_price = product
            .compare_at_price
            .filter(|cmp| *cmp > product.price)
            .map(|cmp| format_price(cmp, currency));
        let variants = product
            .variants
            .into_iter()
            .map(|v| VariantView {
                swatch: v.color.as_deref().map(color_hex),
                price: format_price(v.price, currency),
                in_stock: v.stock > 0,
                sku: v.sku,
                color: v.color,
                size: v.size,
            })
            .collect();
        Self {
            title: product.title,
            description: product.description,
            price: format_price(product.price, currency),
            compare_at_price,
            image: product
                .image
                .as_deref()
                .map(image_url)
                .filter(|u| !u.is_empty()),
            brand: product.brand.map(|b| b.name),
            category: product.category,
            in_stock,
            variants,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub total: u64,
    pub pager: PagerView,
    pub facets: FacetsView,
    pub sort_options: Vec<SortOptionView>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub clear_url: Option<String>,
    pub active_filters: Vec<String>,
    pub empty_hint: &'static str,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
}

/// Product not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
    pub slug: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product listing page.
///
/// Query failures are logged and render as an empty listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Preferences,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    let filters = ProductFilters::from_query(&query);
    let request = PageRequest {
        page: filters.page,
        limit: PRODUCTS_PAGE_SIZE,
    };

    let listing = match ProductRepository::new(state.pool())
        .list(&filters, prefs.language, request)
        .await
    {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            Paginated::empty(PRODUCTS_PAGE_SIZE)
        }
    };

    let scope = FacetScope::new(&filters, prefs.language);
    let facets = match state.catalog_cache().facets(state.pool(), scope).await {
        Ok(facets) => FacetsView::new(facets, &filters),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load product facets");
            FacetsView::default()
        }
    };

    let sort_options = ProductSort::ALL
        .iter()
        .map(|&sort| SortOptionView {
            label: sort.label(),
            url: filters.sort_url(sort),
            selected: sort == filters.sort,
        })
        .collect();

    let clear_url = (filters.has_facet_filters() || filters.search.is_some())
        .then(|| "/products".to_string());

    ProductsIndexTemplate {
        page: PageContext::new(prefs),
        products: listing
            .data
            .into_iter()
            .map(|card| ProductCardView::new(card, prefs.currency))
            .collect(),
        total: listing.meta.total,
        pager: PagerView::new(&listing.meta, &filters),
        facets,
        sort_options,
        search: filters.search.clone(),
        category: filters.category.clone(),
        min_price: filters.min_price.clone(),
        max_price: filters.max_price.clone(),
        clear_url,
        active_filters: filters.active_filter_lines(),
        empty_hint: filters.empty_hint(),
    }
}

/// Display product detail page.
///
/// # Errors
///
/// Renders the not-found page for unknown slugs; other failures are
/// returned as `AppError`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    prefs: Preferences,
    Path(slug): Path<String>,
) -> Result<axum::response::Response> {
    match ProductRepository::new(state.pool())
        .find_by_slug(&slug, prefs.language)
        .await
    {
        Ok(product) => Ok(ProductShowTemplate {
            page: PageContext::new(prefs),
            product: ProductView::new(product, prefs.currency),
        }
        .into_response()),
        Err(RepositoryError::NotFound) => Ok((
            axum::http::StatusCode::NOT_FOUND,
            ProductNotFoundTemplate {
                page: PageContext::new(prefs),
                slug,
            },
        )
            .into_response()),
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shop_core::catalog::{BrandFacet, FacetCount, PriceRange};
    use shop_core::{BrandId, PageRequest};

    use super::*;

    fn filters() -> ProductFilters {
        ProductFilters {
            page: 1,
            colors: vec!["red".to_owned()],
            ..ProductFilters::default()
        }
    }

    #[test]
    fn test_pager_hidden_for_single_page() {
        let meta = PageMeta::new(5, PageRequest { page: 1, limit: 24 });
        let pager = PagerView::new(&meta, &filters());
        assert!(!pager.show);
        assert!(pager.previous_url.is_none());
        assert!(pager.next_url.is_none());
    }

    #[test]
    fn test_pager_links_on_middle_page() {
        let meta = PageMeta::new(100, PageRequest { page: 2, limit: 24 });
        let pager = PagerView::new(&meta, &filters());
        assert!(pager.show);
        assert_eq!(pager.total_pages, 5);
        assert_eq!(
            pager.previous_url.as_deref(),
            Some("/products?page=1&colors=red")
        );
        assert_eq!(
            pager.next_url.as_deref(),
            Some("/products?page=3&colors=red")
        );
    }

    #[test]
    fn test_facets_view_marks_selection() {
        let facets = ProductFacets {
            price_range: PriceRange {
                min: Decimal::from(2000),
                max: Decimal::from(48000),
            },
            colors: vec![
                FacetCount {
                    value: "red".to_owned(),
                    count: 3,
                },
                FacetCount {
                    value: "blue".to_owned(),
                    count: 1,
                },
            ],
            sizes: vec![],
            brands: vec![BrandFacet {
                id: BrandId::generate(),
                name: "Acme".to_owned(),
                slug: "acme".to_owned(),
                count: 2,
            }],
        };
        let view = FacetsView::new(facets, &filters());
        assert_eq!(view.price_min, "2,000 ֏");
        assert_eq!(view.price_max, "48,000 ֏");
        assert!(view.colors[0].selected);
        assert!(!view.colors[1].selected);
        assert_eq!(view.brands[0].url, "/products?page=1&colors=red&brand=acme");
    }
}
