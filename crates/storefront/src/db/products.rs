//! Product catalog queries.
//!
//! Titles and descriptions come from `product_translations` in the requested
//! language, falling back to English and finally to the slug.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use uuid::Uuid;

use shop_core::catalog::{
    BrandFacet, BrandRef, FacetCount, PriceRange, ProductCard, ProductDetail, ProductFacets,
    ProductFilters, ProductSort, ProductVariant,
};
use shop_core::search::like_pattern;
use shop_core::types::money::{Currency, convert};
use shop_core::{BrandId, Language, PageRequest, Paginated, ProductId, VariantId};

use super::RepositoryError;

// =============================================================================
// SQL
// =============================================================================

/// Published products narrowed by every listing filter.
///
/// Binds: `$1` locale, `$2` category slug, `$3` search, `$4` min price,
/// `$5` max price, `$6` brand slug, `$7` colors, `$8` sizes. The search bind
/// is an escaped contains-pattern from [`like_pattern`].
const FILTERED_PRODUCTS: &str = r"
    WITH filtered AS (
        SELECT
            p.id, p.slug, p.price, p.compare_at_price, p.image, p.created_at,
            b.id AS brand_id, b.name AS brand_name,
            COALESCE(t.title, en.title, p.slug) AS title
        FROM shop.products p
        LEFT JOIN shop.brands b ON b.id = p.brand_id
        LEFT JOIN shop.categories c ON c.id = p.category_id
        LEFT JOIN shop.product_translations t ON t.product_id = p.id AND t.locale = $1
        LEFT JOIN shop.product_translations en ON en.product_id = p.id AND en.locale = 'en'
        WHERE p.published
            AND ($2::text IS NULL OR c.slug = $2)
            AND ($3::text IS NULL OR COALESCE(t.title, en.title, p.slug) ILIKE $3)
            AND ($4::numeric IS NULL OR p.price >= $4)
            AND ($5::numeric IS NULL OR p.price <= $5)
            AND ($6::text IS NULL OR b.slug = $6)
            AND (cardinality($7::text[]) = 0 OR EXISTS (
                SELECT 1 FROM shop.product_variants v
                WHERE v.product_id = p.id AND LOWER(v.color) = ANY($7)
            ))
            AND (cardinality($8::text[]) = 0 OR EXISTS (
                SELECT 1 FROM shop.product_variants v
                WHERE v.product_id = p.id AND v.size = ANY($8)
            ))
    )
";

/// Published products narrowed by the facet scope (category, search, price).
///
/// Binds: `$1` locale, `$2` category slug, `$3` search, `$4` min price,
/// `$5` max price.
const SCOPED_PRODUCTS: &str = r"
    WITH scoped AS (
        SELECT p.id, p.price, p.brand_id
        FROM shop.products p
        LEFT JOIN shop.categories c ON c.id = p.category_id
        LEFT JOIN shop.product_translations t ON t.product_id = p.id AND t.locale = $1
        LEFT JOIN shop.product_translations en ON en.product_id = p.id AND en.locale = 'en'
        WHERE p.published
            AND ($2::text IS NULL OR c.slug = $2)
            AND ($3::text IS NULL OR COALESCE(t.title, en.title, p.slug) ILIKE $3)
            AND ($4::numeric IS NULL OR p.price >= $4)
            AND ($5::numeric IS NULL OR p.price <= $5)
    )
";

const fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Default | ProductSort::Newest => "created_at DESC, id",
        ProductSort::PriceAsc => "price ASC, id",
        ProductSort::PriceDesc => "price DESC, id",
        ProductSort::NameAsc => "title ASC, id",
        ProductSort::NameDesc => "title DESC, id",
    }
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Bind values for [`FILTERED_PRODUCTS`].
#[derive(Debug, Clone)]
struct ListingParams {
    locale: &'static str,
    category: Option<String>,
    search: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    brand: Option<String>,
    colors: Vec<String>,
    sizes: Vec<String>,
}

impl ListingParams {
    fn new(filters: &ProductFilters, language: Language) -> Self {
        Self {
            locale: language.code(),
            category: filters.category.clone(),
            search: filters.search.clone(),
            min_price: filters.min_price_base(),
            max_price: filters.max_price_base(),
            brand: filters.brand.clone(),
            colors: filters.colors.clone(),
            sizes: filters.sizes.clone(),
        }
    }

    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query
            .bind(self.locale)
            .bind(self.category.clone())
            .bind(like_pattern(self.search.as_deref()))
            .bind(self.min_price)
            .bind(self.max_price)
            .bind(self.brand.clone())
            .bind(self.colors.clone())
            .bind(self.sizes.clone())
    }
}

/// Scope the sidebar facets are computed over.
///
/// Colors, sizes and brand are deliberately absent so every facet value stays
/// selectable while others are applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacetScope {
    pub language: Language,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl FacetScope {
    #[must_use]
    pub fn new(filters: &ProductFilters, language: Language) -> Self {
        Self {
            language,
            category: filters.category.clone(),
            search: filters.search.clone(),
            min_price: filters.min_price_base(),
            max_price: filters.max_price_base(),
        }
    }

    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query
            .bind(self.language.code())
            .bind(self.category.clone())
            .bind(like_pattern(self.search.as_deref()))
            .bind(self.min_price)
            .bind(self.max_price)
    }
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductCardRow {
    id: Uuid,
    slug: String,
    title: String,
    price: Decimal,
    compare_at_price: Option<Decimal>,
    image: Option<String>,
    brand_id: Option<Uuid>,
    brand_name: Option<String>,
    in_stock: bool,
}

impl From<ProductCardRow> for ProductCard {
    fn from(row: ProductCardRow) -> Self {
        let brand = match (row.brand_id, row.brand_name) {
            (Some(id), Some(name)) => Some(BrandRef {
                id: BrandId::new(id),
                name,
            }),
            _ => None,
        };
        Self {
            id: ProductId::new(row.id),
            slug: row.slug,
            title: row.title,
            price: row.price,
            compare_at_price: row.compare_at_price,
            image: row.image,
            in_stock: row.in_stock,
            brand,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    id: Uuid,
    slug: String,
    title: String,
    description: Option<String>,
    price: Decimal,
    compare_at_price: Option<Decimal>,
    image: Option<String>,
    brand_id: Option<Uuid>,
    brand_name: Option<String>,
    category_name: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: Uuid,
    sku: String,
    color: Option<String>,
    size: Option<String>,
    price: Decimal,
    stock: i32,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            sku: row.sku,
            color: row.color,
            size: row.size,
            price: row.price,
            stock: row.stock,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FacetCountRow {
    value: String,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct BrandFacetRow {
    id: Uuid,
    name: String,
    slug: String,
    count: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filters: &ProductFilters,
        language: Language,
        page: PageRequest,
    ) -> Result<Paginated<ProductCard>, RepositoryError> {
        let params = ListingParams::new(filters, language);

        let count_sql = format!("{FILTERED_PRODUCTS} SELECT COUNT(*) FROM filtered");
        let (total,): (i64,) = params
            .bind(sqlx::query_as(&count_sql))
            .fetch_one(self.pool)
            .await?;

        let list_sql = format!(
            "{FILTERED_PRODUCTS}
            SELECT
                f.id, f.slug, f.title, f.price, f.compare_at_price, f.image,
                f.brand_id, f.brand_name,
                EXISTS (
                    SELECT 1 FROM shop.product_variants v
                    WHERE v.product_id = f.id AND v.stock > 0
                ) AS in_stock
            FROM filtered f
            ORDER BY {}
            LIMIT $9 OFFSET $10",
            order_clause(filters.sort)
        );
        let rows: Vec<ProductCardRow> = params
            .bind(sqlx::query_as(&list_sql))
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

    /// Newest published products, for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn newest(
        &self,
        language: Language,
        limit: u32,
    ) -> Result<Vec<ProductCard>, RepositoryError> {
        let filters = ProductFilters::default();
        let page = PageRequest { page: 1, limit };
        Ok(self.list(&filters, language, page).await?.data)
    }

    /// Find a published product by slug, with its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no published product has this slug.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_by_slug(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<ProductDetail, RepositoryError> {
        let row: ProductDetailRow = sqlx::query_as(
            r"
            SELECT
                p.id, p.slug, p.price, p.compare_at_price, p.image,
                COALESCE(t.title, en.title, p.slug) AS title,
                COALESCE(t.description, en.description) AS description,
                b.id AS brand_id, b.name AS brand_name,
                c.name AS category_name
            FROM shop.products p
            LEFT JOIN shop.brands b ON b.id = p.brand_id
            LEFT JOIN shop.categories c ON c.id = p.category_id
            LEFT JOIN shop.product_translations t ON t.product_id = p.id AND t.locale = $2
            LEFT JOIN shop.product_translations en ON en.product_id = p.id AND en.locale = 'en'
            WHERE p.slug = $1 AND p.published
            ",
        )
        .bind(slug)
        .bind(language.code())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let variants: Vec<VariantRow> = sqlx::query_as(
            r"
            SELECT id, sku, color, size, price, stock
            FROM shop.product_variants
            WHERE product_id = $1
            ORDER BY color NULLS LAST, size NULLS LAST, sku
            ",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        let brand = match (row.brand_id, row.brand_name) {
            (Some(id), Some(name)) => Some(BrandRef {
                id: BrandId::new(id),
                name,
            }),
            _ => None,
        };

        Ok(ProductDetail {
            id: ProductId::new(row.id),
            slug: row.slug,
            title: row.title,
            description: row.description,
            price: row.price,
            compare_at_price: row.compare_at_price,
            image: row.image,
            brand,
            category: row.category_name,
            variants: variants.into_iter().map(Into::into).collect(),
        })
    }

    /// Sidebar facets for a listing scope.
    ///
    /// The price range is reported in AMD.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn facets(&self, scope: &FacetScope) -> Result<ProductFacets, RepositoryError> {
        let range_sql = format!("{SCOPED_PRODUCTS} SELECT MIN(price), MAX(price) FROM scoped");
        let (min, max): (Option<Decimal>, Option<Decimal>) = scope
            .bind(sqlx::query_as(&range_sql))
            .fetch_one(self.pool)
            .await?;

        let colors_sql = format!(
            "{SCOPED_PRODUCTS}
            SELECT LOWER(TRIM(v.color)) AS value, COUNT(DISTINCT v.product_id) AS count
            FROM shop.product_variants v
            JOIN scoped s ON s.id = v.product_id
            WHERE v.color IS NOT NULL AND TRIM(v.color) <> ''
            GROUP BY 1
            ORDER BY count DESC, value"
        );
        let colors: Vec<FacetCountRow> = scope
            .bind(sqlx::query_as(&colors_sql))
            .fetch_all(self.pool)
            .await?;

        let sizes_sql = format!(
            "{SCOPED_PRODUCTS}
            SELECT TRIM(v.size) AS value, COUNT(DISTINCT v.product_id) AS count
            FROM shop.product_variants v
            JOIN scoped s ON s.id = v.product_id
            WHERE v.size IS NOT NULL AND TRIM(v.size) <> ''
            GROUP BY 1
            ORDER BY value"
        );
        let sizes: Vec<FacetCountRow> = scope
            .bind(sqlx::query_as(&sizes_sql))
            .fetch_all(self.pool)
            .await?;

        let brands_sql = format!(
            "{SCOPED_PRODUCTS}
            SELECT b.id, b.name, b.slug, COUNT(*) AS count
            FROM scoped s
            JOIN shop.brands b ON b.id = s.brand_id
            GROUP BY b.id, b.name, b.slug
            ORDER BY b.name"
        );
        let brands: Vec<BrandFacetRow> = scope
            .bind(sqlx::query_as(&brands_sql))
            .fetch_all(self.pool)
            .await?;

        let to_amd = |usd: Decimal| convert(usd, Currency::BASE, Currency::AMD);
        Ok(ProductFacets {
            price_range: PriceRange {
                min: min.map(to_amd).unwrap_or_default(),
                max: max.map(to_amd).unwrap_or_default(),
            },
            colors: colors
                .into_iter()
                .map(|r| FacetCount {
                    value: r.value,
                    count: r.count,
                })
                .collect(),
            sizes: sizes
                .into_iter()
                .map(|r| FacetCount {
                    value: r.value,
                    count: r.count,
                })
                .collect(),
            brands: brands
                .into_iter()
                .map(|r| BrandFacet {
                    id: BrandId::new(r.id),
                    name: r.name,
                    slug: r.slug,
                    count: r.count,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sort_has_a_tiebreaker() {
        for sort in ProductSort::ALL {
            assert!(order_clause(sort).ends_with(", id"), "{sort:?}");
        }
    }

    #[test]
    fn test_facet_scope_ignores_facet_filters() {
        let with_facets = ProductFilters {
            colors: vec!["red".to_owned()],
            sizes: vec!["M".to_owned()],
            brand: Some("acme".to_owned()),
            ..ProductFilters::default()
        };
        assert_eq!(
            FacetScope::new(&with_facets, Language::En),
            FacetScope::new(&ProductFilters::default(), Language::En)
        );
    }

    #[test]
    fn test_facet_scope_converts_price_window() {
        let filters = ProductFilters {
            min_price: Some("4000".to_owned()),
            ..ProductFilters::default()
        };
        let scope = FacetScope::new(&filters, Language::Hy);
        assert_eq!(scope.min_price, Some(Decimal::from(10)));
        assert_eq!(scope.max_price, None);
    }
}
