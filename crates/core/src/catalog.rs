//! Catalog listing: query parsing, filters, sorting and listing records.
//!
//! Price filters are entered in AMD, the currency shoppers see by default.
//! Listing prices themselves are stored in [`Currency::BASE`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pagination::PageRequest;
use crate::types::money::{Currency, convert};
use crate::types::{BrandId, ProductId, VariantId};

/// Products shown per listing page.
pub const PRODUCTS_PAGE_SIZE: u32 = 24;

/// Raw `/products` query string, exactly as the browser sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    pub brand: Option<String>,
    pub sort: Option<String>,
    pub lang: Option<String>,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductSort {
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    Newest,
}

impl ProductSort {
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
        Self::Newest,
    ];

    /// Parse a query value. Unknown values use the default order.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("name-asc") => Self::NameAsc,
            Some("name-desc") => Self::NameDesc,
            Some("newest") => Self::Newest,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Featured",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
            Self::Newest => "Newest",
        }
    }
}

/// Normalized listing filters.
///
/// Every string is trimmed and dropped when empty. Colors are lower-cased
/// to match facet values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub page: u32,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub brand: Option<String>,
    pub sort: ProductSort,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn split_list(value: Option<&String>, lowercase: bool) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| {
                    if lowercase {
                        v.to_lowercase()
                    } else {
                        v.to_owned()
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

impl ProductFilters {
    #[must_use]
    pub fn from_query(query: &ProductQuery) -> Self {
        let page = PageRequest::parse(query.page.as_deref(), None, PRODUCTS_PAGE_SIZE).page;
        Self {
            page,
            search: non_empty(query.search.as_ref()),
            category: non_empty(query.category.as_ref()),
            min_price: non_empty(query.min_price.as_ref()),
            max_price: non_empty(query.max_price.as_ref()),
            colors: split_list(query.colors.as_ref(), true),
            sizes: split_list(query.sizes.as_ref(), false),
            brand: non_empty(query.brand.as_ref()),
            sort: ProductSort::from_query(query.sort.as_deref()),
        }
    }

    /// Minimum price converted to the base currency, if it parses.
    #[must_use]
    pub fn min_price_base(&self) -> Option<Decimal> {
        parse_amd(self.min_price.as_deref())
    }

    /// Maximum price converted to the base currency, if it parses.
    #[must_use]
    pub fn max_price_base(&self) -> Option<Decimal> {
        parse_amd(self.max_price.as_deref())
    }

    /// Whether any facet filter (not search or category) is applied.
    #[must_use]
    pub fn has_facet_filters(&self) -> bool {
        !self.colors.is_empty()
            || !self.sizes.is_empty()
            || self.brand.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    /// Hint shown under an empty listing.
    #[must_use]
    pub fn empty_hint(&self) -> &'static str {
        if self.search.is_some() {
            "Try searching with different keywords or adjust your filters."
        } else if self.has_facet_filters() {
            "Try adjusting your filters to see more results."
        } else {
            "Please make sure the API server is running and the database is seeded."
        }
    }

    /// One line per active filter, for the empty-state summary.
    #[must_use]
    pub fn active_filter_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(search) = &self.search {
            lines.push(format!("Search query: \"{search}\""));
        }
        if !self.colors.is_empty() {
            lines.push(format!("Colors: {}", self.colors.join(", ")));
        }
        if !self.sizes.is_empty() {
            lines.push(format!("Sizes: {}", self.sizes.join(", ")));
        }
        if let Some(brand) = &self.brand {
            lines.push(format!("Brand: {brand}"));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            lines.push(format!(
                "Price range: {} - {} AMD",
                self.min_price.as_deref().unwrap_or("0"),
                self.max_price.as_deref().unwrap_or("∞"),
            ));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Category: {category}"));
        }
        lines
    }

    /// `/products` URL for `page`, preserving every other filter.
    #[must_use]
    pub fn pagination_url(&self, page: u32) -> String {
        self.url_with(page, &self.colors, &self.sizes, self.brand.as_deref(), self.sort)
    }

    /// URL that adds or removes `color`, back on page 1.
    #[must_use]
    pub fn toggle_color_url(&self, color: &str) -> String {
        let colors = toggled(&self.colors, &color.to_lowercase());
        self.url_with(1, &colors, &self.sizes, self.brand.as_deref(), self.sort)
    }

    /// URL that adds or removes `size`, back on page 1.
    #[must_use]
    pub fn toggle_size_url(&self, size: &str) -> String {
        let sizes = toggled(&self.sizes, size);
        self.url_with(1, &self.colors, &sizes, self.brand.as_deref(), self.sort)
    }

    /// URL that selects `brand` (or clears it when already selected).
    #[must_use]
    pub fn toggle_brand_url(&self, brand: &str) -> String {
        let next = (self.brand.as_deref() != Some(brand)).then_some(brand);
        self.url_with(1, &self.colors, &self.sizes, next, self.sort)
    }

    /// URL with a different sort order, back on page 1.
    #[must_use]
    pub fn sort_url(&self, sort: ProductSort) -> String {
        self.url_with(1, &self.colors, &self.sizes, self.brand.as_deref(), sort)
    }

    fn url_with(
        &self,
        page: u32,
        colors: &[String],
        sizes: &[String],
        brand: Option<&str>,
        sort: ProductSort,
    ) -> String {
        let mut params: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(min) = &self.min_price {
            params.push(("minPrice", min.clone()));
        }
        if let Some(max) = &self.max_price {
            params.push(("maxPrice", max.clone()));
        }
        if !colors.is_empty() {
            params.push(("colors", colors.join(",")));
        }
        if !sizes.is_empty() {
            params.push(("sizes", sizes.join(",")));
        }
        if let Some(brand) = brand {
            params.push(("brand", brand.to_owned()));
        }
        if sort != ProductSort::Default {
            params.push(("sort", sort.as_query().to_owned()));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("/products?{query}")
    }

    #[must_use]
    pub fn is_color_selected(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }

    #[must_use]
    pub fn is_size_selected(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    #[must_use]
    pub fn is_brand_selected(&self, brand: &str) -> bool {
        self.brand.as_deref() == Some(brand)
    }
}

fn parse_amd(value: Option<&str>) -> Option<Decimal> {
    value
        .and_then(|v| v.parse::<Decimal>().ok())
        .filter(|v| !v.is_sign_negative())
        .map(|amd| convert(amd, Currency::AMD, Currency::BASE))
}

fn toggled(current: &[String], value: &str) -> Vec<String> {
    if current.iter().any(|v| v == value) {
        current.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(value.to_owned());
        next
    }
}

/// Brand reference embedded in listing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRef {
    pub id: BrandId,
    pub name: String,
}

/// Product as shown in a listing grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub image: Option<String>,
    pub in_stock: bool,
    pub brand: Option<BrandRef>,
}

impl ProductCard {
    /// Whether the card should show a struck-through original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price.is_some_and(|cmp| cmp > self.price)
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

/// Full product record for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub image: Option<String>,
    pub brand: Option<BrandRef>,
    pub category: Option<String>,
    pub variants: Vec<ProductVariant>,
}

impl ProductDetail {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.variants.iter().any(|v| v.stock > 0)
    }
}

/// A facet value with the number of matching products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: i64,
}

/// Brand facet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFacet {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    pub count: i64,
}

/// Price bounds of the current listing, in AMD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Sidebar facets for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFacets {
    pub price_range: PriceRange,
    pub colors: Vec<FacetCount>,
    pub sizes: Vec<FacetCount>,
    pub brands: Vec<BrandFacet>,
}
