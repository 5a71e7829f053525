//! Seed the catalog, blog and delivery prices from a YAML file.
//!
//! The file is parsed and validated in full before the database is touched;
//! rows are written in one transaction and upserted by their natural keys
//! (slug, SKU, country + city), so seeding twice is harmless.
//!
//! ```yaml
//! brands:
//!   - { slug: aurora, name: Aurora }
//! categories:
//!   - { slug: dresses, name: Dresses }
//! products:
//!   - slug: linen-dress
//!     brand: aurora
//!     category: dresses
//!     price: 49.90
//!     translations:
//!       en: { title: Linen dress }
//!     variants:
//!       - { sku: LD-RED-S, color: red, size: S, stock: 4 }
//! blog_posts:
//!   - slug: summer-care
//!     translations:
//!       en: { title: Caring for linen, content_html: "<p>...</p>" }
//! delivery_prices:
//!   - { city: Yerevan, price: 1000 }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use shop_admin::db;
use shop_core::Language;

use super::database_url;

/// Country used when a delivery price names none.
const DEFAULT_COUNTRY: &str = "Armenia";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{} validation errors found", .0.len())]
    Invalid(Vec<String>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// File Format
// =============================================================================

/// Top-level seed document. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedFile {
    pub brands: Vec<NamedSeed>,
    pub categories: Vec<NamedSeed>,
    pub products: Vec<ProductSeed>,
    pub blog_posts: Vec<BlogPostSeed>,
    pub delivery_prices: Vec<DeliveryPriceSeed>,
}

/// Brand or category.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedSeed {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    pub slug: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    /// USD.
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub published: bool,
    /// Keyed by language code.
    pub translations: BTreeMap<String, ProductTranslationSeed>,
    #[serde(default)]
    pub variants: Vec<VariantSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductTranslationSeed {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSeed {
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Defaults to the product price.
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogPostSeed {
    pub slug: String,
    pub featured_image: Option<String>,
    #[serde(default = "default_true")]
    pub published: bool,
    /// Defaults to the seeding time for published posts.
    pub published_at: Option<DateTime<Utc>>,
    pub translations: BTreeMap<String, BlogTranslationSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogTranslationSeed {
    pub title: String,
    pub excerpt: Option<String>,
    pub content_html: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryPriceSeed {
    pub city: String,
    pub country: Option<String>,
    /// AMD.
    pub price: Decimal,
}

impl DeliveryPriceSeed {
    fn country(&self) -> &str {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY)
    }
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Validation
// =============================================================================

/// Check a seed document, returning every problem found.
#[must_use]
pub fn validate(file: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    let brands = check_named(&file.brands, "brand", &mut errors);
    let categories = check_named(&file.categories, "category", &mut errors);

    let mut product_slugs = HashSet::new();
    let mut skus = HashSet::new();
    for product in &file.products {
        let at = format!("product '{}'", product.slug);
        check_slug(&product.slug, "product", &mut product_slugs, &mut errors);

        if let Some(brand) = &product.brand
            && !brands.contains(brand.as_str())
        {
            errors.push(format!("{at}: unknown brand '{brand}'"));
        }
        if let Some(category) = &product.category
            && !categories.contains(category.as_str())
        {
            errors.push(format!("{at}: unknown category '{category}'"));
        }
        if product.price.is_sign_negative() {
            errors.push(format!("{at}: price must not be negative"));
        }
        if product
            .compare_at_price
            .is_some_and(|p| p.is_sign_negative())
        {
            errors.push(format!("{at}: compare_at_price must not be negative"));
        }

        check_translations(&product.translations, &at, &mut errors, |t| &t.title);

        for variant in &product.variants {
            let sku = variant.sku.trim();
            if sku.is_empty() {
                errors.push(format!("{at}: variant with empty sku"));
            } else if !skus.insert(sku.to_string()) {
                errors.push(format!("{at}: duplicate sku '{sku}'"));
            }
            if variant.price.is_some_and(|p| p.is_sign_negative()) {
                errors.push(format!("{at}: variant '{sku}' price must not be negative"));
            }
            if variant.stock < 0 {
                errors.push(format!("{at}: variant '{sku}' stock must not be negative"));
            }
        }
    }

    let mut post_slugs = HashSet::new();
    for post in &file.blog_posts {
        let at = format!("blog post '{}'", post.slug);
        check_slug(&post.slug, "blog post", &mut post_slugs, &mut errors);
        check_translations(&post.translations, &at, &mut errors, |t| &t.title);
    }

    let mut cities = HashSet::new();
    for price in &file.delivery_prices {
        let city = price.city.trim();
        if city.is_empty() {
            errors.push("delivery price with empty city".to_string());
            continue;
        }
        let key = (price.country().to_lowercase(), city.to_lowercase());
        if !cities.insert(key) {
            errors.push(format!("duplicate delivery price for '{city}'"));
        }
        if price.price.is_sign_negative() {
            errors.push(format!("delivery price for '{city}' must not be negative"));
        }
    }

    errors
}

/// Check brands or categories; returns the known slugs.
fn check_named<'a>(items: &'a [NamedSeed], kind: &str, errors: &mut Vec<String>) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for item in items {
        if item.name.trim().is_empty() {
            errors.push(format!("{kind} '{}': empty name", item.slug));
        }
        if !is_valid_slug(&item.slug) {
            errors.push(format!("invalid {kind} slug '{}'", item.slug));
        } else if !seen.insert(item.slug.as_str()) {
            errors.push(format!("duplicate {kind} slug '{}'", item.slug));
        }
    }
    seen
}

fn check_slug(slug: &str, kind: &str, seen: &mut HashSet<String>, errors: &mut Vec<String>) {
    if !is_valid_slug(slug) {
        errors.push(format!("invalid {kind} slug '{slug}'"));
    } else if !seen.insert(slug.to_string()) {
        errors.push(format!("duplicate {kind} slug '{slug}'"));
    }
}

fn check_translations<T>(
    translations: &BTreeMap<String, T>,
    at: &str,
    errors: &mut Vec<String>,
    title: impl Fn(&T) -> &String,
) {
    if translations.is_empty() {
        errors.push(format!("{at}: at least one translation required"));
    }
    for (code, translation) in translations {
        if code.parse::<Language>().is_err() {
            errors.push(format!("{at}: unsupported language '{code}'"));
        }
        if title(translation).trim().is_empty() {
            errors.push(format!("{at}: empty title for '{code}'"));
        }
    }
}

/// Lowercase ASCII letters, digits and single inner hyphens.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

// =============================================================================
// Command
// =============================================================================

/// Counts of rows written.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub brands: usize,
    pub categories: usize,
    pub products: usize,
    pub variants: usize,
    pub blog_posts: usize,
    pub delivery_prices: usize,
}

/// Parse a seed document.
///
/// # Errors
///
/// Returns `SeedError::Yaml` for malformed input.
pub fn parse(content: &str) -> Result<SeedFile, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Seed from `file_path`, optionally clearing existing data first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation,
/// `DATABASE_URL` is unset, or a query fails. Nothing is written on error.
pub async fn run(file_path: &str, clear_existing: bool) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    tracing::info!(path = %file_path, "Loading seed file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.to_string(),
            source,
        })?;
    let file = parse(&content)?;

    let errors = validate(&file);
    if !errors.is_empty() {
        tracing::error!("Seed file validation failed:");
        for err in &errors {
            tracing::error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors));
    }
    tracing::info!("Seed file validated");

    let database_url = database_url().ok_or(SeedError::MissingEnvVar("DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;

    let summary = seed(&pool, &file, clear_existing).await?;

    tracing::info!(
        brands = summary.brands,
        categories = summary.categories,
        products = summary.products,
        variants = summary.variants,
        blog_posts = summary.blog_posts,
        delivery_prices = summary.delivery_prices,
        "Seeding complete"
    );
    Ok(())
}

/// Write a validated seed document in one transaction.
///
/// # Errors
///
/// Returns `SeedError::Database` if a query fails; the transaction is then
/// rolled back.
pub async fn seed(
    pool: &PgPool,
    file: &SeedFile,
    clear_existing: bool,
) -> Result<SeedSummary, SeedError> {
    let mut tx = pool.begin().await?;

    if clear_existing {
        tracing::info!("Clearing existing catalog, blog and delivery data");
        clear(&mut tx).await?;
    }

    let mut summary = SeedSummary::default();
    let mut brand_ids = BTreeMap::new();
    let mut category_ids = BTreeMap::new();

    for brand in &file.brands {
        let id = upsert_named(&mut tx, "brands", brand).await?;
        brand_ids.insert(brand.slug.as_str(), id);
        summary.brands += 1;
    }
    for category in &file.categories {
        let id = upsert_named(&mut tx, "categories", category).await?;
        category_ids.insert(category.slug.as_str(), id);
        summary.categories += 1;
    }

    for product in &file.products {
        let brand_id = product
            .brand
            .as_deref()
            .and_then(|slug| brand_ids.get(slug).copied());
        let category_id = product
            .category
            .as_deref()
            .and_then(|slug| category_ids.get(slug).copied());
        summary.variants += upsert_product(&mut tx, product, brand_id, category_id).await?;
        summary.products += 1;
    }

    for post in &file.blog_posts {
        upsert_blog_post(&mut tx, post).await?;
        summary.blog_posts += 1;
    }

    for price in &file.delivery_prices {
        sqlx::query(
            r"
            INSERT INTO shop.delivery_prices (city, country, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (LOWER(country), LOWER(city)) DO UPDATE SET price = EXCLUDED.price
            ",
        )
        .bind(price.city.trim())
        .bind(price.country())
        .bind(price.price)
        .execute(&mut *tx)
        .await?;
        summary.delivery_prices += 1;
    }

    tx.commit().await?;
    Ok(summary)
}

async fn clear(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    for table in [
        "shop.product_variants",
        "shop.product_translations",
        "shop.products",
        "shop.brands",
        "shop.categories",
        "shop.blog_post_translations",
        "shop.blog_posts",
        "shop.delivery_prices",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// `table` is one of the fixed names above, never user input.
async fn upsert_named(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    item: &NamedSeed,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(&format!(
        r"
        INSERT INTO shop.{table} (id, slug, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "
    ))
    .bind(Uuid::new_v4())
    .bind(&item.slug)
    .bind(item.name.trim())
    .fetch_one(&mut **tx)
    .await
}

/// Upsert a product with its translations and variants; returns the
/// variant count.
async fn upsert_product(
    tx: &mut Transaction<'_, Postgres>,
    product: &ProductSeed,
    brand_id: Option<Uuid>,
    category_id: Option<Uuid>,
) -> Result<usize, sqlx::Error> {
    let product_id: Uuid = sqlx::query_scalar(
        r"
        INSERT INTO shop.products
            (id, slug, brand_id, category_id, price, compare_at_price, image, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (slug) DO UPDATE SET
            brand_id = EXCLUDED.brand_id,
            category_id = EXCLUDED.category_id,
            price = EXCLUDED.price,
            compare_at_price = EXCLUDED.compare_at_price,
            image = EXCLUDED.image,
            published = EXCLUDED.published,
            updated_at = NOW()
        RETURNING id
        ",
    )
    .bind(Uuid::new_v4())
    .bind(&product.slug)
    .bind(brand_id)
    .bind(category_id)
    .bind(product.price)
    .bind(product.compare_at_price)
    .bind(&product.image)
    .bind(product.published)
    .fetch_one(&mut **tx)
    .await?;

    for (locale, translation) in &product.translations {
        sqlx::query(
            r"
            INSERT INTO shop.product_translations (product_id, locale, title, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id, locale) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description
            ",
        )
        .bind(product_id)
        .bind(locale)
        .bind(translation.title.trim())
        .bind(&translation.description)
        .execute(&mut **tx)
        .await?;
    }

    for variant in &product.variants {
        sqlx::query(
            r"
            INSERT INTO shop.product_variants (id, product_id, sku, color, size, price, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (sku) DO UPDATE SET
                product_id = EXCLUDED.product_id,
                color = EXCLUDED.color,
                size = EXCLUDED.size,
                price = EXCLUDED.price,
                stock = EXCLUDED.stock
            ",
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(variant.sku.trim())
        .bind(&variant.color)
        .bind(&variant.size)
        .bind(variant.price.unwrap_or(product.price))
        .bind(variant.stock)
        .execute(&mut **tx)
        .await?;
    }

    Ok(product.variants.len())
}

async fn upsert_blog_post(
    tx: &mut Transaction<'_, Postgres>,
    post: &BlogPostSeed,
) -> Result<(), sqlx::Error> {
    let published_at = post
        .published
        .then(|| post.published_at.unwrap_or_else(Utc::now));

    let post_id: Uuid = sqlx::query_scalar(
        r"
        INSERT INTO shop.blog_posts (id, slug, featured_image, published, published_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (slug) DO UPDATE SET
            featured_image = EXCLUDED.featured_image,
            published = EXCLUDED.published,
            published_at = COALESCE(shop.blog_posts.published_at, EXCLUDED.published_at),
            updated_at = NOW()
        RETURNING id
        ",
    )
    .bind(Uuid::new_v4())
    .bind(&post.slug)
    .bind(&post.featured_image)
    .bind(post.published)
    .bind(published_at)
    .fetch_one(&mut **tx)
    .await?;

    for (locale, translation) in &post.translations {
        sqlx::query(
            r"
            INSERT INTO shop.blog_post_translations (post_id, locale, title, excerpt, content_html)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (post_id, locale) DO UPDATE SET
                title = EXCLUDED.title,
                excerpt = EXCLUDED.excerpt,
                content_html = EXCLUDED.content_html
            ",
        )
        .bind(post_id)
        .bind(locale)
        .bind(translation.title.trim())
        .bind(&translation.excerpt)
        .bind(&translation.content_html)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
