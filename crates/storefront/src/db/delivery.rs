//! Delivery price lookup.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Delivery price for one city, in AMD.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DeliveryPrice {
    pub city: String,
    pub country: String,
    pub price: Decimal,
}

/// Repository for delivery prices.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up the price for `city` in `country`.
    ///
    /// Matching is trimmed and case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no price is configured.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_price(
        &self,
        city: &str,
        country: &str,
    ) -> Result<DeliveryPrice, RepositoryError> {
        sqlx::query_as::<_, DeliveryPrice>(
            r"
            SELECT city, country, price
            FROM shop.delivery_prices
            WHERE LOWER(city) = LOWER(TRIM($1)) AND LOWER(country) = LOWER(TRIM($2))
            ",
        )
        .bind(city)
        .bind(country)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
