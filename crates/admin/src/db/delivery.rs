//! Delivery price lookup for order summaries.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Repository for delivery prices.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Price in AMD for `city` in `country`, if one is configured.
    ///
    /// Matching is trimmed and case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn price_for(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let price = sqlx::query_scalar::<_, Decimal>(
            r"
            SELECT price
            FROM shop.delivery_prices
            WHERE LOWER(city) = LOWER(TRIM($1)) AND LOWER(country) = LOWER(TRIM($2))
            ",
        )
        .bind(city)
        .bind(country)
        .fetch_optional(self.pool)
        .await?;

        Ok(price)
    }
}
