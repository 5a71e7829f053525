//! In-memory cache for catalog facets.
//!
//! Facet queries aggregate over the whole catalog and change only when the
//! catalog is edited, so results are kept for a short TTL.

use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use shop_core::catalog::ProductFacets;

use crate::db::RepositoryError;
use crate::db::products::{FacetScope, ProductRepository};

/// Cached facet results keyed by listing scope.
#[derive(Clone)]
pub struct CatalogCache {
    facets: Cache<FacetScope, ProductFacets>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let facets = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();
        Self { facets }
    }

    /// Facets for `scope`, loading them from the database on a miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the facet queries fail. Failures are not cached.
    #[instrument(skip(self, pool))]
    pub async fn facets(
        &self,
        pool: &PgPool,
        scope: FacetScope,
    ) -> Result<ProductFacets, RepositoryError> {
        if let Some(facets) = self.facets.get(&scope).await {
            debug!("Cache hit for facets");
            return Ok(facets);
        }

        let facets = ProductRepository::new(pool).facets(&scope).await?;
        self.facets.insert(scope, facets.clone()).await;
        Ok(facets)
    }
}
