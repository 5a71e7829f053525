//! Delivery price API handler.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shop_core::Currency;

use crate::db::{DeliveryRepository, RepositoryError};
use crate::error::{ApiResult, AppError, ProblemInstance};
use crate::state::AppState;

/// Delivery price query.
#[derive(Debug, Deserialize)]
pub struct DeliveryPriceQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Delivery price response. Prices are always in AMD.
#[derive(Debug, Serialize)]
pub struct DeliveryPriceResponse {
    pub price: Decimal,
    pub currency: Currency,
    pub city: String,
    pub country: String,
}

/// `GET /api/v1/delivery/price?city=&country=`
///
/// `country` defaults to the configured delivery country.
///
/// # Errors
///
/// Returns a 400 problem without `city`, a 404 problem for unknown cities
/// and a 500 problem on query failure.
#[instrument(skip(state, instance))]
pub async fn price(
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<DeliveryPriceQuery>,
) -> ApiResult<Json<DeliveryPriceResponse>> {
    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("city is required".to_string()).at(&instance))?;
    let country = query
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.config().delivery_country);

    let found = DeliveryRepository::new(state.pool())
        .find_price(city, country)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("No delivery price for {city}, {country}"))
            }
            other => AppError::from(other),
        })
        .map_err(|e| e.at(&instance))?;

    Ok(Json(DeliveryPriceResponse {
        price: found.price,
        currency: Currency::AMD,
        city: found.city,
        country: found.country,
    }))
}
