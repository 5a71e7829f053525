//! `/api/v1/admin/orders`

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use shop_core::order::OrderDetails;
use shop_core::{BulkOutcome, OrderId, OrderStatus, PageRequest, Paginated};

use crate::db::OrderRepository;
use crate::error::{ApiResult, AppError, ProblemInstance};
use crate::middleware::RequireAdminAuth;
use crate::models::{OrderRow, OrderUpdate};
use crate::routes::non_blank;
use crate::services::bulk;
use crate::state::AppState;

use super::{BulkDeleteRequest, ListQuery, json_body, path_id};

/// Default page size for the orders API.
const ORDERS_API_PAGE_SIZE: u32 = 20;

/// `GET /api/v1/admin/orders?page&limit&status&search`
///
/// # Errors
///
/// 400 for an unknown status filter.
#[instrument(skip(_admin, state, instance))]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Paginated<OrderRow>>> {
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        ORDERS_API_PAGE_SIZE,
    );
    let status = non_blank(query.status.as_deref())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()).at(&instance))?;

    let orders = OrderRepository::new(state.pool())
        .list(status, non_blank(query.search.as_deref()), page)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(orders))
}

/// `GET /api/v1/admin/orders/{id}`
#[instrument(skip(_admin, state, instance))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderDetails>> {
    let id: OrderId = path_id(&id, "Order", &instance)?;

    let order = OrderRepository::new(state.pool())
        .get(id)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(order))
}

/// `PUT /api/v1/admin/orders/{id}` with
/// `{ status?, paymentStatus?, fulfillmentStatus?, adminNotes? }`.
#[instrument(skip(_admin, state, instance, body))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(id): Path<String>,
    body: Result<Json<OrderUpdate>, JsonRejection>,
) -> ApiResult<Json<OrderDetails>> {
    let id: OrderId = path_id(&id, "Order", &instance)?;
    let update = json_body(body, &instance)?;

    let repo = OrderRepository::new(state.pool());
    let order = if update.is_empty() {
        repo.get(id).await
    } else {
        repo.update(id, &update).await
    }
    .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(order))
}

/// `DELETE /api/v1/admin/orders/{id}`
#[instrument(skip(_admin, state, instance))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: OrderId = path_id(&id, "Order", &instance)?;

    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/admin/orders/bulk-delete` with `{ ids: [...] }`.
#[instrument(skip_all)]
pub async fn bulk_delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    body: Result<Json<BulkDeleteRequest<OrderId>>, JsonRejection>,
) -> ApiResult<Json<BulkOutcome<OrderId>>> {
    let request = json_body(body, &instance)?;
    Ok(Json(bulk::delete_orders(state.pool(), &request.ids).await))
}
