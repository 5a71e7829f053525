//! Order detail page and status updates.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use shop_core::order::{OrderDetails, OrderSummary, needs_delivery_price};
use shop_core::{FulfillmentStatus, OrderId, OrderStatus, PaymentStatus};

use crate::db::{DeliveryRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::{Flash, OrderUpdate};
use crate::routes::{Layout, non_blank, render};
use crate::state::AppState;

use super::types::{OrderDetailView, OrderUpdateForm, ShippingView};

/// Order detail template.
#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
}

/// Look up the delivery price when the order has none recorded.
///
/// A failed lookup is logged and treated as "no price".
pub async fn delivery_price_for(state: &AppState, order: &OrderDetails) -> Option<Decimal> {
    if !needs_delivery_price(order) {
        return None;
    }
    let city = order.shipping_city()?;

    match DeliveryRepository::new(state.pool())
        .price_for(city, &state.config().delivery_country)
        .await
    {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(error = %e, city, "Delivery price lookup failed");
            None
        }
    }
}

/// Order detail page handler.
#[instrument(skip(admin, state, session))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::NotFound("Order not found".to_string()))?;

    let order = OrderRepository::new(state.pool()).get(id).await?;
    let delivery_price = delivery_price_for(&state, &order).await;
    let summary = OrderSummary::compute(&order, delivery_price);

    let template = OrderShowTemplate {
        layout: Layout::new(&admin, "/admin/orders", take_flash(&session).await),
        order: OrderDetailView::new(&order, &summary),
    };

    Ok(render(&template))
}

/// Parse an optional status select value.
fn parse_status<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<Option<T>> {
    non_blank(value)
        .map(|v| {
            v.parse()
                .map_err(|_| AppError::BadRequest(format!("Unknown {what}: {v}")))
        })
        .transpose()
}

impl TryFrom<OrderUpdateForm> for OrderUpdate {
    type Error = AppError;

    fn try_from(form: OrderUpdateForm) -> Result<Self> {
        Ok(Self {
            status: parse_status::<OrderStatus>(form.status.as_deref(), "order status")?,
            payment_status: parse_status::<PaymentStatus>(
                form.payment_status.as_deref(),
                "payment status",
            )?,
            fulfillment_status: parse_status::<FulfillmentStatus>(
                form.fulfillment_status.as_deref(),
                "fulfillment status",
            )?,
            admin_notes: form.admin_notes,
        })
    }
}

/// Update statuses and admin notes from the detail page form.
#[instrument(skip(_admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<OrderUpdateForm>,
) -> Result<Redirect> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::NotFound("Order not found".to_string()))?;
    let update = OrderUpdate::try_from(form)?;

    let order = OrderRepository::new(state.pool()).update(id, &update).await?;
    tracing::info!(order = %order.number, "Order updated");
    set_flash(&session, Flash::success(format!("Order {} updated.", order.number))).await;

    Ok(Redirect::to(&format!("/admin/orders/{id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_selects_leave_fields_alone() {
        let update = OrderUpdate::try_from(OrderUpdateForm {
            status: Some(String::new()),
            payment_status: Some("paid".to_string()),
            fulfillment_status: None,
            admin_notes: Some("call first".to_string()),
        })
        .unwrap();

        assert_eq!(update.status, None);
        assert_eq!(update.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(update.fulfillment_status, None);
        assert_eq!(update.admin_notes.as_deref(), Some("call first"));
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let err = OrderUpdate::try_from(OrderUpdateForm {
            status: Some("lost".to_string()),
            ..OrderUpdateForm::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
