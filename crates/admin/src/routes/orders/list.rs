//! Orders list page and bulk delete.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use shop_core::{OrderId, OrderStatus, PageRequest};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::routes::{Layout, PagerView, list_url, non_blank, render, selected_ids};
use crate::services::bulk;
use crate::state::AppState;

use super::types::{OrderListView, OrdersQuery, SelectOption, select_options};

/// Orders per page.
pub const ORDERS_PAGE_SIZE: u32 = 20;

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderListView>,
    pub pager: PagerView,
    pub search: String,
    pub status_options: Vec<SelectOption>,
}

/// Orders list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> Result<Html<String>> {
    let page = PageRequest::parse(query.page.as_deref(), None, ORDERS_PAGE_SIZE);
    let status = non_blank(query.status.as_deref()).and_then(|s| s.parse::<OrderStatus>().ok());
    let search = non_blank(query.search.as_deref()).unwrap_or_default().to_string();

    let orders = OrderRepository::new(state.pool())
        .list(status, Some(&search), page)
        .await?;

    let status_value = status.map_or("", OrderStatus::as_str);
    let pager = PagerView::new(&orders.meta, |p| {
        list_url(
            "/admin/orders",
            &[
                ("status", status_value),
                ("search", &search),
                ("page", &p.to_string()),
            ],
        )
    });

    let template = OrdersIndexTemplate {
        layout: Layout::new(&admin, "/admin/orders", take_flash(&session).await),
        orders: orders.data.iter().map(OrderListView::from).collect(),
        pager,
        status_options: select_options(
            OrderStatus::ALL,
            status,
            OrderStatus::as_str,
            OrderStatus::label,
        ),
        search,
    };

    Ok(render(&template))
}

/// Delete the checked orders and report the tally.
#[instrument(skip_all)]
pub async fn bulk_delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let ids: Vec<OrderId> = selected_ids(&fields);
    if ids.is_empty() {
        return Redirect::to("/admin/orders");
    }

    let outcome = bulk::delete_orders(state.pool(), &ids).await;
    let flash = if outcome.is_complete_success() {
        Flash::success(outcome.delete_message())
    } else {
        Flash::error(outcome.delete_message())
    };
    set_flash(&session, flash).await;

    Redirect::to("/admin/orders")
}
