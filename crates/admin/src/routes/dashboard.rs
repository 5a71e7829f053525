//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{OrderRepository, UserRepository};
use crate::middleware::{RequireAdminAuth, take_flash};
use crate::routes::{Layout, render};
use crate::state::AppState;

/// Counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardMetrics {
    pub orders: i64,
    pub pending_orders: i64,
    pub users: i64,
    pub admins: i64,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub metrics: DashboardMetrics,
}

/// Dashboard page handler.
///
/// Count failures are logged and shown as zero.
#[instrument(skip(admin, state, session))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let orders_repo = OrderRepository::new(state.pool());
    let users_repo = UserRepository::new(state.pool());
    let (orders, users) = tokio::join!(orders_repo.counts(), users_repo.counts());

    let (orders, pending_orders) = orders.unwrap_or_else(|e| {
        tracing::error!("Failed to count orders: {e}");
        (0, 0)
    });
    let (users, admins) = users.unwrap_or_else(|e| {
        tracing::error!("Failed to count users: {e}");
        (0, 0)
    });

    let template = DashboardTemplate {
        layout: Layout::new(&admin, "/admin", take_flash(&session).await),
        metrics: DashboardMetrics {
            orders,
            pending_orders,
            users,
            admins,
        },
    };

    render(&template)
}
