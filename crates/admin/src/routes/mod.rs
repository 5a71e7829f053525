//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /admin/login                        - Login page
//! POST /admin/login                        - Email + password sign-in
//! POST /admin/logout                       - Logout
//!
//! # Pages
//! GET  /admin                              - Dashboard
//! GET  /admin/orders                       - Order list (status, search, page)
//! POST /admin/orders/bulk-delete           - Delete selected orders
//! GET  /admin/orders/{id}                  - Order detail
//! POST /admin/orders/{id}                  - Update statuses and notes
//! GET  /admin/users                        - User list (search, role, page)
//! POST /admin/users/bulk-delete            - Delete selected users
//! POST /admin/users/{id}/toggle-blocked    - Block or unblock
//! POST /admin/users/{id}/toggle-admin      - Grant or revoke admin
//!
//! # JSON API
//! /api/v1/admin/...                        - See `api`
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod users;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use urlencoding::encode;

use shop_core::PageMeta;

use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin", get(dashboard::dashboard))
        .route("/admin/orders", get(orders::index))
        .route("/admin/orders/bulk-delete", post(orders::bulk_delete))
        .route("/admin/orders/{id}", get(orders::show).post(orders::update))
        .route("/admin/users", get(users::index))
        .route("/admin/users/bulk-delete", post(users::bulk_delete))
        .route(
            "/admin/users/{id}/toggle-blocked",
            post(users::toggle_blocked),
        )
        .route("/admin/users/{id}/toggle-admin", post(users::toggle_admin))
        .nest("/api/v1/admin", api::routes())
}

// =============================================================================
// Shared Views
// =============================================================================

/// Signed-in admin shown in the header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Chrome shared by every signed-in page.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub flash: Option<Flash>,
}

impl Layout {
    #[must_use]
    pub fn new(admin: &CurrentAdmin, current_path: &'static str, flash: Option<Flash>) -> Self {
        Self {
            admin_user: AdminUserView::from(admin),
            current_path,
            flash,
        }
    }

    /// Whether the nav entry for `path` is the current section.
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }
}

/// Pager under a list table.
#[derive(Debug, Clone)]
pub struct PagerView {
    pub show: bool,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PagerView {
    /// `url_for` maps a page number to its URL with the other filters kept.
    pub fn new(meta: &PageMeta, url_for: impl Fn(u32) -> String) -> Self {
        Self {
            show: meta.show_controls(),
            page: meta.page,
            total_pages: meta.total_pages,
            total: meta.total,
            previous_url: meta.has_previous().then(|| url_for(meta.previous())),
            next_url: meta.has_next().then(|| url_for(meta.next())),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Render a template, logging failures.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Build `path?k=v&...`, skipping blank values.
#[must_use]
pub fn list_url(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{key}={}", encode(value.trim())))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Ids from repeated `ids` fields of a checkbox form.
///
/// Values that do not parse are dropped.
pub fn selected_ids<Id: std::str::FromStr>(fields: &[(String, String)]) -> Vec<Id> {
    fields
        .iter()
        .filter(|(key, _)| key == "ids")
        .filter_map(|(_, value)| value.trim().parse().ok())
        .collect()
}

/// `2025-01-15 14:30` in UTC.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Blank query values count as absent.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shop_core::{PageRequest, UserId};

    use super::*;

    #[test]
    fn test_list_url_keeps_filters_and_encodes() {
        assert_eq!(
            list_url("/admin/users", &[("search", "ani p"), ("role", ""), ("page", "2")]),
            "/admin/users?search=ani%20p&page=2"
        );
        assert_eq!(list_url("/admin/users", &[("role", " ")]), "/admin/users");
    }

    #[test]
    fn test_selected_ids_skips_other_fields_and_garbage() {
        let id = UserId::generate();
        let fields = vec![
            ("ids".to_string(), id.to_string()),
            ("ids".to_string(), "nope".to_string()),
            ("confirm".to_string(), "1".to_string()),
        ];
        assert_eq!(selected_ids::<UserId>(&fields), vec![id]);
    }

    #[test]
    fn test_pager_only_shown_with_several_pages() {
        let single = PageMeta::new(5, PageRequest::parse(None, None, 20));
        assert!(!PagerView::new(&single, |p| p.to_string()).show);

        let meta = PageMeta::new(45, PageRequest::parse(Some("2"), None, 20));
        let pager = PagerView::new(&meta, |p| format!("/admin/users?page={p}"));
        assert!(pager.show);
        assert_eq!(pager.total, 45);
        assert_eq!(pager.previous_url.as_deref(), Some("/admin/users?page=1"));
        assert_eq!(pager.next_url.as_deref(), Some("/admin/users?page=3"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
    }
}
