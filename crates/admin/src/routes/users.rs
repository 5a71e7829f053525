//! Users list page, block and admin toggles, bulk delete.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shop_core::{PageRequest, RoleFilter, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::{AdminUserRow, Flash};
use crate::routes::{Layout, PagerView, list_url, non_blank, render, selected_ids};
use crate::services::bulk;
use crate::state::AppState;

/// Users per page.
pub const USERS_PAGE_SIZE: u32 = 20;

/// Query parameters for the users list.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Role filter tab.
#[derive(Debug, Clone)]
pub struct RoleTab {
    pub label: &'static str,
    pub url: String,
    pub active: bool,
}

/// User row in the list table.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub orders_count: i64,
    pub roles: Vec<&'static str>,
    pub is_admin: bool,
    pub blocked: bool,
    pub created_at: String,
}

impl From<&AdminUserRow> for UserView {
    fn from(user: &AdminUserRow) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.display_name(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            orders_count: user.orders_count,
            roles: user.roles.iter().map(|r| r.label()).collect(),
            is_admin: user.is_admin(),
            blocked: user.blocked,
            created_at: user.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Users list page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub layout: Layout,
    pub users: Vec<UserView>,
    pub pager: PagerView,
    pub search: String,
    pub role: &'static str,
    pub role_tabs: Vec<RoleTab>,
    pub current_admin_id: String,
}

fn role_tabs(active: RoleFilter, search: &str) -> Vec<RoleTab> {
    [
        (RoleFilter::All, "All"),
        (RoleFilter::Admin, "Admins"),
        (RoleFilter::Customer, "Customers"),
    ]
    .into_iter()
    .map(|(filter, label)| RoleTab {
        label,
        url: list_url(
            "/admin/users",
            &[("search", search), ("role", filter.as_query())],
        ),
        active: filter == active,
    })
    .collect()
}

/// Users list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UsersQuery>,
) -> Result<Html<String>> {
    let page = PageRequest::parse(query.page.as_deref(), None, USERS_PAGE_SIZE);
    let role = RoleFilter::from_query(query.role.as_deref());
    let search = non_blank(query.search.as_deref()).unwrap_or_default().to_string();

    let users = UserRepository::new(state.pool())
        .list(Some(&search), role.role(), page)
        .await?;

    let pager = PagerView::new(&users.meta, |p| {
        list_url(
            "/admin/users",
            &[
                ("search", &search),
                ("role", role.as_query()),
                ("page", &p.to_string()),
            ],
        )
    });

    let template = UsersIndexTemplate {
        layout: Layout::new(&admin, "/admin/users", take_flash(&session).await),
        users: users.data.iter().map(UserView::from).collect(),
        pager,
        role: role.as_query(),
        role_tabs: role_tabs(role, &search),
        current_admin_id: admin.id.to_string(),
        search,
    };

    Ok(render(&template))
}

fn parse_user_id(id: &str) -> Result<UserId> {
    id.parse()
        .map_err(|_| AppError::NotFound("User not found".to_string()))
}

/// Flip the blocked flag.
#[instrument(skip(_admin, state, session))]
pub async fn toggle_blocked(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let user = UserRepository::new(state.pool())
        .toggle_blocked(parse_user_id(&id)?)
        .await?;

    tracing::info!(user_id = %user.id, blocked = user.blocked, "User block toggled");
    set_flash(&session, Flash::success(user.blocked_message())).await;

    Ok(Redirect::to("/admin/users"))
}

/// Whether `admin` may change the admin role of `target`.
fn check_admin_toggle(admin_id: UserId, target: &AdminUserRow) -> Result<()> {
    if target.id == admin_id && target.is_admin() {
        return Err(AppError::Forbidden(
            "You cannot remove your own admin role".to_string(),
        ));
    }
    Ok(())
}

/// Grant or revoke the admin role.
#[instrument(skip(admin, state, session))]
pub async fn toggle_admin(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let users = UserRepository::new(state.pool());
    let target = users.get(parse_user_id(&id)?).await?;

    if let Err(e) = check_admin_toggle(admin.id, &target) {
        set_flash(&session, Flash::error(e.public_message())).await;
        return Ok(Redirect::to("/admin/users"));
    }

    let grant = !target.is_admin();
    let roles = target.roles_with_admin(grant);
    let user = users.update(target.id, None, Some(roles.as_slice())).await?;

    tracing::info!(user_id = %user.id, admin = grant, "User admin role toggled");
    let message = if grant {
        format!("User \"{}\" is now an admin.", user.display_name())
    } else {
        format!("User \"{}\" is no longer an admin.", user.display_name())
    };
    set_flash(&session, Flash::success(message)).await;

    Ok(Redirect::to("/admin/users"))
}

/// Delete the checked users and report the tally.
#[instrument(skip_all)]
pub async fn bulk_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let ids: Vec<UserId> = selected_ids(&fields);
    if ids.is_empty() {
        return Redirect::to("/admin/users");
    }

    let outcome = bulk::delete_users(state.pool(), &ids).await;
    tracing::info!(admin = %admin.email, "{}", outcome.delete_message());

    let flash = if outcome.is_complete_success() {
        Flash::success(outcome.delete_message())
    } else {
        Flash::error(outcome.delete_message())
    };
    set_flash(&session, flash).await;

    Redirect::to("/admin/users")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shop_core::UserRole;

    use super::*;

    fn user(id: UserId, roles: Vec<UserRole>) -> AdminUserRow {
        AdminUserRow {
            id,
            email: Some("ani@shop.am".to_string()),
            phone: None,
            first_name: None,
            last_name: None,
            roles,
            blocked: false,
            orders_count: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cannot_remove_own_admin_role() {
        let me = UserId::generate();
        let err = check_admin_toggle(me, &user(me, vec![UserRole::Admin])).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_may_toggle_others() {
        let me = UserId::generate();
        let other = user(UserId::generate(), vec![UserRole::Admin]);
        assert!(check_admin_toggle(me, &other).is_ok());
    }

    #[test]
    fn test_role_tabs_keep_search() {
        let tabs = role_tabs(RoleFilter::Admin, "ani");
        assert_eq!(tabs.len(), 3);
        let admins = tabs.get(1).unwrap();
        assert_eq!(admins.url, "/admin/users?search=ani&role=admin");
        assert!(admins.active);
        assert_eq!(tabs.first().unwrap().url, "/admin/users?search=ani");
    }

    #[test]
    fn test_user_view_uses_labels() {
        let view = UserView::from(&user(UserId::generate(), vec![UserRole::Admin, UserRole::Customer]));
        assert_eq!(view.roles, vec!["Admin", "Customer"]);
        assert!(view.is_admin);
        assert_eq!(view.name, "ani@shop.am");
    }
}
