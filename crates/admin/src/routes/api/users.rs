//! `/api/v1/admin/users`

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use shop_core::{BulkOutcome, PageRequest, Paginated, RoleFilter, UserId, UserRole};

use crate::db::UserRepository;
use crate::error::{ApiResult, AppError, ProblemInstance};
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminUserRow, UserUpdate};
use crate::routes::non_blank;
use crate::services::bulk;
use crate::state::AppState;

use super::{BulkDeleteRequest, ListQuery, json_body, path_id};

/// Default page size for the users API.
const USERS_API_PAGE_SIZE: u32 = 20;

/// `GET /api/v1/admin/users?page&limit&search&role`
#[instrument(skip(_admin, state, instance))]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Paginated<AdminUserRow>>> {
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        USERS_API_PAGE_SIZE,
    );
    let role = RoleFilter::from_query(query.role.as_deref()).role();

    let users = UserRepository::new(state.pool())
        .list(non_blank(query.search.as_deref()), role, page)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(Json(users))
}

/// `PUT /api/v1/admin/users/{id}` with `{ blocked?, roles? }`.
///
/// # Errors
///
/// 400 for unknown roles, 404 for unknown users.
#[instrument(skip(admin, state, instance, body))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(id): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<Json<AdminUserRow>> {
    let id: UserId = path_id(&id, "User", &instance)?;
    let update = json_body(body, &instance)?;
    let roles = update
        .parsed_roles()
        .map_err(|msg| AppError::BadRequest(msg).at(&instance))?;

    if id == admin.id
        && roles
            .as_ref()
            .is_some_and(|roles| !roles.contains(&UserRole::Admin))
    {
        return Err(
            AppError::Forbidden("You cannot remove your own admin role".to_string()).at(&instance),
        );
    }

    let user = UserRepository::new(state.pool())
        .update(id, update.blocked, roles.as_deref())
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    tracing::info!(user_id = %user.id, "User updated via API");
    Ok(Json(user))
}

/// `DELETE /api/v1/admin/users/{id}` (soft delete).
#[instrument(skip(_admin, state, instance))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: UserId = path_id(&id, "User", &instance)?;

    UserRepository::new(state.pool())
        .soft_delete(id)
        .await
        .map_err(|e| AppError::from(e).at(&instance))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/admin/users/bulk-delete` with `{ ids: [...] }`.
#[instrument(skip_all)]
pub async fn bulk_delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    instance: ProblemInstance,
    body: Result<Json<BulkDeleteRequest<UserId>>, JsonRejection>,
) -> ApiResult<Json<BulkOutcome<UserId>>> {
    let request = json_body(body, &instance)?;
    Ok(Json(bulk::delete_users(state.pool(), &request.ids).await))
}
