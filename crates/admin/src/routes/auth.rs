//! Login and logout.
//!
//! GET  /admin/login   - Login form
//! POST /admin/login   - Email + password sign-in
//! POST /admin/logout  - Drop the session

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::routes::render;
use crate::services::{AdminAuthService, AuthError};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub email: String,
}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Render the login page, or go to the dashboard when already signed in.
pub async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to("/admin").into_response();
    }
    render(&LoginTemplate {
        error: None,
        email: String::new(),
    })
    .into_response()
}

/// Sign in with email and password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let admin = match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            let status = if matches!(e, AuthError::Repository(_)) {
                tracing::error!(error = %e, "Admin login failed");
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                tracing::warn!(error = %e, "Admin login rejected");
                StatusCode::UNAUTHORIZED
            };
            let page = render(&LoginTemplate {
                error: Some(e.login_message()),
                email: form.email,
            });
            return (status, page).into_response();
        }
    };

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!(error = %e, "Failed to store admin session");
        let page = render(&LoginTemplate {
            error: Some("Sign-in failed, please try again"),
            email: form.email,
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, page).into_response();
    }

    set_sentry_user(&admin.id, Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "Admin signed in");
    Redirect::to("/admin").into_response()
}

/// Logout and clear session.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "Failed to clear admin session");
    }
    clear_sentry_user();
    Redirect::to("/admin/login")
}
