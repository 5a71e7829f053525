//! Shared helpers for the HTTP-level tests.
//!
//! # Running Tests
//!
//! The tests talk to running servers over HTTP and are `#[ignore]`d by
//! default:
//!
//! ```bash
//! shop-cli migrate && shop-cli seed seed/catalog.yaml --clear
//! shop-cli admin create -e "$ADMIN_TEST_EMAIL" -p "$ADMIN_TEST_PASSWORD"
//! cargo run -p shop-storefront & cargo run -p shop-admin &
//! cargo test -p shop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - default `http://localhost:3000`
//! - `ADMIN_BASE_URL` - default `http://localhost:3001`
//! - `ADMIN_TEST_EMAIL`, `ADMIN_TEST_PASSWORD` - an admin account

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use reqwest::{Client, Response, StatusCode, redirect};
use shop_core::ProblemDetails;

/// Storefront base URL without a trailing slash.
#[must_use]
pub fn storefront_url(path: &str) -> String {
    join(&env_or("STOREFRONT_BASE_URL", "http://localhost:3000"), path)
}

/// Admin base URL without a trailing slash.
#[must_use]
pub fn admin_url(path: &str) -> String {
    join(&env_or("ADMIN_BASE_URL", "http://localhost:3001"), path)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// Client with a cookie jar that does not follow redirects.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

/// Client signed in to the admin with `ADMIN_TEST_EMAIL`/`ADMIN_TEST_PASSWORD`.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_TEST_EMAIL").unwrap();
    let password = std::env::var("ADMIN_TEST_PASSWORD").unwrap();

    let client = client();
    let resp = client
        .post(admin_url("/admin/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "admin login failed");
    assert_eq!(location(&resp), Some("/admin"));
    client
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Assert a problem-details response and return its body.
pub async fn expect_problem(resp: Response, status: StatusCode) -> ProblemDetails {
    assert_eq!(resp.status(), status);
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/problem+json"),
        "unexpected content type {content_type}"
    );

    let problem: ProblemDetails = resp.json().await.unwrap();
    assert_eq!(problem.status, status.as_u16());
    problem
}
