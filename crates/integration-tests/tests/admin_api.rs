//! Admin JSON API against a running admin server.
//!
//! Needs an admin account in `ADMIN_TEST_EMAIL`/`ADMIN_TEST_PASSWORD`
//! (see `shop-cli admin create`). The tests only modify the signed-in admin
//! in ways that are rejected, and only delete ids that do not exist.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use shop_integration_tests::{admin_client, admin_url, client, expect_problem};
use uuid::Uuid;

async fn own_user_id(http: &Client) -> String {
    let email = std::env::var("ADMIN_TEST_EMAIL").unwrap();
    let resp = http
        .get(admin_url(&format!(
            "/api/v1/admin/users?role=admin&search={}",
            urlencoding::encode(&email)
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    body["data"][0]["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_without_session_is_401_problem() {
    let resp = client()
        .get(admin_url("/api/v1/admin/users"))
        .send()
        .await
        .unwrap();
    let problem = expect_problem(resp, StatusCode::UNAUTHORIZED).await;
    assert!(problem.instance.ends_with("/api/v1/admin/users"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_pages_without_session_redirect_to_login() {
    let resp = client().get(admin_url("/admin/users")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(shop_integration_tests::location(&resp), Some("/admin/login"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_wrong_password_rerenders_form() {
    let email = std::env::var("ADMIN_TEST_EMAIL").unwrap();
    let resp = client()
        .post(admin_url("/admin/login"))
        .form(&[("email", email.as_str()), ("password", "definitely-wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains("<form"));
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_users_list_shape_and_role_filter() {
    let http = admin_client().await;

    let resp = http
        .get(admin_url("/api/v1/admin/users?role=admin&limit=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["limit"], 5);
    let users = body["data"].as_array().unwrap();
    assert!(!users.is_empty());
    for user in users {
        let roles = user["roles"].as_array().unwrap();
        assert!(roles.contains(&json!("admin")));
        assert!(user["ordersCount"].is_number());
        assert!(user.get("passwordHash").is_none());
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_update_user_rejects_unknown_role() {
    let http = admin_client().await;
    let id = own_user_id(&http).await;

    let resp = http
        .put(admin_url(&format!("/api/v1/admin/users/{id}")))
        .json(&json!({ "roles": ["superuser"] }))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_cannot_remove_own_admin_role() {
    let http = admin_client().await;
    let id = own_user_id(&http).await;

    let resp = http
        .put(admin_url(&format!("/api/v1/admin/users/{id}")))
        .json(&json!({ "roles": ["customer"] }))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_unknown_user_is_404() {
    let http = admin_client().await;
    let url = admin_url(&format!("/api/v1/admin/users/{}", Uuid::new_v4()));

    let resp = http
        .put(&url)
        .json(&json!({ "blocked": true }))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;

    let resp = http.delete(&url).send().await.unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_bulk_delete_reports_failures() {
    let http = admin_client().await;
    let ids = [Uuid::new_v4(), Uuid::new_v4()];

    let resp = http
        .post(admin_url("/api/v1/admin/users/bulk-delete"))
        .json(&json!({ "ids": ids }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["succeeded"], 0);
    assert_eq!(body["failed"], 2);
    assert_eq!(body["failedIds"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_orders_list_and_status_filter() {
    let http = admin_client().await;

    let resp = http
        .get(admin_url("/api/v1/admin/orders?status=pending"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    for order in body["data"].as_array().unwrap() {
        assert_eq!(order["status"], "pending");
    }

    let resp = http
        .get(admin_url("/api/v1/admin/orders?status=lost"))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_unknown_order_is_404() {
    let http = admin_client().await;
    let url = admin_url(&format!("/api/v1/admin/orders/{}", Uuid::new_v4()));

    let resp = http.get(&url).send().await.unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;

    let resp = http
        .put(&url)
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;

    let resp = http.delete(&url).send().await.unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_malformed_body_is_400_problem() {
    let http = admin_client().await;

    let resp = http
        .post(admin_url("/api/v1/admin/orders/bulk-delete"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"ids\": 5}")
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::BAD_REQUEST).await;
}
