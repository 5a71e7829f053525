//! Storefront JSON API against a running server with `seed/catalog.yaml`
//! loaded.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;
use shop_integration_tests::{client, expect_problem, storefront_url};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_products_list_shape() {
    let resp = client()
        .get(storefront_url("/api/v1/products?limit=2&lang=en"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let meta = &body["meta"];
    assert_eq!(meta["page"], 1);
    assert_eq!(meta["limit"], 2);
    assert!(meta["totalPages"].as_u64().unwrap() >= 1);
    assert!(body["data"].as_array().unwrap().len() <= 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_products_filter_by_category_and_color() {
    let resp = client()
        .get(storefront_url(
            "/api/v1/products?category=dresses&colors=RED&lang=en",
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["linen-summer-dress"]);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_search_treats_wildcards_literally() {
    let resp = client()
        .get(storefront_url("/api/v1/products?search=%25&lang=en"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["total"], 0);

    let resp = client()
        .get(storefront_url("/api/v1/products?search=linen&lang=en"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["meta"]["total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unpublished_products_hidden() {
    let resp = client()
        .get(storefront_url("/api/v1/products/archived-tote"))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_detail_translated() {
    let resp = client()
        .get(storefront_url("/api/v1/products/linen-summer-dress?lang=ru"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Летнее льняное платье");
    assert_eq!(body["data"]["variants"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_filters_facets() {
    let resp = client()
        .get(storefront_url("/api/v1/products/filters?category=knitwear"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert!(body["priceRange"]["min"].is_number() || body["priceRange"]["min"].is_string());
    let colors: Vec<&str> = body["colors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["value"].as_str())
        .collect();
    assert!(colors.contains(&"grey"));
    assert!(colors.contains(&"blue"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_blog_post_and_missing_post() {
    let http = client();

    let resp = http
        .get(storefront_url("/api/v1/blog/caring-for-linen?lang=en"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Caring for linen");

    let url = storefront_url("/api/v1/blog/autumn-knitwear-draft?lang=en");
    let resp = http.get(&url).send().await.unwrap();
    let problem = expect_problem(resp, StatusCode::NOT_FOUND).await;
    assert_eq!(problem.kind, "https://api.shop.am/problems/not-found");
    assert_eq!(problem.title, "Not Found");
    assert_eq!(problem.detail, "Blog post not found");
    assert!(problem.instance.ends_with("/api/v1/blog/autumn-knitwear-draft?lang=en"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_delivery_price_lookup() {
    let http = client();

    let resp = http
        .get(storefront_url("/api/v1/delivery/price?city=%20yerevan%20"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["currency"], "AMD");
    assert_eq!(body["city"], "Yerevan");

    let resp = http
        .get(storefront_url("/api/v1/delivery/price"))
        .send()
        .await
        .unwrap();
    let problem = expect_problem(resp, StatusCode::BAD_REQUEST).await;
    assert_eq!(problem.detail, "city is required");

    let resp = http
        .get(storefront_url("/api/v1/delivery/price?city=Atlantis"))
        .send()
        .await
        .unwrap();
    expect_problem(resp, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_language_preference_rejects_unknown_code() {
    let resp = client()
        .post(storefront_url("/preferences/language"))
        .form(&[("code", "de")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
