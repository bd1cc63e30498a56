//! Integration tests for search and readiness.

use axum::http::StatusCode;
use papalote_integration_tests::TestContext;
use papalote_storefront::search::build_index;
use serde_json::{Value, json};

fn indexed() -> TestContext {
    let ctx = TestContext::new();
    build_index(ctx.state.search(), ctx.state.catalog()).expect("Failed to build index");
    ctx
}

fn products(body: &Value) -> Vec<Value> {
    body["data"]["products"]
        .as_array()
        .expect("products")
        .clone()
}

// ============================================================================
// Readiness
// ============================================================================

#[tokio::test]
async fn test_ready_only_after_index_build() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.get("/health").await.status, StatusCode::OK);
    assert_eq!(
        ctx.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );

    build_index(ctx.state.search(), ctx.state.catalog()).expect("Failed to build index");
    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_is_empty_while_building() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/api/search?q=barro").await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let body = resp.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["query"], json!("barro"));
    assert!(products(&body).is_empty());
    assert_eq!(body["data"]["totalCount"], json!(0));

    let resp = ctx.get("/search/suggest?q=barro").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("warming up"), "{}", resp.body);
}

// ============================================================================
// JSON search
// ============================================================================

#[tokio::test]
async fn test_search_envelope_and_shops() {
    let mut ctx = indexed();
    let resp = ctx.get("/api/search?q=barro%20negro").await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let body = resp.json();
    assert_eq!(body["success"], json!(true));
    let hits = products(&body);
    assert!(
        hits.iter()
            .any(|h| h["name"] == json!("Cántaro de barro negro pulido"))
    );
    assert!(hits.iter().all(|h| h["docType"] == json!("product")));
    let shops = body["data"]["shops"].as_array().expect("shops");
    assert!(shops.iter().any(|h| h["id"] == json!("shop-oaxaca-barro")));
}

#[tokio::test]
async fn test_search_filters_and_price_sort() {
    let mut ctx = indexed();
    let resp = ctx
        .get("/api/search?inStock=1&minPrice=200&maxPrice=1500&sort=price_asc&limit=50")
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let body = resp.json();
    let hits = products(&body);
    assert!(!hits.is_empty());
    let cents: Vec<u64> = hits
        .iter()
        .map(|h| h["priceCents"].as_u64().expect("priceCents"))
        .collect();
    assert!(cents.iter().all(|c| (20_000..=150_000).contains(c)));
    assert!(cents.windows(2).all(|w| w[0] <= w[1]));
    assert!(hits.iter().all(|h| h["available"] == json!(true)));
    assert_eq!(body["data"]["inStockCount"], body["data"]["totalCount"]);
}

#[tokio::test]
async fn test_price_descending_leads_with_priciest() {
    let mut ctx = indexed();
    let priciest = ctx
        .state
        .catalog()
        .all_products()
        .iter()
        .map(|p| p.money().cents())
        .max();

    let body = ctx.get("/api/search?sort=price_desc&limit=1").await.json();
    let hits = products(&body);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["priceCents"].as_u64(), priciest);
}

#[tokio::test]
async fn test_search_rejects_malformed_price() {
    let mut ctx = indexed();
    let resp = ctx.get("/api/search?minPrice=cheap").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.body);
    assert_eq!(resp.json()["success"], json!(false));
}

// ============================================================================
// Suggestions
// ============================================================================

#[tokio::test]
async fn test_suggest_fragment_lists_hits() {
    let mut ctx = indexed();
    let resp = ctx.get("/search/suggest?q=cantaro").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Cántaro de barro negro pulido"), "{}", resp.body);
    assert!(resp.body.contains("See all results"));
    assert!(!resp.body.contains("<html"));
}

#[tokio::test]
async fn test_suggest_blank_query_is_empty() {
    let mut ctx = indexed();
    let resp = ctx.get("/search/suggest?q=%20").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(!resp.body.contains("search-hit"));
}
