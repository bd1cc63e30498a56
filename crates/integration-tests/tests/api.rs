//! Integration tests for the JSON API.

use axum::http::{Method, StatusCode};
use papalote_integration_tests::{TestContext, TestResponse};
use serde_json::{Value, json};

fn assert_failure(resp: &TestResponse, status: StatusCode) -> Value {
    assert_eq!(resp.status, status, "{}", resp.body);
    let body = resp.json();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());
    body
}

fn decimal(value: &Value) -> f64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_f64())
        .expect("Not a decimal")
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_product_list_envelope_and_facets() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/products").await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert!(!data["items"].as_array().expect("items").is_empty());
    assert!(data["total"].as_u64().expect("total") >= 16);
    assert!(!data["categories"].as_array().expect("categories").is_empty());
    assert!(!data["states"].as_array().expect("states").is_empty());
}

#[tokio::test]
async fn test_product_list_filters() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/products?category=Barro&inStock=1&maxPrice=1000").await;

    assert_eq!(resp.status, StatusCode::OK);
    let items = resp.json()["data"]["items"].clone();
    let items = items.as_array().expect("items");
    assert!(!items.is_empty());
    for item in items {
        assert_eq!(item["category"], json!("Barro"));
        assert!(item["stock"].as_u64().expect("stock") > 0);
        assert!(decimal(&item["price"]) <= 1000.0);
    }
}

#[tokio::test]
async fn test_product_detail_includes_shop_and_reviews() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/products/prod-1").await;

    assert_eq!(resp.status, StatusCode::OK);
    let data = resp.json()["data"].clone();
    assert_eq!(data["product"]["id"], json!("prod-1"));
    assert_eq!(data["shop"]["id"], json!("shop-oaxaca-barro"));
    assert_eq!(data["reviews"].as_array().expect("reviews").len(), 3);
    assert!(
        data["related"]
            .as_array()
            .expect("related")
            .iter()
            .all(|p| p["id"] != json!("prod-1"))
    );
}

#[tokio::test]
async fn test_unknown_product_is_enveloped_404() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/products/prod-missing").await;
    assert_failure(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shop_filters() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/api/shops?state=oaxaca").await;
    assert_eq!(resp.status, StatusCode::OK);
    let shops = resp.json()["data"].clone();
    let shops = shops.as_array().expect("shops");
    assert_eq!(shops.len(), 2);
    assert!(shops.iter().all(|s| s["state"] == json!("Oaxaca")));

    let resp = ctx.get("/api/shops?verified=false").await;
    let shops = resp.json()["data"].clone();
    assert!(
        shops
            .as_array()
            .expect("shops")
            .iter()
            .all(|s| s["verified"] == json!(false))
    );
}

// ============================================================================
// Seller
// ============================================================================

#[tokio::test]
async fn test_listing_lifecycle_reaches_public_catalog() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .json(
            Method::POST,
            "/api/seller/products",
            Some(&json!({
                "sellerId": "shop-oaxaca-barro",
                "name": "Tecolote de barro negro",
                "category": "Barro",
                "price": "540.00",
                "stock": 3
            })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
    let listing = resp.json()["data"].clone();
    assert_eq!(listing["status"], json!("draft"));
    let id = listing["id"].as_str().expect("id").to_string();

    let resp = ctx.get(&format!("/api/products/{id}")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = ctx
        .json(Method::POST, &format!("/api/seller/products/{id}/publish"), None, None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx.get(&format!("/api/products/{id}")).await;
    assert_eq!(resp.status, StatusCode::OK);
    let product = resp.json()["data"]["product"].clone();
    assert_eq!(product["state"], json!("Oaxaca"));
    assert_eq!(product["makerName"], json!("Rosa Nieto Mateo"));

    let resp = ctx
        .json(Method::POST, &format!("/api/seller/products/{id}/unpublish"), None, None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = ctx.get(&format!("/api/products/{id}")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = ctx
        .json(Method::DELETE, &format!("/api/seller/products/{id}"), None, None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_listing_validation() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .json(
            Method::POST,
            "/api/seller/products",
            Some(&json!({ "sellerId": "shop-oaxaca-barro", "name": "Sin precio" })),
            None,
        )
        .await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);

    let resp = ctx
        .json(
            Method::POST,
            "/api/seller/products",
            Some(&json!({ "sellerId": "shop-ghost", "name": "Jarro", "price": "100" })),
            None,
        )
        .await;
    assert_failure(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_price_and_stock_are_bounded() {
    let mut ctx = TestContext::new();

    for body in [
        json!({
            "sellerId": "shop-oaxaca-barro",
            "name": "Jarro",
            "price": "50000000000000000000000000000",
            "stock": 5
        }),
        json!({
            "sellerId": "shop-oaxaca-barro",
            "name": "Jarro",
            "price": "100",
            "stock": 4_000_000_000_u32
        }),
    ] {
        let resp = ctx
            .json(Method::POST, "/api/seller/products", Some(&body), None)
            .await;
        assert_failure(&resp, StatusCode::BAD_REQUEST);
    }

    let resp = ctx
        .json(
            Method::PUT,
            "/api/seller/products/prod-202",
            Some(&json!({ "price": "50000000000000000000000000000" })),
            None,
        )
        .await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);

    // The published listing keeps its price and the cart still renders.
    ctx.post_form("/cart/add", &[("product_id", "prod-202"), ("quantity", "3")])
        .await;
    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Candelabro de barro negro"));
}

#[tokio::test]
async fn test_malformed_json_is_enveloped_400() {
    let mut ctx = TestContext::new();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/seller/products")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .expect("Bad request");
    let resp = ctx.send(request).await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_seller_orders_require_seller_id() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/api/seller/orders").await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);

    let resp = ctx
        .get("/api/seller/orders?sellerId=shop-oaxaca-barro&status=lost")
        .await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);

    let resp = ctx
        .get("/api/seller/orders?sellerId=shop-oaxaca-barro&status=delivered")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let orders = resp.json()["data"].clone();
    assert!(
        orders
            .as_array()
            .expect("orders")
            .iter()
            .all(|o| o["status"] == json!("delivered"))
    );
}

#[tokio::test]
async fn test_delivered_order_cannot_move_back() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .json(
            Method::PATCH,
            "/api/seller/orders/ord-1001",
            Some(&json!({ "status": "processing" })),
            None,
        )
        .await;
    assert_failure(&resp, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_messages_unread_and_mark_read() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .get("/api/seller/messages?sellerId=shop-oaxaca-barro&unread=true")
        .await;
    let unread = resp.json()["data"].as_array().expect("messages").len();
    assert!(unread >= 1);

    let resp = ctx
        .json(Method::PATCH, "/api/seller/messages/msg-1/read", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["data"]["read"], json!(true));

    let resp = ctx
        .get("/api/seller/messages?sellerId=shop-oaxaca-barro&unread=true")
        .await;
    assert_eq!(resp.json()["data"].as_array().expect("messages").len(), unread - 1);
}

#[tokio::test]
async fn test_verification_request_once_pending() {
    let mut ctx = TestContext::new();
    let body = json!({
        "sellerId": "shop-puebla-talavera",
        "documents": ["ine.pdf", "comprobante.pdf"],
        "notes": "Taller familiar desde 1980"
    });

    let resp = ctx
        .json(Method::POST, "/api/seller/verification", Some(&body), None)
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["data"]["status"], json!("pending"));

    let resp = ctx
        .json(Method::POST, "/api/seller/verification", Some(&body), None)
        .await;
    assert_failure(&resp, StatusCode::CONFLICT);

    let resp = ctx
        .get("/api/seller/verification?sellerId=shop-puebla-talavera")
        .await;
    assert_eq!(resp.json()["data"]["status"], json!("pending"));
}

// ============================================================================
// Buyer
// ============================================================================

#[tokio::test]
async fn test_buyer_orders_and_detail() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/api/buyer/orders?buyerId=buyer-ana").await;
    assert_eq!(resp.status, StatusCode::OK);
    let orders = resp.json()["data"].clone();
    assert!(
        orders
            .as_array()
            .expect("orders")
            .iter()
            .all(|o| o["buyerId"] == json!("buyer-ana"))
    );

    let resp = ctx.get("/api/buyer/orders/ord-1001").await;
    assert_eq!(resp.status, StatusCode::OK);
    let order = resp.json()["data"].clone();
    assert_eq!(order["id"], json!("ord-1001"));
    assert_eq!(order["lines"].as_array().expect("lines").len(), 2);
}

#[tokio::test]
async fn test_buyer_impact_skips_cancelled() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/buyer/impact?buyerId=buyer-ana").await;

    assert_eq!(resp.status, StatusCode::OK);
    let impact = resp.json()["data"].clone();
    assert_eq!(impact["ordersPlaced"], json!(2));
    assert!(impact["makersSupported"].as_u64().expect("makers") >= 2);
}

#[tokio::test]
async fn test_favorites_add_list_remove() {
    let mut ctx = TestContext::new();
    let body = json!({ "buyerId": "buyer-sofia", "productId": "prod-2" });

    let resp = ctx.json(Method::POST, "/api/favorites", Some(&body), None).await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = ctx.get("/api/favorites?buyerId=buyer-sofia").await;
    let favorites = resp.json()["data"].clone();
    assert_eq!(favorites[0]["productId"], json!("prod-2"));
    assert_eq!(favorites[0]["product"]["name"], json!("Alebrije Jaguar de copal"));

    let path = "/api/favorites?buyerId=buyer-sofia&productId=prod-2";
    let resp = ctx.json(Method::DELETE, path, None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = ctx.json(Method::DELETE, path, None, None).await;
    assert_failure(&resp, StatusCode::NOT_FOUND);
}

// ============================================================================
// Pricing
// ============================================================================

#[tokio::test]
async fn test_pricing_calculate() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .json(
            Method::POST,
            "/api/pricing/calculate",
            Some(&json!({
                "materials": "120",
                "hours": "4",
                "hourlyRate": "60",
                "profitMargin": "40",
                "state": "Oaxaca"
            })),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let calc = resp.json()["data"].clone();
    assert!((decimal(&calc["totalCost"]) - 360.0).abs() < f64::EPSILON);
    assert!((decimal(&calc["wholesalePrice"]) - 504.0).abs() < f64::EPSILON);
    assert_eq!(calc["wage"]["region"], json!("Oaxaca"));
    assert_eq!(calc["wage"]["level"], json!("fair_trade"));
}

#[tokio::test]
async fn test_pricing_requires_labor() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .json(
            Method::POST,
            "/api/pricing/calculate",
            Some(&json!({ "materials": "120", "profitMargin": "40" })),
            None,
        )
        .await;
    assert_failure(&resp, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pricing_rejects_oversized_amounts() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .json(
            Method::POST,
            "/api/pricing/calculate",
            Some(&json!({
                "materials": "50000000000000000000000000000",
                "labor": "50000000000000000000000000000",
                "profitMargin": 10
            })),
            None,
        )
        .await;
    let body = assert_failure(&resp, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("materials is too large"));
}

#[tokio::test]
async fn test_pricing_rates() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/api/pricing/rates").await;

    assert_eq!(resp.status, StatusCode::OK);
    let rates = resp.json()["data"].clone();
    assert!(rates["states"]["Oaxaca"]["livingWage"].is_string());
}
