//! Integration tests for the server-rendered pages.

use axum::http::StatusCode;
use papalote_integration_tests::TestContext;

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_home_renders_with_security_headers() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Papalote Market"));
    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
    assert!(resp.header("content-security-policy").is_some());
    assert!(resp.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let mut ctx = TestContext::new();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc-123")
        .body(axum::body::Body::empty())
        .expect("Bad request");
    let resp = ctx.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("x-request-id"), Some("req-abc-123"));
}

#[tokio::test]
async fn test_static_assets_served() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/static/css/main.css").await;
    assert_eq!(resp.status, StatusCode::OK);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_product_listing_filters_by_category() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/products?category=Rebozos").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Rebozo de seda de Santa María"));
    assert!(!resp.body.contains("Alebrije Jaguar de copal"));
}

#[tokio::test]
async fn test_product_listing_ignores_bad_numbers() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/products?minPrice=&page=").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_detail() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/products/prod-2").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Alebrije Jaguar de copal"));
    assert!(resp.body.contains("Jacobo Martínez Ruiz"));
}

#[tokio::test]
async fn test_unknown_product_is_404_page() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/products/prod-missing").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(
        resp.header("content-type")
            .is_some_and(|ct| ct.starts_with("text/html"))
    );
}

#[tokio::test]
async fn test_shop_directory_and_profile() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/shops").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Barro Negro de San Bartolo"));

    let resp = ctx.get("/shops/shop-oaxaca-barro").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Cántaro de barro negro pulido"));

    let resp = ctx.get("/shops/shop-ghost").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Tools
// ============================================================================

#[tokio::test]
async fn test_pricing_calculator_page() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/pricing").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Oaxaca"));

    let resp = ctx
        .get("/pricing?materials=120&hours=4&hourly_rate=60&profit_margin=40&state=Oaxaca")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("504"));

    let resp = ctx.get("/pricing?materials=abc&hours=4&hourly_rate=60").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Materials must be a number"));
}

// ============================================================================
// Dashboards
// ============================================================================

#[tokio::test]
async fn test_seller_dashboard_pages() {
    let mut ctx = TestContext::new();

    for path in [
        "/seller/shop-oaxaca-barro",
        "/seller/shop-oaxaca-barro/orders",
        "/seller/shop-oaxaca-barro/orders?status=delivered",
        "/seller/shop-oaxaca-barro/products?status=draft",
        "/seller/shop-oaxaca-barro/analytics",
        "/seller/shop-oaxaca-barro/messages?unread=1",
    ] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status, StatusCode::OK, "{path}");
        assert!(resp.body.contains("Barro Negro de San Bartolo"), "{path}");
    }

    let resp = ctx.get("/seller/shop-ghost").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seller_ships_order_from_dashboard() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .post_form(
            "/seller/shop-oaxaca-barro/orders/ord-1002/status",
            &[("status", "shipped"), ("tracking_number", "MX999")],
        )
        .await;

    assert!(resp.status.is_redirection());
    assert_eq!(resp.location(), Some("/seller/shop-oaxaca-barro/orders"));

    let order = ctx
        .state
        .store()
        .order(&papalote_core::OrderId::new("ord-1002"))
        .expect("order exists");
    assert_eq!(order.status, papalote_core::OrderStatus::Shipped);
    assert_eq!(order.tracking_number.as_deref(), Some("MX999"));
}

#[tokio::test]
async fn test_seller_cannot_touch_other_shops_orders() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .post_form(
            "/seller/shop-jalisco-vidrio/orders/ord-1002/status",
            &[("status", "shipped")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seller_replies_to_message() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .post_form(
            "/seller/shop-oaxaca-barro/messages/msg-1/reply",
            &[("body", "Tarda de 3 a 5 días hábiles.")],
        )
        .await;
    assert!(resp.status.is_redirection());

    let shop = papalote_core::ShopId::new("shop-oaxaca-barro");
    let messages = ctx.state.store().messages_for_shop(&shop, false);
    let replied = messages
        .iter()
        .find(|m| m.id.as_str() == "msg-1")
        .expect("message exists");
    assert!(replied.read);
    assert_eq!(replied.replies.len(), 1);
}

#[tokio::test]
async fn test_buyer_pages() {
    let mut ctx = TestContext::new();

    for path in [
        "/buyer/buyer-ana",
        "/buyer/buyer-ana/orders",
        "/buyer/buyer-ana/favorites",
        "/buyer/buyer-ana/impact",
    ] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status, StatusCode::OK, "{path}");
        assert!(resp.body.contains("Ana López García"), "{path}");
    }

    let resp = ctx.get("/buyer/buyer-nobody").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
