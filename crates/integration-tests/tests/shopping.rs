//! Integration tests for session-backed shopping flows.
//!
//! Each `TestContext` is one visitor; its session cookie carries the cart,
//! the comparison list and recently viewed products between requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use papalote_core::models::OrderTotals;
use papalote_core::{OrderId, OrderStatus, PaymentStatus};
use papalote_integration_tests::TestContext;

const CHECKOUT_FIELDS: [(&str, &str); 8] = [
    ("full_name", "Lucía Hernández"),
    ("email", "lucia@example.mx"),
    ("street", "Av. Juárez 12"),
    ("city", "Puebla"),
    ("state", "Puebla"),
    ("postal_code", "72000"),
    ("phone", "222 123 4567"),
    ("payment_method", "oxxo"),
];

fn checkout_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    CHECKOUT_FIELDS
        .iter()
        .map(|&(key, value)| {
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map_or((key, value), |&(k, v)| (k, v))
        })
        .collect()
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_add_update_remove() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx
        .post_form("/cart/add", &[("product_id", "prod-5"), ("quantity", "2")])
        .await;
    assert!(resp.status.is_redirection());
    assert_eq!(resp.location(), Some("/cart"));

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Plato de talavera azul cobalto"));

    let resp = ctx.get("/cart/count").await;
    assert!(resp.body.contains(">2<"));

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "prod-5"), ("quantity", "0")])
        .await;
    assert!(resp.status.is_redirection());

    let resp = ctx.get("/cart/count").await;
    assert!(!resp.body.contains("badge"));
}

#[tokio::test]
async fn test_cart_caps_quantity_at_stock() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "prod-4"), ("quantity", "5")])
        .await;

    let resp = ctx.get("/cart/count").await;
    assert!(resp.body.contains(">1<"));
}

#[tokio::test]
async fn test_cart_rejects_unknown_and_sold_out() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .post_form("/cart/add", &[("product_id", "prod-missing")])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = ctx.post_form("/cart/add", &[("product_id", "prod-8")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_htmx_add_returns_count_fragment() {
    let mut ctx = TestContext::new();
    let request = Request::builder()
        .method("POST")
        .uri("/cart/add")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("hx-request", "true")
        .body(Body::from("product_id=prod-15&quantity=3"))
        .expect("Bad request");
    let resp = ctx.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains(">3<"));
}

#[tokio::test]
async fn test_sessions_are_per_visitor() {
    let mut ana = TestContext::new();
    ana.post_form("/cart/add", &[("product_id", "prod-5")]).await;

    let mut other = TestContext::new();
    let resp = other.get("/cart/count").await;
    assert!(!resp.body.contains("badge"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_empty_cart_checkout_redirects_to_cart() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/checkout").await;
    assert!(resp.status.is_redirection());
    assert_eq!(resp.location(), Some("/cart"));

    let resp = ctx.post_form("/checkout", &CHECKOUT_FIELDS).await;
    assert_eq!(resp.location(), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_shows_field_errors() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "prod-1")]).await;

    let fields = checkout_with(&[("postal_code", "720"), ("full_name", " ")]);
    let resp = ctx.post_form("/checkout", &fields).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.location().is_none());
    assert!(resp.body.contains("Postal code must be 5 digits"));
    assert!(resp.body.contains("is required"));

    // Cart survives a rejected submission
    let resp = ctx.get("/cart/count").await;
    assert!(resp.body.contains(">1<"));
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "prod-5"), ("quantity", "2")])
        .await;
    ctx.post_form("/cart/add", &[("product_id", "prod-15")]).await;

    let resp = ctx.get("/checkout").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Cash at OXXO"));

    let resp = ctx.post_form("/checkout", &CHECKOUT_FIELDS).await;
    assert!(resp.status.is_redirection(), "{}", resp.body);
    let location = resp.location().expect("redirect").to_string();
    assert!(location.starts_with("/orders/"));
    assert!(location.ends_with("/confirmation"));

    let resp = ctx.get(&location).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Plato de talavera azul cobalto"));
    assert!(resp.body.contains("lucia@example.mx"));

    let order_id = location
        .trim_start_matches("/orders/")
        .trim_end_matches("/confirmation");
    let order = ctx
        .state
        .store()
        .order(&OrderId::new(order_id))
        .expect("order stored");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.buyer_id.as_str(), "guest");
    assert_eq!(
        order.totals,
        OrderTotals::from_subtotal("1620".parse().expect("decimal"))
    );
    assert!(order.totals.shipping.is_zero());

    let resp = ctx.get("/cart/count").await;
    assert!(!resp.body.contains("badge"));
}

#[tokio::test]
async fn test_unknown_confirmation_is_404() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/orders/ord-nope/confirmation").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Compare and recently viewed
// ============================================================================

#[tokio::test]
async fn test_compare_holds_four_products() {
    let mut ctx = TestContext::new();

    for id in ["prod-1", "prod-2", "prod-3", "prod-4"] {
        let resp = ctx.post_form("/compare/add", &[("product_id", id)]).await;
        assert!(resp.status.is_redirection(), "{id}");
    }

    let resp = ctx.post_form("/compare/add", &[("product_id", "prod-5")]).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = ctx.get("/compare").await;
    assert!(resp.body.contains("Cántaro de barro negro pulido"));
    assert!(resp.body.contains("Huipil bordado de Zinacantán"));
    assert!(!resp.body.contains("Plato de talavera azul cobalto"));

    ctx.post_form("/compare/remove", &[("product_id", "prod-1")])
        .await;
    let resp = ctx.post_form("/compare/add", &[("product_id", "prod-5")]).await;
    assert!(resp.status.is_redirection());
}

#[tokio::test]
async fn test_recently_viewed_on_home() {
    let mut ctx = TestContext::new();
    ctx.get("/products/prod-13").await;

    let resp = ctx.get("/").await;
    assert!(resp.body.contains("recently-viewed"));
    assert!(resp.body.contains("Rebozo de algodón jaspeado"));
}
