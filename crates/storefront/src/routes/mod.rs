//! HTTP route handlers for the marketplace.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (search index built)
//!
//! # Catalog
//! GET  /products                      - Product listing with filters
//! GET  /products/{id}                 - Product detail (records recently viewed)
//! GET  /shops                         - Maker directory
//! GET  /shops/{id}                    - Shop profile
//! GET  /search                        - Search page
//! GET  /search/suggest                - Search suggestions (HTMX fragment)
//!
//! # Cart and checkout
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add to cart
//! POST /cart/update                   - Change a line quantity (0 removes)
//! POST /cart/remove                   - Remove a line
//! POST /cart/clear                    - Empty the cart
//! GET  /cart/count                    - Cart count badge (HTMX fragment)
//! GET  /checkout                      - Checkout form
//! POST /checkout                      - Place order
//! GET  /orders/{id}/confirmation      - Order confirmation
//!
//! # Compare
//! GET  /compare                       - Side-by-side comparison
//! POST /compare/add | /remove | /clear
//!
//! # Tools
//! GET  /pricing                       - Fair-trade pricing calculator
//!
//! # Seller dashboard
//! GET  /seller/{shopId}               - Overview
//! GET  /seller/{shopId}/orders | /products | /analytics | /messages
//! POST /seller/{shopId}/orders/{id}/status
//! POST /seller/{shopId}/messages/{id}/read | /reply
//!
//! # Buyer profile
//! GET  /buyer/{buyerId}               - Profile
//! GET  /buyer/{buyerId}/orders | /favorites | /impact
//!
//! # JSON API
//! /api/...                            - See [`api`]
//! ```

pub mod api;
pub mod buyer;
pub mod cart;
pub mod checkout;
pub mod compare;
pub mod health;
pub mod home;
pub mod pricing;
pub mod products;
pub mod search;
pub mod seller;
pub mod shops;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

fn compare_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(compare::show))
        .route("/add", post(compare::add))
        .route("/remove", post(compare::remove))
        .route("/clear", post(compare::clear))
}

fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::overview))
        .route("/orders", get(seller::orders))
        .route("/orders/{order_id}/status", post(seller::update_order_status))
        .route("/products", get(seller::products))
        .route("/analytics", get(seller::analytics))
        .route("/messages", get(seller::messages))
        .route("/messages/{message_id}/read", post(seller::mark_read))
        .route("/messages/{message_id}/reply", post(seller::reply))
}

fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(buyer::profile))
        .route("/orders", get(buyer::orders))
        .route("/favorites", get(buyer::favorites))
        .route("/impact", get(buyer::impact))
}

/// All routes for the marketplace.
///
/// `api_limit` wraps `/api` only. Pages and health checks are not limited.
pub fn routes(api_limit: Option<RateLimiterLayer>) -> Router<AppState> {
    let api = match api_limit {
        Some(layer) => api::routes().layer(layer),
        None => api::routes(),
    };

    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/shops", get(shops::index))
        .route("/shops/{id}", get(shops::show))
        .route("/search", get(search::search_page))
        .route("/search/suggest", get(search::suggest))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::form).post(checkout::submit))
        .route("/orders/{id}/confirmation", get(checkout::confirmation))
        .nest("/compare", compare_routes())
        .route("/pricing", get(pricing::calculator))
        .nest("/seller/{shop_id}", seller_routes())
        .nest("/buyer/{buyer_id}", buyer_routes())
        .nest("/api", api)
}
