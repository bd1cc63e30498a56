//! JSON API.
//!
//! Every handler answers with the envelope `{ "success": true, "data": ... }`
//! on success. Failures go through [`AppError`], which produces
//! `{ "success": false, "error": "..." }`.

pub mod buyer;
pub mod favorites;
pub mod maintenance;
pub mod pricing;
pub mod products;
pub mod seller;
pub mod shops;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub const fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// Wrap `data` in a success envelope with status 201.
pub const fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// JSON body extractor whose rejection is an enveloped 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejection is an enveloped 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor whose rejection is an enveloped 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Parse an optional status filter such as `?status=pending`.
///
/// # Errors
///
/// Returns `BadRequest` for an unknown label.
pub fn parse_status<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>().map_err(AppError::BadRequest))
        .transpose()
}

fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(seller::orders))
        .route("/orders/{id}", patch(seller::update_order))
        .route(
            "/products",
            get(seller::products).post(seller::create_product),
        )
        .route(
            "/products/{id}",
            put(seller::update_product).delete(seller::delete_product),
        )
        .route("/products/{id}/publish", post(seller::publish_product))
        .route("/products/{id}/unpublish", post(seller::unpublish_product))
        .route("/analytics", get(seller::analytics))
        .route("/messages", get(seller::messages))
        .route("/messages/{id}/read", patch(seller::mark_read))
        .route("/messages/{id}/reply", post(seller::reply))
        .route(
            "/verification",
            get(seller::verification).post(seller::submit_verification),
        )
}

fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(buyer::orders))
        .route("/orders/{id}", get(buyer::order))
        .route("/impact", get(buyer::impact))
        .route("/profile", get(buyer::profile))
}

/// All `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{id}", get(products::show))
        .route("/search", get(products::search))
        .route("/shops", get(shops::list))
        .route("/shops/{id}", get(shops::show))
        .nest("/seller", seller_routes())
        .nest("/buyer", buyer_routes())
        .route(
            "/favorites",
            get(favorites::list)
                .post(favorites::add)
                .delete(favorites::remove),
        )
        .route(
            "/maintenance",
            get(maintenance::status).post(maintenance::toggle),
        )
        .route("/pricing/calculate", post(pricing::calculate))
        .route("/pricing/rates", get(pricing::rates))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use papalote_core::OrderStatus;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status::<OrderStatus>(None).unwrap(), None);
        assert_eq!(parse_status::<OrderStatus>(Some("")).unwrap(), None);
        assert_eq!(
            parse_status::<OrderStatus>(Some("Shipped")).unwrap(),
            Some(OrderStatus::Shipped)
        );
        assert!(parse_status::<OrderStatus>(Some("lost")).is_err());
    }

    #[test]
    fn test_envelope_shape() {
        let Json(body) = ok(vec![1, 2]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2] }));
    }
}
