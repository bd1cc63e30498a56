//! Seller dashboard API.
//!
//! Every collection endpoint is scoped by `?sellerId=` (the shop id).

use axum::{Json, extract::State, http::StatusCode};
use papalote_core::models::{
    Order, SellerMessage, SellerProduct, SellerProductInput, VerificationRequest,
};
use papalote_core::{MessageId, OrderId, OrderStatus, ProductId, ProductStatus, ShopId};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiJson, ApiPath, ApiQuery, Envelope, created, ok, parse_status};
use crate::error::{AppError, Result, add_breadcrumb, require};
use crate::services::analytics::SellerAnalytics;
use crate::state::AppState;
use crate::store::NewListing;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerParams {
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub unread: Option<String>,
}

impl SellerParams {
    /// The required, known shop.
    fn shop_id(&self, state: &AppState) -> Result<ShopId> {
        let id = ShopId::new(require(self.seller_id.as_deref(), "sellerId")?.trim());
        if state.catalog().shop(&id).is_none() {
            return Err(AppError::NotFound(format!("Shop {id}")));
        }
        Ok(id)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// `GET /api/seller/orders?sellerId=&status=`
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SellerParams>,
) -> Result<Json<Envelope<Vec<Order>>>> {
    let shop_id = params.shop_id(&state)?;
    let status = parse_status::<OrderStatus>(params.status.as_deref())?;
    Ok(ok(state.store().orders_for_shop(&shop_id, status)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

/// `PATCH /api/seller/orders/{id}`
#[instrument(skip(state, body))]
pub async fn update_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<OrderUpdate>,
) -> Result<Json<Envelope<Order>>> {
    let id = OrderId::new(id);
    add_breadcrumb(
        "seller",
        "Order status change",
        Some(&[("order_id", id.as_str()), ("status", body.status.as_str())]),
    );
    let order = state
        .store()
        .update_order_status(&id, body.status, body.tracking_number)?;
    Ok(ok(order))
}

// =============================================================================
// Products
// =============================================================================

/// `GET /api/seller/products?sellerId=&status=`
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SellerParams>,
) -> Result<Json<Envelope<Vec<SellerProduct>>>> {
    let shop_id = params.shop_id(&state)?;
    let status = parse_status::<ProductStatus>(params.status.as_deref())?;
    Ok(ok(state.store().listings_for_shop(&shop_id, status)))
}

/// `POST /api/seller/products`
#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewListing>,
) -> Result<(StatusCode, Json<Envelope<SellerProduct>>)> {
    if state.catalog().shop(&body.seller_id).is_none() {
        return Err(AppError::NotFound(format!("Shop {}", body.seller_id)));
    }
    let listing = state.store().create_listing(body)?;
    Ok(created(listing))
}

/// `PUT /api/seller/products/{id}`
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<SellerProductInput>,
) -> Result<Json<Envelope<SellerProduct>>> {
    let listing = state.store().update_listing(&ProductId::new(id), body)?;
    if listing.status == ProductStatus::Published {
        state.refresh_listings();
    }
    Ok(ok(listing))
}

fn change_status(
    state: &AppState,
    id: String,
    status: ProductStatus,
) -> Result<Json<Envelope<SellerProduct>>> {
    let listing = state
        .store()
        .set_listing_status(&ProductId::new(id), status)?;
    state.refresh_listings();
    Ok(ok(listing))
}

/// `POST /api/seller/products/{id}/publish`
#[instrument(skip(state))]
pub async fn publish_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<SellerProduct>>> {
    change_status(&state, id, ProductStatus::Published)
}

/// `POST /api/seller/products/{id}/unpublish`
#[instrument(skip(state))]
pub async fn unpublish_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<SellerProduct>>> {
    change_status(&state, id, ProductStatus::Draft)
}

/// `DELETE /api/seller/products/{id}`
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<SellerProduct>>> {
    let listing = state.store().delete_listing(&ProductId::new(id))?;
    if listing.status == ProductStatus::Published {
        state.refresh_listings();
    }
    Ok(ok(listing))
}

// =============================================================================
// Analytics
// =============================================================================

/// `GET /api/seller/analytics?sellerId=`
#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SellerParams>,
) -> Result<Json<Envelope<SellerAnalytics>>> {
    let shop_id = params.shop_id(&state)?;
    let orders = state.store().orders_for_shop(&shop_id, None);
    let traffic = state.catalog().traffic(&shop_id);
    Ok(ok(SellerAnalytics::compute(&shop_id, &orders, traffic)))
}

// =============================================================================
// Messages
// =============================================================================

/// `GET /api/seller/messages?sellerId=&unread=`
#[instrument(skip(state))]
pub async fn messages(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SellerParams>,
) -> Result<Json<Envelope<Vec<SellerMessage>>>> {
    let shop_id = params.shop_id(&state)?;
    let unread_only = params
        .unread
        .as_deref()
        .is_some_and(|v| matches!(v, "1" | "true"));
    Ok(ok(state.store().messages_for_shop(&shop_id, unread_only)))
}

/// `PATCH /api/seller/messages/{id}/read`
#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<SellerMessage>>> {
    Ok(ok(state.store().mark_message_read(&MessageId::new(id))?))
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    #[serde(default)]
    pub body: String,
}

/// `POST /api/seller/messages/{id}/reply`
#[instrument(skip(state, reply))]
pub async fn reply(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(reply): ApiJson<ReplyBody>,
) -> Result<(StatusCode, Json<Envelope<SellerMessage>>)> {
    let message = state
        .store()
        .reply_to_message(&MessageId::new(id), &reply.body)?;
    Ok(created(message))
}

// =============================================================================
// Verification
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationBody {
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// `GET /api/seller/verification?sellerId=`
///
/// `data` is `null` when the shop never applied.
#[instrument(skip(state))]
pub async fn verification(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SellerParams>,
) -> Result<Json<Envelope<Option<VerificationRequest>>>> {
    let shop_id = params.shop_id(&state)?;
    Ok(ok(state.store().latest_verification(&shop_id)))
}

/// `POST /api/seller/verification`
#[instrument(skip(state, body))]
pub async fn submit_verification(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerificationBody>,
) -> Result<(StatusCode, Json<Envelope<VerificationRequest>>)> {
    let params = SellerParams {
        seller_id: body.seller_id,
        ..SellerParams::default()
    };
    let shop_id = params.shop_id(&state)?;
    let request = state
        .store()
        .submit_verification(shop_id, body.documents, body.notes)?;
    Ok(created(request))
}
