//! Seller dashboard pages, scoped by the shop id in the path.
//!
//! Listing edits go through the JSON API. The order and message pages post
//! plain forms for status changes and replies.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use papalote_core::models::{
    Order, OrderItem, SellerMessage, SellerProduct, Shop, VerificationRequest,
};
use papalote_core::{MessageId, OrderId, OrderStatus, ProductStatus, ShopId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, PageResult, Result, add_breadcrumb};
use crate::filters;
use crate::services::analytics::SellerAnalytics;
use crate::state::AppState;

const RECENT_ORDERS: usize = 5;

fn known_shop(state: &AppState, id: String) -> Result<Shop> {
    let id = ShopId::new(id);
    state
        .catalog()
        .shop(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Shop {id}")))
}

fn analytics_for(state: &AppState, shop_id: &ShopId) -> SellerAnalytics {
    let orders = state.store().orders_for_shop(shop_id, None);
    SellerAnalytics::compute(shop_id, &orders, state.catalog().traffic(shop_id))
}

/// Status filter shared by the orders and products pages.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusFilter {
    fn parse<T: std::str::FromStr>(&self) -> Option<T> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.parse().ok())
    }
}

// =============================================================================
// Overview
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/overview.html")]
pub struct OverviewTemplate {
    pub shop: Shop,
    pub analytics: SellerAnalytics,
    pub recent_orders: Vec<Order>,
    pub unread_messages: usize,
    pub draft_count: usize,
    pub published_count: usize,
    pub verification: Option<VerificationRequest>,
}

#[instrument(skip(state))]
pub async fn overview(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> PageResult<OverviewTemplate> {
    let shop = known_shop(&state, shop_id)?;
    let store = state.store();

    let mut recent_orders = store.orders_for_shop(&shop.id, None);
    recent_orders.truncate(RECENT_ORDERS);

    let listings = store.listings_for_shop(&shop.id, None);
    let count = |status: ProductStatus| listings.iter().filter(|l| l.status == status).count();

    Ok(OverviewTemplate {
        analytics: analytics_for(&state, &shop.id),
        recent_orders,
        unread_messages: store.unread_count(&shop.id),
        draft_count: count(ProductStatus::Draft),
        published_count: count(ProductStatus::Published),
        verification: store.latest_verification(&shop.id),
        shop,
    })
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/orders.html")]
pub struct OrdersTemplate {
    pub shop: Shop,
    pub orders: Vec<Order>,
    pub selected_status: String,
    pub statuses: &'static [OrderStatus],
}

impl OrdersTemplate {
    /// The lines of `order` this shop sells.
    pub fn shop_items<'a>(&'a self, order: &'a Order) -> Vec<&'a OrderItem> {
        order.items_for_shop(&self.shop.id).collect()
    }
}

#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Query(filter): Query<StatusFilter>,
) -> PageResult<OrdersTemplate> {
    let shop = known_shop(&state, shop_id)?;
    let status = filter.parse::<OrderStatus>();
    Ok(OrdersTemplate {
        orders: state.store().orders_for_shop(&shop.id, status),
        selected_status: status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        statuses: OrderStatus::ALL,
        shop,
    })
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

/// Change an order's status from the orders page.
#[instrument(skip(state))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path((shop_id, order_id)): Path<(String, String)>,
    Form(form): Form<OrderStatusForm>,
) -> PageResult<Redirect> {
    let shop = known_shop(&state, shop_id)?;
    let order_id = OrderId::new(order_id);
    let order = state
        .store()
        .order(&order_id)
        .filter(|o| o.involves_shop(&shop.id))
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    add_breadcrumb(
        "seller",
        "Order status change",
        Some(&[("order_id", order.id.as_str()), ("status", form.status.as_str())]),
    );
    state
        .store()
        .update_order_status(&order.id, form.status, form.tracking_number)?;
    Ok(Redirect::to(&format!("/seller/{}/orders", shop.id)))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/products.html")]
pub struct ProductsTemplate {
    pub shop: Shop,
    pub listings: Vec<SellerProduct>,
    pub selected_status: String,
    pub statuses: &'static [ProductStatus],
}

#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Query(filter): Query<StatusFilter>,
) -> PageResult<ProductsTemplate> {
    let shop = known_shop(&state, shop_id)?;
    let status = filter.parse::<ProductStatus>();
    Ok(ProductsTemplate {
        listings: state.store().listings_for_shop(&shop.id, status),
        selected_status: status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        statuses: ProductStatus::ALL,
        shop,
    })
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/analytics.html")]
pub struct AnalyticsTemplate {
    pub shop: Shop,
    pub analytics: SellerAnalytics,
}

impl AnalyticsTemplate {
    /// Conversion rate as a percentage with one decimal.
    pub fn conversion_percent(&self) -> String {
        format!("{:.1}%", self.analytics.traffic.conversion_rate * 100.0)
    }
}

#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> PageResult<AnalyticsTemplate> {
    let shop = known_shop(&state, shop_id)?;
    Ok(AnalyticsTemplate {
        analytics: analytics_for(&state, &shop.id),
        shop,
    })
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/messages.html")]
pub struct MessagesTemplate {
    pub shop: Shop,
    pub messages: Vec<SellerMessage>,
    pub unread_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesFilter {
    #[serde(default)]
    pub unread: Option<String>,
}

#[instrument(skip(state))]
pub async fn messages(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Query(filter): Query<MessagesFilter>,
) -> PageResult<MessagesTemplate> {
    let shop = known_shop(&state, shop_id)?;
    let unread_only = matches!(filter.unread.as_deref(), Some("1" | "true"));
    Ok(MessagesTemplate {
        messages: state.store().messages_for_shop(&shop.id, unread_only),
        unread_only,
        shop,
    })
}

fn owned_message(state: &AppState, shop: &Shop, id: String) -> Result<MessageId> {
    let id = MessageId::new(id);
    let owned = state
        .store()
        .messages_for_shop(&shop.id, false)
        .iter()
        .any(|m| m.id == id);
    if !owned {
        return Err(AppError::NotFound(format!("Message {id}")));
    }
    Ok(id)
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    Path((shop_id, message_id)): Path<(String, String)>,
) -> PageResult<Redirect> {
    let shop = known_shop(&state, shop_id)?;
    let id = owned_message(&state, &shop, message_id)?;
    state.store().mark_message_read(&id)?;
    Ok(Redirect::to(&format!("/seller/{}/messages", shop.id)))
}

#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub body: String,
}

#[instrument(skip(state, form))]
pub async fn reply(
    State(state): State<AppState>,
    Path((shop_id, message_id)): Path<(String, String)>,
    Form(form): Form<ReplyForm>,
) -> PageResult<Redirect> {
    let shop = known_shop(&state, shop_id)?;
    let id = owned_message(&state, &shop, message_id)?;
    state.store().reply_to_message(&id, &form.body)?;
    Ok(Redirect::to(&format!("/seller/{}/messages", shop.id)))
}
