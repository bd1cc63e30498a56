//! Buyer profile API.

use axum::{Json, extract::State};
use papalote_core::models::{Buyer, CompleteOrder, ImpactSummary, Order};
use papalote_core::{BuyerId, OrderId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiPath, ApiQuery, Envelope, ok};
use crate::error::{AppError, Result, require};
use crate::services::buyer;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerParams {
    #[serde(default)]
    pub buyer_id: Option<String>,
}

impl BuyerParams {
    fn buyer_id(&self) -> Result<BuyerId> {
        Ok(BuyerId::new(
            require(self.buyer_id.as_deref(), "buyerId")?.trim(),
        ))
    }
}

/// `GET /api/buyer/orders?buyerId=`
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BuyerParams>,
) -> Result<Json<Envelope<Vec<Order>>>> {
    let buyer_id = params.buyer_id()?;
    Ok(ok(state.store().orders_for_buyer(&buyer_id)))
}

/// `GET /api/buyer/orders/{id}`
#[instrument(skip(state))]
pub async fn order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<CompleteOrder>>> {
    let id = OrderId::new(id);
    let order = state
        .store()
        .order(&id)
        .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
    Ok(ok(buyer::complete_order(order, state.catalog())))
}

/// `GET /api/buyer/impact?buyerId=`
#[instrument(skip(state))]
pub async fn impact(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BuyerParams>,
) -> Result<Json<Envelope<ImpactSummary>>> {
    let buyer_id = params.buyer_id()?;
    let orders = state.store().orders_for_buyer(&buyer_id);
    Ok(ok(buyer::impact(&orders, state.catalog())))
}

/// Buyer record with activity counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProfile {
    #[serde(flatten)]
    pub buyer: Buyer,
    pub order_count: usize,
    pub favorite_count: usize,
}

/// `GET /api/buyer/profile?buyerId=`
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BuyerParams>,
) -> Result<Json<Envelope<BuyerProfile>>> {
    let buyer_id = params.buyer_id()?;
    let buyer = state
        .catalog()
        .buyer(&buyer_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Buyer {buyer_id}")))?;
    Ok(ok(BuyerProfile {
        order_count: state.store().orders_for_buyer(&buyer_id).len(),
        favorite_count: state.store().favorites(&buyer_id).len(),
        buyer,
    }))
}
