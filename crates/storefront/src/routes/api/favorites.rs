//! Buyer favorites API.

use axum::{Json, extract::State, http::StatusCode};
use papalote_core::models::{FavoriteProduct, Product};
use papalote_core::{BuyerId, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiJson, ApiQuery, Envelope, created, ok};
use crate::error::{AppError, Result, require};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteParams {
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl FavoriteParams {
    fn buyer_id(&self) -> Result<BuyerId> {
        Ok(BuyerId::new(
            require(self.buyer_id.as_deref(), "buyerId")?.trim(),
        ))
    }

    fn product_id(&self) -> Result<ProductId> {
        Ok(ProductId::new(
            require(self.product_id.as_deref(), "productId")?.trim(),
        ))
    }
}

/// A favorite with its product resolved from the catalog.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    #[serde(flatten)]
    pub favorite: FavoriteProduct,
    pub product: Product,
}

/// `GET /api/favorites?buyerId=`
///
/// Favorites whose product left the catalog are omitted.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FavoriteParams>,
) -> Result<Json<Envelope<Vec<FavoriteView>>>> {
    let buyer_id = params.buyer_id()?;
    let views = state
        .store()
        .favorites(&buyer_id)
        .into_iter()
        .filter_map(|favorite| {
            let product = state.catalog().product(&favorite.product_id)?;
            Some(FavoriteView { favorite, product })
        })
        .collect();
    Ok(ok(views))
}

/// `POST /api/favorites` with `{buyerId, productId}`
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<FavoriteParams>,
) -> Result<(StatusCode, Json<Envelope<FavoriteProduct>>)> {
    let buyer_id = body.buyer_id()?;
    let product_id = body.product_id()?;
    if state.catalog().product(&product_id).is_none() {
        return Err(AppError::NotFound(format!("Product {product_id}")));
    }
    Ok(created(state.store().add_favorite(buyer_id, product_id)))
}

/// `DELETE /api/favorites?buyerId=&productId=`
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FavoriteParams>,
) -> Result<Json<Envelope<serde_json::Value>>> {
    let buyer_id = params.buyer_id()?;
    let product_id = params.product_id()?;
    state.store().remove_favorite(&buyer_id, &product_id)?;
    Ok(ok(serde_json::json!({ "removed": product_id })))
}
