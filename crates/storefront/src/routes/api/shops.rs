//! Maker shop API.

use axum::{Json, extract::State};
use papalote_core::ShopId;
use papalote_core::models::{Product, Shop};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiPath, ApiQuery, Envelope, ok};
use crate::catalog::empty_string_as_none;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopFilter {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub verified: Option<bool>,
}

impl ShopFilter {
    /// Case-insensitive state match and exact verified match.
    #[must_use]
    pub fn matches(&self, shop: &Shop) -> bool {
        let state_ok = self
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|s| shop.state.eq_ignore_ascii_case(s));
        let verified_ok = self.verified.is_none_or(|v| shop.verified == v);
        state_ok && verified_ok
    }
}

/// `GET /api/shops?state=&verified=`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ShopFilter>,
) -> Result<Json<Envelope<Vec<Shop>>>> {
    let shops = state
        .catalog()
        .shops()
        .iter()
        .filter(|shop| filter.matches(shop))
        .cloned()
        .collect();
    Ok(ok(shops))
}

/// A shop with its public products.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetail {
    pub shop: Shop,
    pub products: Vec<Product>,
}

/// `GET /api/shops/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<ShopDetail>>> {
    let id = ShopId::new(id);
    let shop = state
        .catalog()
        .shop(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Shop {id}")))?;
    Ok(ok(ShopDetail {
        products: state.catalog().products_by_shop(&id),
        shop,
    }))
}
