//! Buyer records and derived summaries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BuyerId, Email, ProductId};

/// A registered buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: BuyerId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub city: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// A product saved by a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub buyer_id: BuyerId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// What a buyer's purchases meant for makers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub orders_placed: usize,
    pub items_purchased: u32,
    pub makers_supported: usize,
    pub states_reached: Vec<String>,
    /// Sum of item prices paid to makers (before shipping and tax).
    pub spent_with_makers: Decimal,
}
