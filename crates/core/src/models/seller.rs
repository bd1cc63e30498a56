//! Seller-side records: listings, messages, verification and traffic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, ProductId, ProductStatus, ShopId, VerificationId, VerificationStatus};

/// A listing owned by a seller, draft or published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProduct {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a seller submits when creating or editing a listing.
///
/// On edit, `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub materials: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// A seller's answer to a buyer message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReply {
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// A message from a buyer to a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerMessage {
    pub id: MessageId,
    pub shop_id: ShopId,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub replies: Vec<MessageReply>,
    pub sent_at: DateTime<Utc>,
}

/// A maker's request to get the verified badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: VerificationId,
    pub shop_id: ShopId,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Storefront traffic figures per shop, shipped as a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficStats {
    pub profile_views: u64,
    pub product_views: u64,
    /// Fraction of product views that ended in a purchase, 0..=1.
    pub conversion_rate: f64,
}
