//! Catalog products and their reviews.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId, ReviewId, ShopId};

/// A product listed in the public catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub shop_id: ShopId,
    pub maker_name: String,
    /// Mexican state of origin, e.g. "Oaxaca".
    pub state: String,
    /// Price in MXN.
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    pub stock: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit can be bought.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Price as display money.
    #[must_use]
    pub const fn money(&self) -> Money {
        Money::mxn(self.price)
    }

    /// Whether the product is discounted against its compare-at price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price.is_some_and(|was| was > self.price)
    }

    /// First image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Case-insensitive match against name, description, maker and tags.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.maker_name.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// A buyer review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub author: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "prod-1",
            "name": "Alebrije Jaguar",
            "description": "Hand-carved copal wood",
            "category": "Alebrijes",
            "shopId": "shop-1",
            "makerName": "Jacobo Ángeles",
            "state": "Oaxaca",
            "price": 1850,
            "compareAtPrice": "2100.00",
            "stock": 3,
            "tags": ["Madera", "copal"],
            "createdAt": "2024-05-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserializes_fixture_shape() {
        let p = product();
        assert_eq!(p.id.as_str(), "prod-1");
        assert_eq!(p.price, Decimal::from(1850));
        assert!(p.images.is_empty());
        assert!(!p.featured);
    }

    #[test]
    fn test_on_sale_and_stock() {
        let mut p = product();
        assert!(p.on_sale());
        assert!(p.in_stock());
        p.stock = 0;
        p.compare_at_price = None;
        assert!(!p.on_sale());
        assert!(!p.in_stock());
    }

    #[test]
    fn test_matches_text_is_case_insensitive() {
        let p = product();
        assert!(p.matches_text("jaguar"));
        assert!(p.matches_text("madera"));
        assert!(p.matches_text("ángeles"));
        assert!(!p.matches_text("barro"));
    }
}
