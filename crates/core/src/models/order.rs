//! Orders placed at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    BuyerId, Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, ShopId,
    round_money,
};

/// Subtotal from which shipping is free (MXN).
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold (MXN).
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(150, 0, 0, false, 0);

/// Mexican IVA rate (16%).
pub const IVA_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// Unit price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

/// Money breakdown of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a subtotal.
    ///
    /// An empty cart (zero subtotal) pays no shipping. Shipping is free at or
    /// above [`FREE_SHIPPING_THRESHOLD`]. IVA applies to the subtotal only.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let subtotal = round_money(subtotal);
        let shipping = if subtotal.is_zero() || subtotal >= FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_FEE
        };
        let tax = round_money(subtotal.saturating_mul(IVA_RATE));
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
        }
    }

    /// Compute totals for order lines.
    #[must_use]
    pub fn from_items(items: &[OrderItem]) -> Self {
        Self::from_subtotal(
            items
                .iter()
                .map(OrderItem::line_total)
                .fold(Decimal::ZERO, Decimal::saturating_add),
        )
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: BuyerId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub contact_email: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(flatten)]
    pub totals: OrderTotals,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether any line belongs to the shop.
    #[must_use]
    pub fn involves_shop(&self, shop_id: &ShopId) -> bool {
        self.items.iter().any(|item| &item.shop_id == shop_id)
    }

    /// Lines sold by the shop.
    pub fn items_for_shop<'a>(&'a self, shop_id: &'a ShopId) -> impl Iterator<Item = &'a OrderItem> {
        self.items.iter().filter(move |item| &item.shop_id == shop_id)
    }

    /// Total number of units.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |units, item| units.saturating_add(item.quantity))
    }

    /// Order total as display money.
    #[must_use]
    pub const fn total_money(&self) -> Money {
        Money::mxn(self.totals.total)
    }
}

/// An order line with its product resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderItem {
    #[serde(flatten)]
    pub item: OrderItem,
    pub line_total: Decimal,
    pub image: Option<String>,
    pub maker_name: Option<String>,
    pub shop_name: Option<String>,
}

/// The detailed order view returned to buyers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrder {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<CompleteOrderItem>,
}
