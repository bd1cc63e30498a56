//! Marketplace records.
//!
//! These mirror the JSON fixtures field for field (camelCase on the wire).
//! Relationships are plain id references resolved by the storefront.

pub mod buyer;
pub mod order;
pub mod product;
pub mod seller;
pub mod shop;

pub use buyer::{Buyer, FavoriteProduct, ImpactSummary};
pub use order::{FREE_SHIPPING_THRESHOLD, CompleteOrder, CompleteOrderItem, Order, OrderItem, OrderTotals, ShippingAddress};
pub use product::{Product, Review};
pub use seller::{
    MessageReply, SellerMessage, SellerProduct, SellerProductInput, TrafficStats,
    VerificationRequest,
};
pub use shop::Shop;
