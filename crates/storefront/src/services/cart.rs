//! Session cart.
//!
//! Lines are keyed by product id. Prices are never stored: every view
//! re-reads the catalog so totals follow current prices.

use papalote_core::models::{OrderTotals, Product};
use papalote_core::{Money, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tower_sessions::Session;

use crate::catalog::Catalog;
use crate::models::{CartLine, session_keys};

/// Cart operation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Product {0} not found")]
    UnknownProduct(ProductId),
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Load the cart from the session, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns the session error if the store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let lines = session
            .get::<Vec<CartLine>>(session_keys::CART)
            .await?
            .unwrap_or_default();
        Ok(Self { lines })
    }

    /// Persist the cart to the session.
    ///
    /// # Errors
    ///
    /// Returns the session error if the store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, &self.lines).await
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, l| count.saturating_add(l.quantity))
    }

    /// Add units of a product, merging with an existing line. The resulting
    /// quantity is capped at the product's stock.
    ///
    /// # Errors
    ///
    /// `ZeroQuantity` for a zero quantity, `OutOfStock` when the product has
    /// no stock.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity).min(product.stock);
            return Ok(line.quantity);
        }

        let quantity = quantity.min(product.stock);
        self.lines.push(CartLine {
            product_id: product.id.clone(),
            quantity,
        });
        Ok(quantity)
    }

    /// Set a line's quantity, capped at stock. Zero removes the line.
    ///
    /// # Errors
    ///
    /// `NotInCart` when the product has no line, `OutOfStock` when the
    /// product has sold out since it was added.
    pub fn update(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            self.remove(&product.id)?;
            return Ok(0);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
            .ok_or_else(|| CartError::NotInCart(product.id.clone()))?;
        if product.stock == 0 {
            return Err(CartError::OutOfStock(product.name.clone()));
        }
        line.quantity = quantity.min(product.stock);
        Ok(line.quantity)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// `NotInCart` when the product has no line.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| &l.product_id == product_id)
            .ok_or_else(|| CartError::NotInCart(product_id.clone()))?;
        self.lines.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Resolve lines against the catalog and compute totals.
    ///
    /// Lines whose product has disappeared from the catalog are skipped.
    #[must_use]
    pub fn view(&self, catalog: &Catalog) -> CartView {
        let items: Vec<CartItemView> = self
            .lines
            .iter()
            .filter_map(|line| {
                let product = catalog.product(&line.product_id)?;
                let line_total = product.price.saturating_mul(Decimal::from(line.quantity));
                Some(CartItemView {
                    quantity: line.quantity,
                    unit_price: product.money(),
                    line_total: Money::mxn(line_total),
                    product,
                })
            })
            .collect();

        let subtotal = items
            .iter()
            .fold(Decimal::ZERO, |sum, i| sum.saturating_add(i.line_total.amount));
        CartView {
            item_count: items
                .iter()
                .fold(0, |count, i| count.saturating_add(i.quantity)),
            totals: OrderTotals::from_subtotal(subtotal),
            items,
        }
    }
}

/// A resolved cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// A resolved cart with totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: OrderTotals,
}

impl CartView {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn subtotal(&self) -> Money {
        Money::mxn(self.totals.subtotal)
    }

    #[must_use]
    pub const fn shipping(&self) -> Money {
        Money::mxn(self.totals.shipping)
    }

    #[must_use]
    pub const fn tax(&self) -> Money {
        Money::mxn(self.totals.tax)
    }

    #[must_use]
    pub const fn total(&self) -> Money {
        Money::mxn(self.totals.total)
    }

    /// Amount still needed for free shipping, if any.
    #[must_use]
    pub fn free_shipping_gap(&self) -> Option<Money> {
        let gap = papalote_core::models::FREE_SHIPPING_THRESHOLD - self.totals.subtotal;
        (!self.is_empty() && gap > Decimal::ZERO).then(|| Money::mxn(gap))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.into(),
            name: format!("Pieza {id}"),
            description: String::new(),
            category: "Textiles".to_string(),
            shop_id: "shop-1".into(),
            maker_name: "Ana".to_string(),
            state: "Chiapas".to_string(),
            price: Decimal::from(price),
            compare_at_price: None,
            stock,
            rating: 4.0,
            review_count: 0,
            materials: Vec::new(),
            tags: Vec::new(),
            images: Vec::new(),
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_merges_and_caps_at_stock() {
        let mut cart = Cart::default();
        let p = product("prod-1", 100, 5);
        assert_eq!(cart.add(&p, 2).unwrap(), 2);
        assert_eq!(cart.add(&p, 2).unwrap(), 4);
        assert_eq!(cart.add(&p, 9).unwrap(), 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_rejects_zero_and_out_of_stock() {
        let mut cart = Cart::default();
        assert_eq!(
            cart.add(&product("prod-1", 100, 5), 0),
            Err(CartError::ZeroQuantity)
        );
        assert!(matches!(
            cart.add(&product("prod-2", 100, 0), 1),
            Err(CartError::OutOfStock(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_zero_removes() {
        let mut cart = Cart::default();
        let p = product("prod-1", 100, 5);
        cart.add(&p, 1).unwrap();
        assert_eq!(cart.update(&p, 3).unwrap(), 3);
        assert_eq!(cart.update(&p, 0).unwrap(), 0);
        assert!(cart.is_empty());
        assert_eq!(
            cart.update(&p, 2),
            Err(CartError::NotInCart(ProductId::new("prod-1")))
        );
    }

    #[test]
    fn test_update_rejects_sold_out_product() {
        let mut cart = Cart::default();
        let mut p = product("prod-1", 100, 2);
        cart.add(&p, 2).unwrap();

        p.stock = 0;
        assert_eq!(
            cart.update(&p, 1),
            Err(CartError::OutOfStock("Pieza prod-1".to_string()))
        );
        assert_eq!(cart.update(&p, 0).unwrap(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        cart.add(&product("prod-1", 100, 5), 1).unwrap();
        cart.add(&product("prod-2", 100, 5), 1).unwrap();
        cart.remove(&ProductId::new("prod-1")).unwrap();
        assert_eq!(cart.lines()[0].product_id.as_str(), "prod-2");
        assert!(cart.remove(&ProductId::new("prod-1")).is_err());
        cart.clear();
        assert!(cart.is_empty());
    }
}
