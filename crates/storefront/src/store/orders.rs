//! Order storage.

use chrono::Utc;
use papalote_core::models::Order;
use papalote_core::{BuyerId, OrderId, OrderStatus, ShopId};
use tracing::info;

use super::{MarketStore, StoreError, read, write};

impl MarketStore {
    /// Store a newly placed order.
    pub fn insert_order(&self, order: Order) {
        info!(order_id = %order.id, buyer_id = %order.buyer_id, "Order placed");
        write(&self.inner.orders).push(order);
    }

    /// Look up an order by id.
    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<Order> {
        read(&self.inner.orders).iter().find(|o| &o.id == id).cloned()
    }

    /// Orders placed by a buyer, newest first.
    #[must_use]
    pub fn orders_for_buyer(&self, buyer_id: &BuyerId) -> Vec<Order> {
        let mut orders: Vec<Order> = read(&self.inner.orders)
            .iter()
            .filter(|o| &o.buyer_id == buyer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Orders with at least one line from the shop, newest first,
    /// optionally restricted to one status.
    #[must_use]
    pub fn orders_for_shop(&self, shop_id: &ShopId, status: Option<OrderStatus>) -> Vec<Order> {
        let mut orders: Vec<Order> = read(&self.inner.orders)
            .iter()
            .filter(|o| o.involves_shop(shop_id))
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Set an order's status and, when given, its tracking number.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown order, `Conflict` when the order is already
    /// delivered or cancelled.
    pub fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Order, StoreError> {
        let mut orders = write(&self.inner.orders);
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id.as_str()))?;

        if order.status.is_terminal() {
            return Err(StoreError::Conflict(format!(
                "Order {id} is {} and can no longer change",
                order.status
            )));
        }

        order.status = status;
        if let Some(tracking) = tracking_number.filter(|t| !t.trim().is_empty()) {
            order.tracking_number = Some(tracking.trim().to_string());
        }
        order.updated_at = Some(Utc::now());
        info!(order_id = %id, status = %status, "Order status updated");
        Ok(order.clone())
    }
}
