//! Seller analytics computed from orders.
//!
//! Only the shop's own lines count toward its revenue. Cancelled orders are
//! left out entirely.

use std::collections::{BTreeMap, HashMap};

use papalote_core::models::{Order, TrafficStats};
use papalote_core::{Money, OrderStatus, ProductId, ShopId, round_money};
use rust_decimal::Decimal;
use serde::Serialize;

/// How many products the top-sellers list shows.
pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units_sold: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerAnalytics {
    pub revenue: Decimal,
    pub order_count: usize,
    pub units_sold: u32,
    pub average_order_value: Decimal,
    pub pending_orders: usize,
    pub top_products: Vec<TopProduct>,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub traffic: TrafficStats,
}

impl SellerAnalytics {
    /// Aggregate `orders` for `shop_id`.
    #[must_use]
    pub fn compute(shop_id: &ShopId, orders: &[Order], traffic: TrafficStats) -> Self {
        let mut revenue = Decimal::ZERO;
        let mut order_count = 0;
        let mut units_sold: u32 = 0;
        let mut pending_orders = 0;
        let mut products: HashMap<&ProductId, TopProduct> = HashMap::new();
        let mut months: BTreeMap<String, MonthlyRevenue> = BTreeMap::new();

        for order in orders {
            if order.status == OrderStatus::Cancelled || !order.involves_shop(shop_id) {
                continue;
            }
            order_count += 1;
            if matches!(order.status, OrderStatus::Pending | OrderStatus::Processing) {
                pending_orders += 1;
            }

            let month_key = order.created_at.format("%Y-%m").to_string();
            let month = months
                .entry(month_key.clone())
                .or_insert_with(|| MonthlyRevenue {
                    month: month_key,
                    revenue: Decimal::ZERO,
                    orders: 0,
                });
            month.orders += 1;

            for item in order.items_for_shop(shop_id) {
                let line = item.line_total();
                revenue = revenue.saturating_add(line);
                units_sold = units_sold.saturating_add(item.quantity);
                month.revenue = month.revenue.saturating_add(line);

                let top = products.entry(&item.product_id).or_insert_with(|| TopProduct {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    units_sold: 0,
                    revenue: Decimal::ZERO,
                });
                top.units_sold = top.units_sold.saturating_add(item.quantity);
                top.revenue = top.revenue.saturating_add(line);
            }
        }

        let mut top_products: Vec<TopProduct> = products.into_values().collect();
        top_products.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.name.cmp(&b.name))
        });
        top_products.truncate(TOP_PRODUCTS);

        let average_order_value = if order_count == 0 {
            Decimal::ZERO
        } else {
            round_money(revenue / Decimal::from(order_count))
        };

        Self {
            revenue: round_money(revenue),
            order_count,
            units_sold,
            average_order_value,
            pending_orders,
            top_products,
            revenue_by_month: months.into_values().collect(),
            traffic,
        }
    }

    #[must_use]
    pub const fn revenue_money(&self) -> Money {
        Money::mxn(self.revenue)
    }

    #[must_use]
    pub const fn average_order_money(&self) -> Money {
        Money::mxn(self.average_order_value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use papalote_core::models::{OrderItem, OrderTotals, ShippingAddress};
    use papalote_core::{BuyerId, OrderId, PaymentMethod, PaymentStatus};

    fn item(product: &str, shop: &str, price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(product),
            shop_id: ShopId::new(shop),
            name: product.to_uppercase(),
            unit_price: Decimal::from(price),
            quantity,
        }
    }

    fn order(id: &str, month: u32, status: OrderStatus, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(id),
            buyer_id: BuyerId::new("buyer-1"),
            totals: OrderTotals::from_items(&items),
            items,
            shipping_address: ShippingAddress {
                full_name: "Ana".to_string(),
                street: "Calle 1".to_string(),
                city: "Oaxaca".to_string(),
                state: "Oaxaca".to_string(),
                postal_code: "68000".to_string(),
                phone: "9511234567".to_string(),
            },
            contact_email: "ana@example.mx".to_string(),
            payment_method: PaymentMethod::Card,
            status,
            payment_status: PaymentStatus::Paid,
            tracking_number: None,
            created_at: Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_counts_only_own_lines_and_skips_cancelled() {
        let shop = ShopId::new("shop-a");
        let orders = vec![
            order(
                "o1",
                3,
                OrderStatus::Delivered,
                vec![item("p1", "shop-a", 500, 2), item("p9", "shop-b", 900, 1)],
            ),
            order("o2", 4, OrderStatus::Pending, vec![item("p2", "shop-a", 300, 1)]),
            order("o3", 4, OrderStatus::Cancelled, vec![item("p1", "shop-a", 500, 5)]),
            order("o4", 4, OrderStatus::Shipped, vec![item("p9", "shop-b", 900, 1)]),
        ];

        let stats = SellerAnalytics::compute(&shop, &orders, TrafficStats::default());
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.revenue, Decimal::from(1300));
        assert_eq!(stats.units_sold, 3);
        assert_eq!(stats.average_order_value, Decimal::from(650));
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.top_products[0].product_id.as_str(), "p1");
        assert_eq!(stats.revenue_by_month.len(), 2);
        assert_eq!(stats.revenue_by_month[0].month, "2024-03");
        assert_eq!(stats.revenue_by_month[1].revenue, Decimal::from(300));
    }

    #[test]
    fn test_huge_lines_saturate() {
        let mut huge = item("p1", "shop-a", 1, u32::MAX);
        huge.unit_price = Decimal::MAX;
        let orders = vec![
            order("o1", 5, OrderStatus::Delivered, vec![huge.clone()]),
            order("o2", 5, OrderStatus::Delivered, vec![huge]),
        ];

        let stats = SellerAnalytics::compute(&ShopId::new("shop-a"), &orders, TrafficStats::default());
        assert_eq!(stats.revenue, Decimal::MAX);
        assert_eq!(stats.units_sold, u32::MAX);
        assert_eq!(stats.top_products[0].units_sold, u32::MAX);
        assert_eq!(stats.revenue_by_month[0].revenue, Decimal::MAX);
    }

    #[test]
    fn test_no_orders() {
        let stats = SellerAnalytics::compute(&ShopId::new("shop-a"), &[], TrafficStats::default());
        assert_eq!(stats.revenue, Decimal::ZERO);
        assert_eq!(stats.average_order_value, Decimal::ZERO);
        assert!(stats.top_products.is_empty());
    }
}
