//! Buyer-facing views: complete orders and impact tracking.

use std::collections::BTreeSet;

use papalote_core::models::{CompleteOrder, CompleteOrderItem, ImpactSummary, Order};
use papalote_core::{OrderStatus, round_money};
use rust_decimal::Decimal;

use crate::catalog::Catalog;

/// Resolve an order's lines against the catalog.
///
/// Lines for products that have since left the catalog keep their order
/// data and carry no image or maker.
#[must_use]
pub fn complete_order(order: Order, catalog: &Catalog) -> CompleteOrder {
    let lines = order
        .items
        .iter()
        .map(|item| {
            let product = catalog.product(&item.product_id);
            CompleteOrderItem {
                item: item.clone(),
                line_total: item.line_total(),
                image: product
                    .as_ref()
                    .and_then(|p| p.primary_image().map(str::to_string)),
                maker_name: product.map(|p| p.maker_name),
                shop_name: catalog.shop(&item.shop_id).map(|s| s.name.clone()),
            }
        })
        .collect();
    CompleteOrder { order, lines }
}

/// Summarize what a buyer's purchases meant for makers.
///
/// Cancelled orders do not count. States are those of the shops bought
/// from, alphabetical.
#[must_use]
pub fn impact(orders: &[Order], catalog: &Catalog) -> ImpactSummary {
    let mut makers = BTreeSet::new();
    let mut states = BTreeSet::new();
    let mut summary = ImpactSummary::default();
    let mut spent = Decimal::ZERO;

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        summary.orders_placed += 1;
        for item in &order.items {
            summary.items_purchased = summary.items_purchased.saturating_add(item.quantity);
            spent = spent.saturating_add(item.line_total());
            makers.insert(item.shop_id.clone());
            if let Some(shop) = catalog.shop(&item.shop_id) {
                states.insert(shop.state.clone());
            }
        }
    }

    summary.makers_supported = makers.len();
    summary.states_reached = states.into_iter().collect();
    summary.spent_with_makers = round_money(spent);
    summary
}
