//! Buyer profile pages, scoped by the buyer id in the path.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use papalote_core::models::{Buyer, ImpactSummary, Order, Product};
use papalote_core::{BuyerId, Money};
use tracing::instrument;

use crate::error::{AppError, PageResult, Result};
use crate::filters;
use crate::services::buyer::impact as impact_summary;
use crate::state::AppState;

fn known_buyer(state: &AppState, id: String) -> Result<Buyer> {
    let id = BuyerId::new(id);
    state
        .catalog()
        .buyer(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Buyer {id}")))
}

#[derive(Template, WebTemplate)]
#[template(path = "buyer/profile.html")]
pub struct ProfileTemplate {
    pub buyer: Buyer,
    pub order_count: usize,
    pub favorite_count: usize,
    pub impact: ImpactSummary,
}

impl ProfileTemplate {
    pub const fn spent(&self) -> Money {
        Money::mxn(self.impact.spent_with_makers)
    }
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> PageResult<ProfileTemplate> {
    let buyer = known_buyer(&state, buyer_id)?;
    let orders = state.store().orders_for_buyer(&buyer.id);
    Ok(ProfileTemplate {
        order_count: orders.len(),
        favorite_count: state.store().favorites(&buyer.id).len(),
        impact: impact_summary(&orders, state.catalog()),
        buyer,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "buyer/orders.html")]
pub struct OrdersTemplate {
    pub buyer: Buyer,
    pub orders: Vec<Order>,
}

#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> PageResult<OrdersTemplate> {
    let buyer = known_buyer(&state, buyer_id)?;
    Ok(OrdersTemplate {
        orders: state.store().orders_for_buyer(&buyer.id),
        buyer,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "buyer/favorites.html")]
pub struct FavoritesTemplate {
    pub buyer: Buyer,
    pub products: Vec<Product>,
}

/// Saved products still in the catalog, most recently saved first.
#[instrument(skip(state))]
pub async fn favorites(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> PageResult<FavoritesTemplate> {
    let buyer = known_buyer(&state, buyer_id)?;
    let ids: Vec<_> = state
        .store()
        .favorites(&buyer.id)
        .into_iter()
        .map(|f| f.product_id)
        .collect();
    Ok(FavoritesTemplate {
        products: state.catalog().products_by_ids(&ids),
        buyer,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "buyer/impact.html")]
pub struct ImpactTemplate {
    pub buyer: Buyer,
    pub impact: ImpactSummary,
}

impl ImpactTemplate {
    pub const fn spent(&self) -> Money {
        Money::mxn(self.impact.spent_with_makers)
    }
}

#[instrument(skip(state))]
pub async fn impact(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> PageResult<ImpactTemplate> {
    let buyer = known_buyer(&state, buyer_id)?;
    let orders = state.store().orders_for_buyer(&buyer.id);
    Ok(ImpactTemplate {
        impact: impact_summary(&orders, state.catalog()),
        buyer,
    })
}
