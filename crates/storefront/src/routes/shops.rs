//! Maker shop pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use papalote_core::ShopId;
use papalote_core::models::{Product, Shop};
use tracing::instrument;

use crate::catalog::Facet;
use crate::error::{AppError, PageResult};
use crate::filters;
use crate::routes::api::shops::ShopFilter;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "shops/index.html")]
pub struct ShopsIndexTemplate {
    pub shops: Vec<Shop>,
    pub states: Vec<Facet>,
    pub selected_state: String,
    pub verified_only: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "shops/show.html")]
pub struct ShopShowTemplate {
    pub shop: Shop,
    pub products: Vec<Product>,
}

/// Maker directory, filterable by state and verification.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ShopFilter>,
) -> ShopsIndexTemplate {
    let mut shops: Vec<Shop> = state
        .catalog()
        .shops()
        .iter()
        .filter(|shop| filter.matches(shop))
        .cloned()
        .collect();
    shops.sort_by(|a, b| a.name.cmp(&b.name));

    ShopsIndexTemplate {
        shops,
        states: state.catalog().states(),
        selected_state: filter.state.unwrap_or_default(),
        verified_only: filter.verified == Some(true),
    }
}

/// Shop profile with its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<ShopShowTemplate> {
    let id = ShopId::new(id);
    let shop = state
        .catalog()
        .shop(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Shop {id}")))?;
    Ok(ShopShowTemplate {
        products: state.catalog().products_by_shop(&id),
        shop,
    })
}
