//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use papalote_core::models::{Product, Shop};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Facet, ProductQuery, ProductSort};
use crate::filters;
use crate::services::recently_viewed;
use crate::state::AppState;

const FEATURED_COUNT: u32 = 8;
const SPOTLIGHT_SHOPS: usize = 3;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<Product>,
    pub shops: Vec<Shop>,
    pub categories: Vec<Facet>,
    pub recently_viewed: Vec<Product>,
}

/// Featured products, top-rated verified shops, categories and the
/// visitor's recently viewed products.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> HomeTemplate {
    let catalog = state.catalog();
    let featured = catalog
        .products(&ProductQuery {
            sort: ProductSort::Featured,
            per_page: FEATURED_COUNT,
            ..ProductQuery::default()
        })
        .await
        .items
        .clone();

    let mut shops: Vec<Shop> = catalog.shops().iter().filter(|s| s.verified).cloned().collect();
    shops.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    shops.truncate(SPOTLIGHT_SHOPS);

    let recent_ids = recently_viewed::load(&session).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read recently viewed: {e}");
        Vec::new()
    });

    HomeTemplate {
        featured,
        shops,
        categories: catalog.categories(),
        recently_viewed: catalog.products_by_ids(&recent_ids),
    }
}
