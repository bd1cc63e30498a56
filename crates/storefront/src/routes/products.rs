//! Product catalog pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use papalote_core::ProductId;
use papalote_core::models::{Product, Review, Shop};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Facet, ProductPage, ProductQuery, ProductQueryParams};
use crate::error::{AppError, PageResult};
use crate::filters;
use crate::services::compare::CompareList;
use crate::services::recently_viewed;
use crate::state::AppState;

const RELATED_COUNT: usize = 4;

/// Current filter values echoed back into the filter form.
pub struct ListingFilters {
    pub q: String,
    pub category: String,
    pub state: String,
    pub min_price: String,
    pub max_price: String,
    pub min_rating: String,
    pub in_stock: bool,
    pub sort: &'static str,
}

impl From<&ProductQuery> for ListingFilters {
    fn from(query: &ProductQuery) -> Self {
        Self {
            q: query.text.clone().unwrap_or_default(),
            category: query.category.clone().unwrap_or_default(),
            state: query.state.clone().unwrap_or_default(),
            min_price: query.min_price.map(|p| p.to_string()).unwrap_or_default(),
            max_price: query.max_price.map(|p| p.to_string()).unwrap_or_default(),
            min_rating: query.min_rating.map(|r| r.to_string()).unwrap_or_default(),
            in_stock: query.in_stock_only,
            sort: query.sort.as_str(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: ProductPage,
    pub current: ListingFilters,
    pub preserve_params: String,
    pub categories: Vec<Facet>,
    pub states: Vec<Facet>,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub shop: Option<Shop>,
    pub reviews: Vec<Review>,
    pub related: Vec<Product>,
    pub in_compare: bool,
}

/// Filtered, paginated product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductQueryParams>,
) -> ProductsIndexTemplate {
    let query = ProductQuery::from(params);
    let page = state.catalog().products(&query).await;

    ProductsIndexTemplate {
        page: (*page).clone(),
        current: ListingFilters::from(&query),
        preserve_params: query.preserve_params(),
        categories: state.catalog().categories(),
        states: state.catalog().states(),
    }
}

/// Product detail. Records the view in the visitor's session.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> PageResult<ProductShowTemplate> {
    let id = ProductId::new(id);
    let catalog = state.catalog();
    let product = catalog
        .product(&id)
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

    recently_viewed::record(&session, id.clone()).await?;
    let in_compare = CompareList::load(&session).await?.contains(&id);

    Ok(ProductShowTemplate {
        shop: catalog.shop(&product.shop_id).cloned(),
        reviews: catalog.reviews_for(&id),
        related: catalog.related(&id, RELATED_COUNT),
        in_compare,
        product,
    })
}
