//! Product catalog API.

use axum::{Json, extract::State};
use papalote_core::{Money, ProductId};
use papalote_core::models::{Product, Review, Shop};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiPath, ApiQuery, Envelope, ok};
use crate::catalog::{Facet, ProductPage, ProductQuery, ProductQueryParams};
use crate::error::{AppError, Result};
use crate::search::{SearchFilters, SearchResults, SearchSort};
use crate::state::AppState;

/// Related products returned with a product.
const RELATED_LIMIT: usize = 4;

/// Listing response: the page plus facets for filter UIs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    #[serde(flatten)]
    pub page: ProductPage,
    pub categories: Vec<Facet>,
    pub states: Vec<Facet>,
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductQueryParams>,
) -> Result<Json<Envelope<ProductList>>> {
    let query = ProductQuery::from(params);
    let page = state.catalog().products(&query).await;
    Ok(ok(ProductList {
        page: (*page).clone(),
        categories: state.catalog().categories(),
        states: state.catalog().states(),
    }))
}

/// Product detail with its shop, reviews and related products.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    pub shop: Option<Shop>,
    pub reviews: Vec<Review>,
    pub related: Vec<Product>,
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Envelope<ProductDetail>>> {
    let id = ProductId::new(id);
    let catalog = state.catalog();
    let product = catalog
        .product(&id)
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

    Ok(ok(ProductDetail {
        shop: catalog.shop(&product.shop_id).cloned(),
        reviews: catalog.reviews_for(&id),
        related: catalog.related(&id, RELATED_LIMIT),
        product,
    }))
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: String,
    #[serde(default, deserialize_with = "crate::catalog::empty_string_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::catalog::empty_string_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub in_stock: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::catalog::empty_string_as_none")]
    pub limit: Option<usize>,
}

/// Default and maximum number of product hits.
const SEARCH_LIMIT: usize = 24;
const MAX_SEARCH_LIMIT: usize = 100;

impl SearchParams {
    /// Filters for the index, prices converted to centavos.
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            available: self
                .in_stock
                .as_deref()
                .is_some_and(|v| matches!(v, "1" | "true" | "on"))
                .then_some(true),
            min_price_cents: self.min_price.map(|p| Money::mxn(p).cents()),
            max_price_cents: self.max_price.map(|p| Money::mxn(p).cents()),
            state: self
                .state
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// `GET /api/search`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Envelope<SearchResults>>> {
    let results = state.search().search(
        &params.q,
        &params.filters(),
        SearchSort::parse(&params.sort),
        params.limit(),
    )?;
    Ok(ok(results))
}
