//! Search pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::routes::api::products::SearchParams;
use crate::search::{SearchFilters, SearchResults, SearchSort};
use crate::state::AppState;

/// Hits shown per group in the suggestion dropdown.
const SUGGEST_LIMIT: usize = 4;

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Suggestions fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub results: SearchResults,
    pub is_ready: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchPageTemplate {
    pub query: String,
    pub results: SearchResults,
    pub sort: &'static str,
    pub is_ready: bool,
    pub in_stock: bool,
    pub min_price: String,
    pub max_price: String,
}

/// Search suggestions endpoint (HTMX).
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> impl IntoResponse {
    let q = query.q.trim();
    let results = if q.is_empty() {
        SearchResults::default()
    } else {
        state
            .search()
            .search(q, &SearchFilters::default(), SearchSort::Relevance, SUGGEST_LIMIT)
            .unwrap_or_else(|e| {
                tracing::warn!("Suggest search failed: {e}");
                SearchResults::default()
            })
    };

    SearchResultsTemplate {
        results,
        is_ready: state.search().is_ready(),
    }
}

/// Full search page.
#[instrument(skip(state))]
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let sort = SearchSort::parse(&params.sort);
    let search_filters = params.filters();
    let results = state
        .search()
        .search(&params.q, &search_filters, sort, params.limit())
        .unwrap_or_else(|e| {
            tracing::warn!("Search failed: {e}");
            SearchResults::default()
        });

    SearchPageTemplate {
        query: params.q.clone(),
        results,
        sort: sort.as_str(),
        is_ready: state.search().is_ready(),
        in_stock: search_filters.available == Some(true),
        min_price: params.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: params.max_price.map(|p| p.to_string()).unwrap_or_default(),
    }
}
