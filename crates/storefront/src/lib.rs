//! Papalote Market storefront library.
//!
//! The server is built here so the binary and the router-level tests share
//! one middleware stack.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, http::Request, middleware as axum_middleware};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// The full application without API rate limiting.
///
/// Used by tests, which have no peer address to key the limiter on.
pub fn app(state: AppState) -> Router {
    build(state, None)
}

/// The full application with `/api` rate limited per client IP.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_with_rate_limit(state: AppState) -> Router {
    build(state, Some(middleware::api_rate_limiter()))
}

fn build(state: AppState, api_limit: Option<RateLimiterLayer>) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes(api_limit))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::maintenance_middleware,
        ))
        .layer(session_layer)
        .layer(axum_middleware::from_fn(middleware::security_headers_middleware))
        .layer(axum_middleware::from_fn(middleware::csp_nonce_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
