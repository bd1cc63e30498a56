//! Integration tests for Papalote Market.
//!
//! Tests drive the full storefront router in process with
//! `tower::ServiceExt::oneshot`, so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p papalote-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pages` - Server-rendered pages and middleware headers
//! - `api` - JSON API envelope, seller and buyer endpoints
//! - `search` - Search API, suggestions and readiness
//! - `shopping` - Cart, checkout and comparison flows across requests
//! - `maintenance` - Maintenance mode gating and the admin toggle

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use papalote_storefront::config::StorefrontConfig;
use papalote_storefront::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Admin bearer token configured for every test context.
pub const ADMIN_TOKEN: &str = "itest-7Qm2xK9pL4vR8nT1wZ6cB3hJ5fD0gY";

/// Bundled fixture directory of the storefront crate.
pub const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/data");

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }

    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One simulated visitor: a fresh application plus its session cookie.
pub struct TestContext {
    pub state: AppState,
    app: Router,
    cookie: Option<String>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Build a fresh application over the bundled fixtures.
    ///
    /// # Panics
    ///
    /// Panics if the fixtures fail to load.
    #[must_use]
    pub fn new() -> Self {
        let config = StorefrontConfig::local(DATA_DIR, Some(ADMIN_TOKEN));
        let state = AppState::load(config).expect("Failed to load bundled fixtures");
        Self {
            app: papalote_storefront::app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Send a request, carrying and updating the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("Invalid cookie header"),
            );
        }

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            self.cookie = set_cookie.split(';').next().map(str::to_string);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(build(Method::GET, path).body(Body::empty()).expect("Bad request"))
            .await
    }

    /// `POST path` with an urlencoded form body.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = build(Method::POST, path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Bad request");
        self.send(request).await
    }

    /// Send a JSON body (or none) with an optional bearer token.
    pub async fn json(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = build(method, path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Bad request");
        self.send(request).await
    }
}

fn build(method: Method, path: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(path)
}
