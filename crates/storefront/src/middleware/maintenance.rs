//! Maintenance mode gate.
//!
//! While the flag is on, page requests get a 503 maintenance page. The JSON
//! API, the health check and static assets stay reachable so operators can
//! switch the flag back off.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::filters;
use crate::state::AppState;

/// Path prefixes that bypass the gate.
const BYPASS_PREFIXES: &[&str] = &["/api/", "/static/", "/health"];

/// Maintenance page.
#[derive(Template, WebTemplate)]
#[template(path = "maintenance.html")]
pub struct MaintenanceTemplate;

/// Whether `path` stays reachable during maintenance.
#[must_use]
pub fn bypasses_maintenance(path: &str) -> bool {
    path == "/api" || BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Answer 503 for gated paths while maintenance mode is on.
pub async fn maintenance_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.maintenance_enabled() && !bypasses_maintenance(request.uri().path()) {
        let mut response = (StatusCode::SERVICE_UNAVAILABLE, MaintenanceTemplate).into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static("300"));
        return response;
    }
    next.run(request).await
}
