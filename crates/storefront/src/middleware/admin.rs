//! Admin bearer-token extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires `Authorization: Bearer <admin token>`.
///
/// Rejects with 403 when no admin token is configured and 401 when the
/// header is missing or wrong.
///
/// # Example
///
/// ```rust,ignore
/// async fn toggle(_admin: RequireAdmin, Json(body): Json<Toggle>) -> Result<Json<Value>> {
///     // ...
/// }
/// ```
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let config = state.config();

        if config.admin_token.is_none() {
            return Err(AppError::Forbidden(
                "Admin endpoints are disabled".to_string(),
            ));
        }

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        if !config.admin_token_matches(presented) {
            tracing::warn!("Rejected admin request with invalid token");
            return Err(AppError::Unauthorized("Invalid admin token".to_string()));
        }

        Ok(Self)
    }
}
