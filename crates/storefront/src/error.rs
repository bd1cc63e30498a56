//! Unified error handling with Sentry integration.
//!
//! `AppError` is what JSON handlers return: it becomes the
//! `{ "success": false, "error": "..." }` envelope with a matching status.
//! HTML handlers return [`PageError`], which renders the error page instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use papalote_core::pricing::PricingError;
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::filters;
use crate::search::SearchError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::compare::CompareError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Fixture data could not be loaded or is inconsistent.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// In-memory store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Pricing calculator input was invalid.
    #[error("Invalid pricing input: {0}")]
    Pricing(#[from] PricingError),

    /// Search index failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Cart operation rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Comparison list operation rejected.
    #[error(transparent)]
    Compare(#[from] CompareError),

    /// Order could not be placed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller may not perform this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Site is in maintenance mode.
    #[error("Service unavailable")]
    Maintenance,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(_) | Self::Search(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Store(err) => match err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
            },
            Self::Cart(err) => match err {
                CartError::UnknownProduct(_) | CartError::NotInCart(_) => StatusCode::NOT_FOUND,
                CartError::ZeroQuantity | CartError::OutOfStock(_) => StatusCode::BAD_REQUEST,
            },
            Self::Compare(err) => match err {
                CompareError::Full => StatusCode::CONFLICT,
                CompareError::NotListed(_) => StatusCode::NOT_FOUND,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::Unavailable(_) => StatusCode::CONFLICT,
            },
            Self::Pricing(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Maintenance => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message safe to show to clients.
    ///
    /// Server-side failures collapse to a generic message.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Catalog(_) | Self::Search(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Store(err) => err.to_string(),
            Self::Pricing(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Compare(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Maintenance => {
                "Papalote Market is down for maintenance, please try again soon".to_string()
            }
        }
    }

    /// Log and report server-side failures.
    fn report(&self) {
        if self.status().is_server_error() && !matches!(self, Self::Maintenance) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Require a query or body parameter, naming it in the 400 otherwise.
///
/// # Errors
///
/// Returns `BadRequest` when the value is absent or blank.
pub fn require<T: AsRef<str>>(value: Option<T>, name: &str) -> Result<T> {
    value
        .filter(|v| !v.as_ref().trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required parameter: {name}")))
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status_code: u16,
    pub title: String,
    pub message: String,
}

/// Error returned by HTML page handlers.
///
/// Renders `error.html` with the status of the wrapped [`AppError`].
#[derive(Debug)]
pub struct PageError(pub AppError);

impl<E> From<E> for PageError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.report();
        let status = err.status();
        let title = status
            .canonical_reason()
            .unwrap_or("Something went wrong")
            .to_string();
        let page = ErrorTemplate {
            status_code: status.as_u16(),
            title,
            message: err.public_message(),
        };
        (status, page).into_response()
    }
}

/// Result type alias for page handlers.
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "prod-001")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
