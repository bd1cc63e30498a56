//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction capture)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID
//! 4. CSP nonce
//! 5. Security headers
//! 6. Session layer (tower-sessions, in-memory store)
//! 7. Maintenance gate
//! 8. Rate limiting on `/api` (governor), added by the binary

pub mod admin;
pub mod csp;
pub mod maintenance;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use admin::RequireAdmin;
pub use csp::{CspNonce, csp_nonce_middleware};
pub use maintenance::maintenance_middleware;
pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
