//! Storefront-only models.
//!
//! Marketplace entities live in `papalote_core::models`; this module holds
//! what only the web layer needs.

pub mod session;

pub use session::{CartLine, keys as session_keys};
