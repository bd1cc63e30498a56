//! Per-visitor state kept in the session.
//!
//! Cart, comparison list and recently viewed products live server-side under
//! the keys below, one JSON value each.

use papalote_core::ProductId;
use serde::{Deserialize, Serialize};

/// Session keys.
pub mod keys {
    /// Cart lines.
    pub const CART: &str = "cart";

    /// Product comparison list.
    pub const COMPARE: &str = "compare";

    /// Recently viewed product ids, newest first.
    pub const RECENTLY_VIEWED: &str = "recently_viewed";
}

/// One cart line as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}
