//! Business logic between the route handlers and the catalog/store.
//!
//! - `cart` - session cart and totals
//! - `checkout` - form validation and order creation
//! - `compare` - comparison list
//! - `recently_viewed` - recently viewed products
//! - `analytics` - seller dashboard figures
//! - `buyer` - complete orders and impact tracking

pub mod analytics;
pub mod buyer;
pub mod cart;
pub mod checkout;
pub mod compare;
pub mod recently_viewed;
