//! In-memory marketplace store.
//!
//! Holds everything buyers and sellers can change at runtime: orders, seller
//! listings, messages, verification requests and favorites. Seeded from
//! fixtures at startup; nothing survives a restart.
//!
//! Each collection sits behind its own `std::sync::RwLock`. Guards are never
//! held across an `.await`.

mod favorites;
mod listings;
mod messages;
mod orders;
mod verification;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use papalote_core::models::{
    FavoriteProduct, Order, SellerMessage, SellerProduct, VerificationRequest,
};
use thiserror::Error;

use crate::catalog::Fixtures;

pub use listings::NewListing;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            id: id.into(),
        }
    }
}

/// Shared store handle. Cheap to clone.
#[derive(Clone, Default)]
pub struct MarketStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    orders: RwLock<Vec<Order>>,
    listings: RwLock<Vec<SellerProduct>>,
    messages: RwLock<Vec<SellerMessage>>,
    verifications: RwLock<Vec<VerificationRequest>>,
    favorites: RwLock<Vec<FavoriteProduct>>,
}

impl MarketStore {
    /// Seed a store from fixtures.
    #[must_use]
    pub fn seed(fixtures: &Fixtures) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                orders: RwLock::new(fixtures.orders.clone()),
                listings: RwLock::new(fixtures.seller_products.clone()),
                messages: RwLock::new(fixtures.messages.clone()),
                verifications: RwLock::new(Vec::new()),
                favorites: RwLock::new(fixtures.favorites.clone()),
            }),
        }
    }
}

/// Acquire a read guard, recovering the data from a poisoned lock.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire a write guard, recovering the data from a poisoned lock.
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Store seeded from the bundled fixtures.
    pub(crate) fn seeded() -> MarketStore {
        MarketStore::seed(&crate::catalog::tests::bundled())
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("Order", "ord-9");
        assert_eq!(err.to_string(), "Order ord-9 not found");
    }

    #[test]
    fn test_empty_store() {
        let store = MarketStore::default();
        assert!(store.all_listings().is_empty());
    }
}
