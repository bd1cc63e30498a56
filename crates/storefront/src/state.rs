//! Application state shared across handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError, Fixtures};
use crate::config::StorefrontConfig;
use crate::search::{self, SearchIndex};
use crate::store::MarketStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the fixture catalog, the in-memory
/// market store, the search index and the maintenance flag.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    store: MarketStore,
    search: SearchIndex,
    maintenance: AtomicBool,
    /// Serializes listing snapshots into the catalog.
    refresh: Mutex<()>,
}

impl AppState {
    /// Build state from already loaded fixtures.
    #[must_use]
    pub fn new(config: StorefrontConfig, fixtures: &Fixtures) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: Catalog::new(fixtures),
                store: MarketStore::seed(fixtures),
                search: SearchIndex::new(),
                maintenance: AtomicBool::new(false),
                refresh: Mutex::new(()),
                config,
            }),
        }
    }

    /// Load fixtures from `config.data_dir` and build state.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the fixtures cannot be loaded.
    pub fn load(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let fixtures = Fixtures::load(&config.data_dir)?;
        info!(
            products = fixtures.products.len(),
            shops = fixtures.shops.len(),
            orders = fixtures.orders.len(),
            "Fixtures loaded"
        );
        Ok(Self::new(config, &fixtures))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn store(&self) -> &MarketStore {
        &self.inner.store
    }

    #[must_use]
    pub fn search(&self) -> &SearchIndex {
        &self.inner.search
    }

    /// Start building the search index in the background.
    pub fn start_search_indexing(&self) {
        search::build_index_async(self.search().clone(), self.catalog().clone());
    }

    /// Push the current listings into the public catalog and reindex.
    ///
    /// Call after any listing mutation. Concurrent refreshes take the store
    /// snapshot and swap it in one at a time, so the last swap always
    /// carries every finished mutation.
    pub fn refresh_listings(&self) {
        let generation = {
            let _guard = self
                .inner
                .refresh
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.catalog().sync_listings(&self.store().all_listings())
        };
        debug!(generation, "Listings refreshed");
        self.start_search_indexing();
    }

    /// Whether maintenance mode is on.
    #[must_use]
    pub fn maintenance_enabled(&self) -> bool {
        self.inner.maintenance.load(Ordering::Acquire)
    }

    /// Switch maintenance mode, returning the previous value.
    pub fn set_maintenance(&self, enabled: bool) -> bool {
        let previous = self.inner.maintenance.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            info!(enabled, "Maintenance mode changed");
        }
        previous
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::bundled;
    use crate::store::NewListing;
    use papalote_core::models::SellerProductInput;
    use papalote_core::{ProductStatus, ShopId};
    use rust_decimal::Decimal;
    use std::time::Duration;

    #[test]
    fn test_maintenance_flag() {
        let state = AppState::new(StorefrontConfig::local("data", None), &bundled());
        assert!(!state.maintenance_enabled());
        assert!(!state.set_maintenance(true));
        assert!(state.maintenance_enabled());
        assert!(state.set_maintenance(false));
        assert!(!state.maintenance_enabled());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refreshes_keep_every_listing() {
        let state = AppState::new(StorefrontConfig::local("data", None), &bundled());

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    let listing = state
                        .store()
                        .create_listing(NewListing {
                            seller_id: ShopId::new("shop-oaxaca-barro"),
                            fields: SellerProductInput {
                                name: Some(format!("Jarro {i}")),
                                price: Some(Decimal::from(100 + i)),
                                stock: Some(1),
                                ..SellerProductInput::default()
                            },
                        })
                        .unwrap();
                    state
                        .store()
                        .set_listing_status(&listing.id, ProductStatus::Published)
                        .unwrap();
                    state.refresh_listings();
                    listing.id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        for id in &ids {
            assert!(state.catalog().product(id).is_some(), "{id}");
        }

        // Every refresh spawned a build; the newest snapshot's index wins.
        let (generation, _) = state.catalog().snapshot();
        for _ in 0..500 {
            if state.search().generation() == Some(generation) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(state.search().generation(), Some(generation));
    }
}
