//! Read side of the marketplace: products, shops, reviews and reference data.
//!
//! The catalog is loaded once from fixtures. Published seller listings are
//! merged into the product snapshot as they change. Each new snapshot gets
//! the next generation number, and cached listing pages are keyed by the
//! generation they were computed from.

mod fixtures;
mod query;
pub mod validate;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use papalote_core::models::{Buyer, Product, Review, SellerProduct, Shop, TrafficStats};
use papalote_core::pricing::FairTradeRates;
use papalote_core::{BuyerId, ProductId, ProductStatus, ShopId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

pub use fixtures::{Fixtures, files};
pub use query::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, ProductPage, ProductQuery, ProductQueryParams, ProductSort,
    empty_string_as_none,
};

/// Errors loading catalog fixtures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("fixture file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A facet value with the number of products carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub name: String,
    pub count: usize,
}

/// Shared catalog handle. Cheap to clone.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct Snapshot {
    generation: u64,
    products: Arc<Vec<Product>>,
}

struct CatalogInner {
    base_products: Vec<Product>,
    products: RwLock<Snapshot>,
    shops: Vec<Shop>,
    reviews: Vec<Review>,
    buyers: Vec<Buyer>,
    traffic: HashMap<ShopId, TrafficStats>,
    fair_trade_rates: FairTradeRates,
    listings: Cache<(u64, ProductQuery), Arc<ProductPage>>,
}

impl Catalog {
    /// Build the catalog from loaded fixtures.
    #[must_use]
    pub fn new(fixtures: &Fixtures) -> Self {
        let listings = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(300))
            .build();

        let catalog = Self {
            inner: Arc::new(CatalogInner {
                base_products: fixtures.products.clone(),
                products: RwLock::new(Snapshot {
                    generation: 0,
                    products: Arc::new(fixtures.products.clone()),
                }),
                shops: fixtures.shops.clone(),
                reviews: fixtures.reviews.clone(),
                buyers: fixtures.buyers.clone(),
                traffic: fixtures.traffic.clone(),
                fair_trade_rates: fixtures.fair_trade_rates.clone(),
                listings,
            }),
        };
        catalog.sync_listings(&fixtures.seller_products);
        catalog
    }

    /// Current product snapshot with its generation number.
    #[must_use]
    pub fn snapshot(&self) -> (u64, Arc<Vec<Product>>) {
        let guard = self
            .inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        (guard.generation, Arc::clone(&guard.products))
    }

    /// Current product snapshot: fixture products plus published listings.
    #[must_use]
    pub fn all_products(&self) -> Arc<Vec<Product>> {
        self.snapshot().1
    }

    /// Filtered, sorted and paginated listing. Pages are cached per query
    /// and snapshot generation, so a page computed from a replaced snapshot
    /// is never served.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Arc<ProductPage> {
        let (generation, products) = self.snapshot();
        let key = (generation, query.clone());
        if let Some(page) = self.inner.listings.get(&key).await {
            debug!("Listing cache hit");
            return page;
        }
        let page = Arc::new(query.apply(&products));
        self.inner.listings.insert(key, Arc::clone(&page)).await;
        page
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.all_products().iter().find(|p| &p.id == id).cloned()
    }

    /// Look up several products, preserving the order of `ids` and skipping
    /// unknown ones.
    #[must_use]
    pub fn products_by_ids(&self, ids: &[ProductId]) -> Vec<Product> {
        let products = self.all_products();
        ids.iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id).cloned())
            .collect()
    }

    /// All shops.
    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.inner.shops
    }

    /// Look up a shop by id.
    #[must_use]
    pub fn shop(&self, id: &ShopId) -> Option<&Shop> {
        self.inner.shops.iter().find(|s| &s.id == id)
    }

    /// Products sold by a shop, best rated first.
    #[must_use]
    pub fn products_by_shop(&self, id: &ShopId) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .all_products()
            .iter()
            .filter(|p| &p.shop_id == id)
            .cloned()
            .collect();
        products.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        products
    }

    /// Reviews for a product, newest first.
    #[must_use]
    pub fn reviews_for(&self, id: &ProductId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .inner
            .reviews
            .iter()
            .filter(|r| &r.product_id == id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Up to `limit` products sharing the category or shop of `id`, best
    /// rated first. Excludes the product itself.
    #[must_use]
    pub fn related(&self, id: &ProductId, limit: usize) -> Vec<Product> {
        let products = self.all_products();
        let Some(source) = products.iter().find(|p| &p.id == id) else {
            return Vec::new();
        };
        let mut related: Vec<&Product> = products
            .iter()
            .filter(|p| {
                &p.id != id && (p.category == source.category || p.shop_id == source.shop_id)
            })
            .collect();
        related.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        related.into_iter().take(limit).cloned().collect()
    }

    /// Category facet, alphabetical.
    #[must_use]
    pub fn categories(&self) -> Vec<Facet> {
        self.facet(|p| &p.category)
    }

    /// State-of-origin facet, alphabetical.
    #[must_use]
    pub fn states(&self) -> Vec<Facet> {
        self.facet(|p| &p.state)
    }

    fn facet(&self, key: impl Fn(&Product) -> &String) -> Vec<Facet> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for product in self.all_products().iter() {
            *counts.entry(key(product).clone()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| Facet { name, count })
            .collect()
    }

    /// Regional wage reference table.
    #[must_use]
    pub fn fair_trade_rates(&self) -> &FairTradeRates {
        &self.inner.fair_trade_rates
    }

    /// Look up a buyer by id.
    #[must_use]
    pub fn buyer(&self, id: &BuyerId) -> Option<&Buyer> {
        self.inner.buyers.iter().find(|b| &b.id == id)
    }

    /// Traffic figures for a shop, zero when none were recorded.
    #[must_use]
    pub fn traffic(&self, id: &ShopId) -> TrafficStats {
        self.inner.traffic.get(id).copied().unwrap_or_default()
    }

    /// Rebuild the product snapshot from fixture products plus the
    /// published subset of `listings`, then drop cached listing pages.
    ///
    /// Listings whose shop is unknown are skipped. Returns the generation of
    /// the new snapshot.
    pub fn sync_listings(&self, listings: &[SellerProduct]) -> u64 {
        let mut products = self.inner.base_products.clone();
        for listing in listings {
            if listing.status != ProductStatus::Published {
                continue;
            }
            let Some(shop) = self.shop(&listing.shop_id) else {
                debug!(listing = %listing.id, "Skipping listing for unknown shop");
                continue;
            };
            let product = listing_to_product(listing, shop);
            match products.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => *existing = product,
                None => products.push(product),
            }
        }

        let generation = {
            let mut guard = self
                .inner
                .products
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            guard.generation += 1;
            guard.products = Arc::new(products);
            guard.generation
        };
        self.inner.listings.invalidate_all();
        generation
    }
}

/// Public product view of a published seller listing.
fn listing_to_product(listing: &SellerProduct, shop: &Shop) -> Product {
    Product {
        id: listing.id.clone(),
        name: listing.name.clone(),
        description: listing.description.clone(),
        category: listing.category.clone(),
        shop_id: listing.shop_id.clone(),
        maker_name: shop.maker_name.clone(),
        state: shop.state.clone(),
        price: listing.price,
        compare_at_price: None,
        stock: listing.stock,
        rating: 0.0,
        review_count: 0,
        materials: listing.materials.clone(),
        tags: Vec::new(),
        images: listing.images.clone(),
        featured: false,
        created_at: listing.created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// Fixtures bundled with the crate.
    pub(crate) fn bundled() -> Fixtures {
        Fixtures::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data")).unwrap()
    }

    fn listing(status: ProductStatus) -> SellerProduct {
        let now = chrono::Utc::now();
        SellerProduct {
            id: ProductId::new("prod-new-1"),
            shop_id: ShopId::new("shop-oaxaca-barro"),
            name: "Cántaro de barro negro".to_string(),
            description: "Pulido a mano con cuarzo".to_string(),
            category: "Barro".to_string(),
            price: rust_decimal::Decimal::from(780),
            stock: 4,
            materials: vec!["barro negro".to_string()],
            images: Vec::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_bundled_fixtures_load() {
        let fixtures = bundled();
        assert!(!fixtures.products.is_empty());
        assert!(!fixtures.shops.is_empty());
        assert!(!fixtures.fair_trade_rates.states.is_empty());
    }

    #[test]
    fn test_missing_required_file() {
        let err = Fixtures::load(Path::new("/nonexistent/papalote")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile(_)));
    }

    #[test]
    fn test_product_lookup_and_related() {
        let catalog = Catalog::new(&bundled());
        let first = catalog.all_products()[0].clone();
        assert_eq!(catalog.product(&first.id).unwrap().name, first.name);
        assert!(catalog.product(&ProductId::new("prod-missing")).is_none());

        let related = catalog.related(&first.id, 4);
        assert!(related.len() <= 4);
        assert!(related.iter().all(|p| p.id != first.id));
        assert!(
            related
                .iter()
                .all(|p| p.category == first.category || p.shop_id == first.shop_id)
        );
    }

    #[test]
    fn test_facets_count_every_product() {
        let catalog = Catalog::new(&bundled());
        let total: usize = catalog.categories().iter().map(|f| f.count).sum();
        assert_eq!(total, catalog.all_products().len());
        let states: usize = catalog.states().iter().map(|f| f.count).sum();
        assert_eq!(states, total);
    }

    /// The bundled listings plus one new listing in `status`.
    fn listings_with(fixtures: &Fixtures, status: ProductStatus) -> Vec<SellerProduct> {
        let mut listings = fixtures.seller_products.clone();
        listings.push(listing(status));
        listings
    }

    #[test]
    fn test_sync_listings_publishes_and_withdraws() {
        let fixtures = bundled();
        let catalog = Catalog::new(&fixtures);
        let before = catalog.all_products().len();

        catalog.sync_listings(&listings_with(&fixtures, ProductStatus::Published));
        let product = catalog.product(&ProductId::new("prod-new-1")).unwrap();
        assert_eq!(product.state, "Oaxaca");
        assert_eq!(catalog.all_products().len(), before + 1);

        catalog.sync_listings(&listings_with(&fixtures, ProductStatus::Draft));
        assert!(catalog.product(&ProductId::new("prod-new-1")).is_none());
        assert_eq!(catalog.all_products().len(), before);
    }

    #[tokio::test]
    async fn test_listing_cache_invalidated_on_sync() {
        let fixtures = bundled();
        let catalog = Catalog::new(&fixtures);
        let query = ProductQuery {
            per_page: MAX_PER_PAGE,
            ..ProductQuery::default()
        };
        let before = catalog.products(&query).await.total;
        catalog.sync_listings(&listings_with(&fixtures, ProductStatus::Published));
        let after = catalog.products(&query).await.total;
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn test_page_computed_before_sync_is_not_served() {
        let fixtures = bundled();
        let catalog = Catalog::new(&fixtures);
        let query = ProductQuery {
            per_page: MAX_PER_PAGE,
            ..ProductQuery::default()
        };

        // A request reads the old snapshot, then the listing is published
        // before that request caches its page.
        let (old_generation, old_products) = catalog.snapshot();
        let new_generation =
            catalog.sync_listings(&listings_with(&fixtures, ProductStatus::Published));
        assert!(new_generation > old_generation);
        let stale = Arc::new(query.apply(&old_products));
        let stale_total = stale.total;
        catalog
            .inner
            .listings
            .insert((old_generation, query.clone()), stale)
            .await;

        let page = catalog.products(&query).await;
        assert_eq!(page.total, stale_total + 1);
        assert!(page.items.iter().any(|p| p.id.as_str() == "prod-new-1"));
    }
}
