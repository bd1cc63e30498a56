//! JSON fixture loading.
//!
//! Every file in the data directory is a JSON array (or object) mirroring
//! one record type. Missing optional files load as empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use papalote_core::models::{
    Buyer, FavoriteProduct, Order, Product, Review, SellerMessage, SellerProduct, Shop,
    TrafficStats,
};
use papalote_core::pricing::FairTradeRates;
use papalote_core::ShopId;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::CatalogError;

/// Fixture file names inside the data directory.
pub mod files {
    pub const PRODUCTS: &str = "products.json";
    pub const SHOPS: &str = "shops.json";
    pub const REVIEWS: &str = "reviews.json";
    pub const BUYERS: &str = "buyers.json";
    pub const ORDERS: &str = "orders.json";
    pub const SELLER_PRODUCTS: &str = "seller_products.json";
    pub const MESSAGES: &str = "messages.json";
    pub const FAVORITES: &str = "favorites.json";
    pub const TRAFFIC: &str = "traffic.json";
    pub const FAIR_TRADE_RATES: &str = "fair_trade_rates.json";
}

/// Everything loaded from the data directory.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub products: Vec<Product>,
    pub shops: Vec<Shop>,
    pub reviews: Vec<Review>,
    pub buyers: Vec<Buyer>,
    pub orders: Vec<Order>,
    pub seller_products: Vec<SellerProduct>,
    pub messages: Vec<SellerMessage>,
    pub favorites: Vec<FavoriteProduct>,
    pub traffic: HashMap<ShopId, TrafficStats>,
    pub fair_trade_rates: FairTradeRates,
}

impl Fixtures {
    /// Load all fixtures from `dir`.
    ///
    /// Products, shops and fair-trade rates are required; the rest default
    /// to empty when their file is absent.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a required file is missing or any file fails
    /// to parse.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        info!(dir = %dir.display(), "Loading fixtures");

        let fixtures = Self {
            products: read_required(dir, files::PRODUCTS)?,
            shops: read_required(dir, files::SHOPS)?,
            reviews: read_optional(dir, files::REVIEWS)?,
            buyers: read_optional(dir, files::BUYERS)?,
            orders: read_optional(dir, files::ORDERS)?,
            seller_products: read_optional(dir, files::SELLER_PRODUCTS)?,
            messages: read_optional(dir, files::MESSAGES)?,
            favorites: read_optional(dir, files::FAVORITES)?,
            traffic: read_optional(dir, files::TRAFFIC)?,
            fair_trade_rates: read_required(dir, files::FAIR_TRADE_RATES)?,
        };

        info!(
            products = fixtures.products.len(),
            shops = fixtures.shops.len(),
            reviews = fixtures.reviews.len(),
            orders = fixtures.orders.len(),
            "Fixtures loaded"
        );
        Ok(fixtures)
    }
}

fn read_required<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, CatalogError> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(CatalogError::MissingFile(path));
    }
    read(&path)
}

fn read_optional<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T, CatalogError> {
    let path = dir.join(name);
    if !path.exists() {
        debug!(path = %path.display(), "Optional fixture missing, using empty");
        return Ok(T::default());
    }
    read(&path)
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: PathBuf::from(path),
        source,
    })
}
