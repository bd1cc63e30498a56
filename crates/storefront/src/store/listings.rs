//! Seller-owned product listings.

use chrono::Utc;
use papalote_core::models::{SellerProduct, SellerProductInput};
use papalote_core::{ProductId, ProductStatus, ShopId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::{MarketStore, StoreError, read, write};

/// Body of a create-listing request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub seller_id: ShopId,
    #[serde(flatten)]
    pub fields: SellerProductInput,
}

fn validate_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Invalid("Product name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Highest listing price, in pesos.
pub const MAX_LISTING_PRICE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Highest listing stock.
pub const MAX_LISTING_STOCK: u32 = 100_000;

fn validate_price(price: Decimal) -> Result<Decimal, StoreError> {
    if price <= Decimal::ZERO {
        return Err(StoreError::Invalid(
            "Price must be greater than zero".to_string(),
        ));
    }
    if price > MAX_LISTING_PRICE {
        return Err(StoreError::Invalid(format!(
            "Price cannot exceed {MAX_LISTING_PRICE} MXN"
        )));
    }
    Ok(price)
}

fn validate_stock(stock: u32) -> Result<u32, StoreError> {
    if stock > MAX_LISTING_STOCK {
        return Err(StoreError::Invalid(format!(
            "Stock cannot exceed {MAX_LISTING_STOCK} units"
        )));
    }
    Ok(stock)
}

impl MarketStore {
    /// Every listing regardless of status.
    #[must_use]
    pub fn all_listings(&self) -> Vec<SellerProduct> {
        read(&self.inner.listings).clone()
    }

    /// A shop's listings, newest first, optionally restricted to one status.
    #[must_use]
    pub fn listings_for_shop(
        &self,
        shop_id: &ShopId,
        status: Option<ProductStatus>,
    ) -> Vec<SellerProduct> {
        let mut listings: Vec<SellerProduct> = read(&self.inner.listings)
            .iter()
            .filter(|p| &p.shop_id == shop_id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    }

    /// Look up a listing by id.
    #[must_use]
    pub fn listing(&self, id: &ProductId) -> Option<SellerProduct> {
        read(&self.inner.listings)
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Create a draft listing.
    ///
    /// # Errors
    ///
    /// `Invalid` when the name is blank, the price is missing or outside
    /// `(0, MAX_LISTING_PRICE]`, or the stock exceeds `MAX_LISTING_STOCK`.
    pub fn create_listing(&self, new: NewListing) -> Result<SellerProduct, StoreError> {
        let fields = new.fields;
        let name = validate_name(fields.name.as_deref().unwrap_or_default())?;
        let price = validate_price(
            fields
                .price
                .ok_or_else(|| StoreError::Invalid("Price is required".to_string()))?,
        )?;
        let stock = validate_stock(fields.stock.unwrap_or_default())?;

        let now = Utc::now();
        let listing = SellerProduct {
            id: ProductId::generate(),
            shop_id: new.seller_id,
            name,
            description: fields.description.unwrap_or_default(),
            category: fields.category.unwrap_or_default(),
            price,
            stock,
            materials: fields.materials.unwrap_or_default(),
            images: fields.images.unwrap_or_default(),
            status: ProductStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        info!(product_id = %listing.id, shop_id = %listing.shop_id, "Listing created");
        write(&self.inner.listings).push(listing.clone());
        Ok(listing)
    }

    /// Apply the provided fields to a listing.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown listing, `Invalid` for a blank name, a
    /// price outside `(0, MAX_LISTING_PRICE]` or stock above
    /// `MAX_LISTING_STOCK`.
    pub fn update_listing(
        &self,
        id: &ProductId,
        input: SellerProductInput,
    ) -> Result<SellerProduct, StoreError> {
        let name = input.name.as_deref().map(validate_name).transpose()?;
        let price = input.price.map(validate_price).transpose()?;
        let stock = input.stock.map(validate_stock).transpose()?;

        let mut listings = write(&self.inner.listings);
        let listing = listings
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id.as_str()))?;

        if let Some(name) = name {
            listing.name = name;
        }
        if let Some(price) = price {
            listing.price = price;
        }
        if let Some(description) = input.description {
            listing.description = description;
        }
        if let Some(category) = input.category {
            listing.category = category;
        }
        if let Some(stock) = stock {
            listing.stock = stock;
        }
        if let Some(materials) = input.materials {
            listing.materials = materials;
        }
        if let Some(images) = input.images {
            listing.images = images;
        }
        listing.updated_at = Utc::now();
        Ok(listing.clone())
    }

    /// Change a listing's status.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown listing.
    pub fn set_listing_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<SellerProduct, StoreError> {
        let mut listings = write(&self.inner.listings);
        let listing = listings
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id.as_str()))?;
        listing.status = status;
        listing.updated_at = Utc::now();
        info!(product_id = %id, status = %status, "Listing status changed");
        Ok(listing.clone())
    }

    /// Delete a listing.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown listing.
    pub fn delete_listing(&self, id: &ProductId) -> Result<SellerProduct, StoreError> {
        let mut listings = write(&self.inner.listings);
        let index = listings
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id.as_str()))?;
        info!(product_id = %id, "Listing deleted");
        Ok(listings.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::tests::seeded;

    fn new_listing(name: &str, price: Option<i64>) -> NewListing {
        NewListing {
            seller_id: ShopId::new("shop-oaxaca-barro"),
            fields: SellerProductInput {
                name: Some(name.to_string()),
                price: price.map(Decimal::from),
                stock: Some(2),
                ..SellerProductInput::default()
            },
        }
    }

    #[test]
    fn test_create_listing_starts_as_draft() {
        let store = seeded();
        let listing = store.create_listing(new_listing(" Jarro ", Some(320))).unwrap();
        assert_eq!(listing.status, ProductStatus::Draft);
        assert_eq!(listing.name, "Jarro");
        assert!(listing.id.as_str().starts_with("prod-"));
        assert!(store.listing(&listing.id).is_some());
    }

    #[test]
    fn test_create_listing_requires_name_and_price() {
        let store = seeded();
        assert!(matches!(
            store.create_listing(new_listing("  ", Some(10))),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.create_listing(new_listing("Jarro", None)),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.create_listing(new_listing("Jarro", Some(0))),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_price_and_stock_are_capped() {
        let store = seeded();
        let mut over_price = new_listing("Jarro", None);
        over_price.fields.price = Some(MAX_LISTING_PRICE + Decimal::ONE);
        assert!(matches!(
            store.create_listing(over_price),
            Err(StoreError::Invalid(_))
        ));

        let mut over_stock = new_listing("Jarro", Some(320));
        over_stock.fields.stock = Some(MAX_LISTING_STOCK + 1);
        assert!(matches!(
            store.create_listing(over_stock),
            Err(StoreError::Invalid(_))
        ));

        let listing = store.create_listing(new_listing("Jarro", Some(320))).unwrap();
        let rejected = store.update_listing(
            &listing.id,
            SellerProductInput {
                price: Some(Decimal::from(250)),
                stock: Some(u32::MAX),
                ..SellerProductInput::default()
            },
        );
        assert!(matches!(rejected, Err(StoreError::Invalid(_))));
        let unchanged = store.listing(&listing.id).unwrap();
        assert_eq!(unchanged.price, Decimal::from(320));
        assert_eq!(unchanged.stock, 2);

        let mut at_cap = new_listing("Jarro", None);
        at_cap.fields.price = Some(MAX_LISTING_PRICE);
        at_cap.fields.stock = Some(MAX_LISTING_STOCK);
        assert!(store.create_listing(at_cap).is_ok());
    }

    #[test]
    fn test_update_publish_and_delete() {
        let store = seeded();
        let listing = store.create_listing(new_listing("Jarro", Some(320))).unwrap();

        let updated = store
            .update_listing(
                &listing.id,
                SellerProductInput {
                    price: Some(Decimal::from(350)),
                    category: Some("Barro".to_string()),
                    ..SellerProductInput::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, Decimal::from(350));
        assert_eq!(updated.name, "Jarro");

        let published = store
            .set_listing_status(&listing.id, ProductStatus::Published)
            .unwrap();
        assert_eq!(published.status, ProductStatus::Published);

        store.delete_listing(&listing.id).unwrap();
        assert!(matches!(
            store.delete_listing(&listing.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_listings_for_shop_filters_status() {
        let store = seeded();
        let shop = ShopId::new("shop-oaxaca-barro");
        store.create_listing(new_listing("Jarro", Some(320))).unwrap();
        let drafts = store.listings_for_shop(&shop, Some(ProductStatus::Draft));
        assert!(!drafts.is_empty());
        assert!(drafts.iter().all(|p| p.status == ProductStatus::Draft));
    }

    #[test]
    fn test_new_listing_deserializes_flat_body() {
        let body: NewListing = serde_json::from_value(serde_json::json!({
            "sellerId": "shop-oaxaca-barro",
            "name": "Jarro",
            "price": "320.00"
        }))
        .unwrap();
        assert_eq!(body.fields.price, Some(Decimal::from(320)));
    }
}
