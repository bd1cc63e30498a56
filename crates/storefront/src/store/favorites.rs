//! Buyer favorites.

use chrono::Utc;
use papalote_core::models::FavoriteProduct;
use papalote_core::{BuyerId, ProductId};

use super::{MarketStore, StoreError, read, write};

impl MarketStore {
    /// A buyer's favorites, most recently added first.
    #[must_use]
    pub fn favorites(&self, buyer_id: &BuyerId) -> Vec<FavoriteProduct> {
        let mut favorites: Vec<FavoriteProduct> = read(&self.inner.favorites)
            .iter()
            .filter(|f| &f.buyer_id == buyer_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        favorites
    }

    /// Add a favorite. Adding an existing favorite returns it unchanged.
    pub fn add_favorite(&self, buyer_id: BuyerId, product_id: ProductId) -> FavoriteProduct {
        let mut favorites = write(&self.inner.favorites);
        if let Some(existing) = favorites
            .iter()
            .find(|f| f.buyer_id == buyer_id && f.product_id == product_id)
        {
            return existing.clone();
        }
        let favorite = FavoriteProduct {
            buyer_id,
            product_id,
            added_at: Utc::now(),
        };
        favorites.push(favorite.clone());
        favorite
    }

    /// Remove a favorite.
    ///
    /// # Errors
    ///
    /// `NotFound` when the buyer has not favorited the product.
    pub fn remove_favorite(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<(), StoreError> {
        let mut favorites = write(&self.inner.favorites);
        let index = favorites
            .iter()
            .position(|f| &f.buyer_id == buyer_id && &f.product_id == product_id)
            .ok_or_else(|| StoreError::not_found("Favorite", product_id.as_str()))?;
        favorites.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_and_remove() {
        let store = MarketStore::default();
        let buyer = BuyerId::new("buyer-1");
        let product = ProductId::new("prod-1");

        let first = store.add_favorite(buyer.clone(), product.clone());
        let second = store.add_favorite(buyer.clone(), product.clone());
        assert_eq!(first, second);
        assert_eq!(store.favorites(&buyer).len(), 1);

        assert!(store.remove_favorite(&buyer, &product).is_ok());
        assert!(matches!(
            store.remove_favorite(&buyer, &product),
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.favorites(&buyer).is_empty());
    }
}
