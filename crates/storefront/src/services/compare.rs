//! Side-by-side product comparison list.

use papalote_core::ProductId;
use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

/// Most products that can be compared at once.
pub const MAX_COMPARE: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("You can compare up to 4 products")]
    Full,
    #[error("Product {0} is not being compared")]
    NotListed(ProductId),
}

/// Product ids selected for comparison, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareList {
    ids: Vec<ProductId>,
}

impl CompareList {
    /// # Errors
    ///
    /// Returns the session error if the store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let ids = session
            .get::<Vec<ProductId>>(session_keys::COMPARE)
            .await?
            .unwrap_or_default();
        Ok(Self { ids })
    }

    /// # Errors
    ///
    /// Returns the session error if the store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::COMPARE, &self.ids).await
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    /// Add a product. Adding one already listed is a no-op.
    ///
    /// # Errors
    ///
    /// `Full` when the list already holds [`MAX_COMPARE`] other products.
    pub fn add(&mut self, id: ProductId) -> Result<(), CompareError> {
        if self.contains(&id) {
            return Ok(());
        }
        if self.ids.len() >= MAX_COMPARE {
            return Err(CompareError::Full);
        }
        self.ids.push(id);
        Ok(())
    }

    /// # Errors
    ///
    /// `NotListed` when the product is not in the list.
    pub fn remove(&mut self, id: &ProductId) -> Result<(), CompareError> {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        if self.ids.len() == before {
            return Err(CompareError::NotListed(id.clone()));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
