//! Maker verification requests.

use chrono::Utc;
use papalote_core::models::VerificationRequest;
use papalote_core::{ShopId, VerificationId, VerificationStatus};
use tracing::info;

use super::{MarketStore, StoreError, read, write};

impl MarketStore {
    /// Submit a verification request for a shop.
    ///
    /// # Errors
    ///
    /// `Conflict` when the shop already has a pending request.
    pub fn submit_verification(
        &self,
        shop_id: ShopId,
        documents: Vec<String>,
        notes: String,
    ) -> Result<VerificationRequest, StoreError> {
        let mut requests = write(&self.inner.verifications);
        if requests
            .iter()
            .any(|r| r.shop_id == shop_id && r.status == VerificationStatus::Pending)
        {
            return Err(StoreError::Conflict(
                "A verification request is already pending".to_string(),
            ));
        }

        let request = VerificationRequest {
            id: VerificationId::generate(),
            shop_id,
            documents: documents
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            notes: notes.trim().to_string(),
            status: VerificationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
        };
        info!(request_id = %request.id, shop_id = %request.shop_id, "Verification submitted");
        requests.push(request.clone());
        Ok(request)
    }

    /// Most recent verification request for a shop.
    #[must_use]
    pub fn latest_verification(&self, shop_id: &ShopId) -> Option<VerificationRequest> {
        read(&self.inner.verifications)
            .iter()
            .filter(|r| &r.shop_id == shop_id)
            .max_by_key(|r| r.submitted_at)
            .cloned()
    }
}
