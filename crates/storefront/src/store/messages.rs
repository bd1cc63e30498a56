//! Buyer-to-seller messages.

use chrono::Utc;
use papalote_core::models::{MessageReply, SellerMessage};
use papalote_core::{MessageId, ShopId};

use super::{MarketStore, StoreError, read, write};

impl MarketStore {
    /// Messages sent to a shop, newest first.
    #[must_use]
    pub fn messages_for_shop(&self, shop_id: &ShopId, unread_only: bool) -> Vec<SellerMessage> {
        let mut messages: Vec<SellerMessage> = read(&self.inner.messages)
            .iter()
            .filter(|m| &m.shop_id == shop_id && (!unread_only || !m.read))
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        messages
    }

    /// Number of unread messages for a shop.
    #[must_use]
    pub fn unread_count(&self, shop_id: &ShopId) -> usize {
        read(&self.inner.messages)
            .iter()
            .filter(|m| &m.shop_id == shop_id && !m.read)
            .count()
    }

    /// Mark a message read.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown message.
    pub fn mark_message_read(&self, id: &MessageId) -> Result<SellerMessage, StoreError> {
        let mut messages = write(&self.inner.messages);
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::not_found("Message", id.as_str()))?;
        message.read = true;
        Ok(message.clone())
    }

    /// Append a seller reply. Replying also marks the message read.
    ///
    /// # Errors
    ///
    /// `Invalid` for an empty body, `NotFound` for an unknown message.
    pub fn reply_to_message(
        &self,
        id: &MessageId,
        body: &str,
    ) -> Result<SellerMessage, StoreError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(StoreError::Invalid("Reply body is required".to_string()));
        }

        let mut messages = write(&self.inner.messages);
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::not_found("Message", id.as_str()))?;
        message.replies.push(MessageReply {
            body: body.to_string(),
            sent_at: Utc::now(),
        });
        message.read = true;
        Ok(message.clone())
    }
}
