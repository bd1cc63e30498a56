//! Recently viewed products.

use papalote_core::ProductId;
use tower_sessions::Session;

use crate::models::session_keys;

/// How many product ids are remembered.
pub const MAX_RECENT: usize = 10;

/// Push `id` to the front of `ids`, dropping an earlier occurrence and
/// anything past [`MAX_RECENT`].
pub fn push_front(ids: &mut Vec<ProductId>, id: ProductId) {
    ids.retain(|existing| existing != &id);
    ids.insert(0, id);
    ids.truncate(MAX_RECENT);
}

/// Recently viewed ids, newest first.
///
/// # Errors
///
/// Returns the session error if the store fails.
pub async fn load(session: &Session) -> Result<Vec<ProductId>, tower_sessions::session::Error> {
    Ok(session
        .get::<Vec<ProductId>>(session_keys::RECENTLY_VIEWED)
        .await?
        .unwrap_or_default())
}

/// Record a product view and return the updated list.
///
/// # Errors
///
/// Returns the session error if the store fails.
pub async fn record(
    session: &Session,
    id: ProductId,
) -> Result<Vec<ProductId>, tower_sessions::session::Error> {
    let mut ids = load(session).await?;
    push_front(&mut ids, id);
    session.insert(session_keys::RECENTLY_VIEWED, &ids).await?;
    Ok(ids)
}
