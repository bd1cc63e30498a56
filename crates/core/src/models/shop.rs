//! Maker shops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, ShopId};

/// An artisan's shop profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub maker_name: String,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub bio: String,
    /// Primary craft, e.g. "Textiles" or "Barro negro".
    pub craft: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub rating: f32,
    pub contact_email: Email,
    #[serde(default)]
    pub avatar: Option<String>,
    pub joined_at: DateTime<Utc>,
}
