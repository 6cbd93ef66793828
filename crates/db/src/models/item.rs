//! Item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendit_core::types::{DbId, Timestamp};

/// A row from the `items` table.
///
/// `owner_id` is the authoritative ownership reference; bookings never
/// denormalize it, so owner-scoped booking queries always join through
/// this table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: DbId,
    /// Set when the item was listed in answer to an item request.
    pub request_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: DbId,
    pub request_id: Option<DbId>,
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
