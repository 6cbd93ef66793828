//! Item request entity model and DTOs.
//!
//! An item request is a "looking for" post; owners answer it by listing
//! items with `request_id` pointing back at it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendit_core::types::{DbId, Timestamp};

/// A row from the `item_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemRequest {
    pub id: DbId,
    pub description: String,
    pub requester_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub description: String,
    pub requester_id: DbId,
}
