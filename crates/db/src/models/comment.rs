//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendit_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    pub item_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub text: String,
    pub item_id: DbId,
    pub author_id: DbId,
}

/// Comment joined with its author's name, for item views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub text: String,
    pub item_id: DbId,
    pub author_name: String,
    pub created_at: Timestamp,
}
