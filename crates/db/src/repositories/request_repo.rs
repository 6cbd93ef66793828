//! Repository for the `item_requests` table.

use sqlx::PgPool;

use lendit_core::pagination::Page;
use lendit_core::types::DbId;

use crate::models::request::{CreateItemRequest, ItemRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, description, requester_id, created_at, updated_at";

/// Provides persistence and reads for item requests.
pub struct ItemRequestRepo;

impl ItemRequestRepo {
    /// Insert a new item request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateItemRequest,
    ) -> Result<ItemRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_requests (description, requester_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(&input.description)
            .bind(input.requester_id)
            .fetch_one(pool)
            .await
    }

    /// Find an item request by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ItemRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_requests WHERE id = $1");
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's own requests, newest first.
    pub async fn list_by_requester(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<ItemRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_requests
             WHERE requester_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    /// List other users' requests, newest first, paginated.
    pub async fn list_others(
        pool: &PgPool,
        user_id: DbId,
        page: Page,
    ) -> Result<Vec<ItemRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_requests
             WHERE requester_id <> $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ItemRequest>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }
}
