//! Repository for the `items` table.

use sqlx::PgPool;

use lendit_core::pagination::Page;
use lendit_core::types::DbId;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, available, owner_id, request_id, \
                       created_at, updated_at";

/// Provides CRUD and search operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (name, description, available, owner_id, request_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.available)
            .bind(input.owner_id)
            .bind(input.request_id)
            .fetch_one(pool)
            .await
    }

    /// Find an item by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the items owned by a user, ordered by id ascending.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        page: Page,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE owner_id = $1
             ORDER BY id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    /// List the items answering an item request.
    pub async fn list_by_request(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE request_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// Only available items are returned; the caller is responsible for
    /// short-circuiting blank search text.
    pub async fn search(
        pool: &PgPool,
        text: &str,
        page: Page,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE available = TRUE
               AND (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
             ORDER BY id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(text)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                available = COALESCE($4, available),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.available)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
