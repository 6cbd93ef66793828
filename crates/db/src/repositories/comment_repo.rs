//! Repository for the `comments` table.

use sqlx::PgPool;

use lendit_core::types::DbId;

use crate::models::comment::{CommentWithAuthor, CreateComment};

/// Provides persistence and reads for item comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning it joined with the author's name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
    ) -> Result<CommentWithAuthor, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "INSERT INTO comments (text, item_id, author_id)
             VALUES ($1, $2, $3)
             RETURNING id, text, item_id,
                       (SELECT name FROM users WHERE id = $3) AS author_name,
                       created_at",
        )
        .bind(&input.text)
        .bind(input.item_id)
        .bind(input.author_id)
        .fetch_one(pool)
        .await
    }

    /// List an item's comments with author names, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.text, c.item_id, u.name AS author_name, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.item_id = $1
             ORDER BY c.created_at DESC",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await
    }
}
