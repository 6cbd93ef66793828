//! Repository for the `bookings` table.
//!
//! The item owner is never denormalized onto a booking row; every
//! owner-scoped query joins through `items`, so an ownership change is
//! reflected immediately.

use sqlx::{PgConnection, PgPool};

use lendit_core::booking::{BookingScope, BookingStatus};
use lendit_core::pagination::Page;
use lendit_core::types::{DbId, Timestamp};

use crate::models::booking::{Booking, BookingSummary, CreateBooking};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, item_id, booker_id, start_date, end_date, status, \
                       created_at, updated_at";

/// Column list qualified for queries joining `bookings b` with `items i`.
const B_COLUMNS: &str = "b.id, b.item_id, b.booker_id, b.start_date, b.end_date, b.status, \
                         b.created_at, b.updated_at";

/// Provides persistence and filtered reads for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking with status `WAITING`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (item_id, booker_id, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.item_id)
            .bind(input.booker_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(BookingStatus::Waiting.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a booking by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking by ID and lock its row for the rest of the
    /// transaction (`SELECT ... FOR UPDATE`).
    ///
    /// Used by the decision cycle so a concurrent decide on the same
    /// booking cannot race past the already-decided check.
    pub async fn find_by_id_locked(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Set a booking's status, returning the updated row.
    ///
    /// Must run on the same transaction that locked the row.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }

    /// List a booker's bookings under the given scope, most recent
    /// `start_date` first.
    pub async fn list_for_booker(
        pool: &PgPool,
        booker_id: DbId,
        scope: BookingScope,
        now: Timestamp,
        page: Page,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match scope {
            BookingScope::All => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings
                     WHERE booker_id = $1
                     ORDER BY start_date DESC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(booker_id)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Current => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings
                     WHERE booker_id = $1 AND start_date <= $2 AND end_date > $2
                     ORDER BY start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(booker_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Past => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings
                     WHERE booker_id = $1 AND end_date < $2
                     ORDER BY start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(booker_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Future => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings
                     WHERE booker_id = $1 AND start_date > $2
                     ORDER BY start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(booker_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Waiting | BookingScope::Rejected => {
                let status = if scope == BookingScope::Waiting {
                    BookingStatus::Waiting
                } else {
                    BookingStatus::Rejected
                };
                let query = format!(
                    "SELECT {COLUMNS} FROM bookings
                     WHERE booker_id = $1 AND status = $2
                     ORDER BY start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(booker_id)
                    .bind(status.as_str())
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List the bookings on items owned by a user under the given scope,
    /// most recent `start_date` first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        scope: BookingScope,
        now: Timestamp,
        page: Page,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match scope {
            BookingScope::All => {
                let query = format!(
                    "SELECT {B_COLUMNS} FROM bookings b
                     JOIN items i ON i.id = b.item_id
                     WHERE i.owner_id = $1
                     ORDER BY b.start_date DESC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(owner_id)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Current => {
                let query = format!(
                    "SELECT {B_COLUMNS} FROM bookings b
                     JOIN items i ON i.id = b.item_id
                     WHERE i.owner_id = $1 AND b.start_date <= $2 AND b.end_date > $2
                     ORDER BY b.start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(owner_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Past => {
                let query = format!(
                    "SELECT {B_COLUMNS} FROM bookings b
                     JOIN items i ON i.id = b.item_id
                     WHERE i.owner_id = $1 AND b.end_date < $2
                     ORDER BY b.start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(owner_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Future => {
                let query = format!(
                    "SELECT {B_COLUMNS} FROM bookings b
                     JOIN items i ON i.id = b.item_id
                     WHERE i.owner_id = $1 AND b.start_date > $2
                     ORDER BY b.start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(owner_id)
                    .bind(now)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
            BookingScope::Waiting | BookingScope::Rejected => {
                let status = if scope == BookingScope::Waiting {
                    BookingStatus::Waiting
                } else {
                    BookingStatus::Rejected
                };
                let query = format!(
                    "SELECT {B_COLUMNS} FROM bookings b
                     JOIN items i ON i.id = b.item_id
                     WHERE i.owner_id = $1 AND b.status = $2
                     ORDER BY b.start_date DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(owner_id)
                    .bind(status.as_str())
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// The latest approved booking for an item that started strictly
    /// before `now`.
    pub async fn last_for_item(
        pool: &PgPool,
        item_id: DbId,
        now: Timestamp,
    ) -> Result<Option<BookingSummary>, sqlx::Error> {
        sqlx::query_as::<_, BookingSummary>(
            "SELECT id, booker_id, start_date, end_date FROM bookings
             WHERE item_id = $1 AND start_date < $2 AND status = $3
             ORDER BY start_date DESC
             LIMIT 1",
        )
        .bind(item_id)
        .bind(now)
        .bind(BookingStatus::Approved.as_str())
        .fetch_optional(pool)
        .await
    }

    /// The earliest approved booking for an item that starts strictly
    /// after `now`.
    pub async fn next_for_item(
        pool: &PgPool,
        item_id: DbId,
        now: Timestamp,
    ) -> Result<Option<BookingSummary>, sqlx::Error> {
        sqlx::query_as::<_, BookingSummary>(
            "SELECT id, booker_id, start_date, end_date FROM bookings
             WHERE item_id = $1 AND start_date > $2 AND status = $3
             ORDER BY start_date ASC
             LIMIT 1",
        )
        .bind(item_id)
        .bind(now)
        .bind(BookingStatus::Approved.as_str())
        .fetch_optional(pool)
        .await
    }

    /// An approved booking by `booker_id` for `item_id` whose window has
    /// already closed. This is the gate for comment authorship: a user
    /// may comment on an item only if such a booking exists.
    pub async fn find_completed_stay(
        pool: &PgPool,
        item_id: DbId,
        booker_id: DbId,
        now: Timestamp,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE item_id = $1 AND booker_id = $2 AND end_date < $3 AND status = $4
             ORDER BY end_date DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(item_id)
            .bind(booker_id)
            .bind(now)
            .bind(BookingStatus::Approved.as_str())
            .fetch_optional(pool)
            .await
    }
}
