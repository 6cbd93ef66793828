//! Booking entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lendit_core::booking::BookingStatus;
use lendit_core::types::{DbId, Timestamp};

/// A row from the `bookings` table.
///
/// `item_id` and `booker_id` never change after creation; `status` is
/// mutated only through the decision state machine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub item_id: DbId,
    pub booker_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new booking. Persisted with status `WAITING`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub item_id: DbId,
    pub booker_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// Compact booking summary embedded in owner-facing item views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingSummary {
    pub id: DbId,
    pub booker_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}
