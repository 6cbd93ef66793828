//! Handlers for the `/bookings` resource: the booking lifecycle.
//!
//! Creation validates availability and ownership; the decision endpoint
//! applies the approve/reject/cancel state machine inside a transaction
//! holding a row lock, so a concurrent decision cannot race past the
//! already-decided check.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use lendit_core::booking::{self, ActorRelation, BookingScope, DecisionError};
use lendit_core::error::CoreError;
use lendit_core::pagination::Page;
use lendit_core::types::{DbId, Timestamp};
use lendit_db::models::booking::CreateBooking;
use lendit_db::repositories::BookingRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::items::ensure_item_exists;
use crate::handlers::users::ensure_user_exists;
use crate::middleware::identity::ActorId;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
///
/// The window check (`end_date` strictly after `start_date`) happens
/// here, at the boundary, before the engine is invoked.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "window_is_ordered"))]
pub struct CreateBookingRequest {
    pub item_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

fn window_is_ordered(req: &CreateBookingRequest) -> Result<(), ValidationError> {
    if req.end_date > req.start_date {
        Ok(())
    } else {
        let mut err = ValidationError::new("window");
        err.message = Some("end_date must be strictly after start_date".into());
        Err(err)
    }
}

/// Query parameter for `PATCH /bookings/{id}?approved=`.
#[derive(Debug, Deserialize)]
pub struct DecideParams {
    pub approved: bool,
}

/// Query parameters for the booking list endpoints.
#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    #[serde(default = "default_scope")]
    pub state: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_scope() -> String {
    "ALL".to_string()
}

fn default_page_size() -> i64 {
    10
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /bookings
pub async fn create_booking(
    actor: ActorId,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_user_exists(&state.pool, actor.0).await?;

    let item = ensure_item_exists(&state.pool, input.item_id).await?;
    if !item.available {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Item {} is not available for booking",
            item.id
        ))));
    }
    // An owner probing their own item is told it does not exist.
    if item.owner_id == actor.0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item.id,
        }));
    }

    let create = CreateBooking {
        item_id: input.item_id,
        booker_id: actor.0,
        start_date: input.start_date,
        end_date: input.end_date,
    };
    let booking = BookingRepo::create(&state.pool, &create).await?;

    tracing::info!(
        booking_id = booking.id,
        item_id = booking.item_id,
        booker_id = actor.0,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// PATCH /bookings/{id}?approved=
///
/// Runs the read-evaluate-write cycle in one transaction; any refusal
/// rolls back and leaves the store unchanged.
pub async fn decide_booking(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DecideParams>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let current = BookingRepo::find_by_id_locked(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    let item = ensure_item_exists(&state.pool, current.item_id).await?;

    let relation = if current.booker_id == actor.0 {
        ActorRelation::Booker
    } else if item.owner_id == actor.0 {
        ActorRelation::Owner
    } else {
        ActorRelation::Other
    };
    let elapsed = current.end_date < now;

    let next = booking::decide(current.status, relation, params.approved, elapsed)
        .map_err(|err| decision_error_to_app(err, id))?;

    let updated = BookingRepo::set_status(&mut *tx, id, next).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = id,
        user_id = actor.0,
        status = %updated.status,
        "Booking decided"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// GET /bookings/{id}
///
/// Visible to the booker and the item's owner; anyone else is told the
/// booking does not exist.
pub async fn get_booking(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    let item = ensure_item_exists(&state.pool, booking.item_id).await?;

    if booking.booker_id != actor.0 && item.owner_id != actor.0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }));
    }

    Ok(Json(DataResponse { data: booking }))
}

/// GET /bookings?state=&from=&size=
///
/// The caller's own bookings under the given scope.
pub async fn list_bookings(
    actor: ActorId,
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let scope: BookingScope = params.state.parse()?;
    let page = Page::from_query(params.from, params.size)?;

    let bookings =
        BookingRepo::list_for_booker(&state.pool, actor.0, scope, Utc::now(), page).await?;

    Ok(Json(DataResponse { data: bookings }))
}

/// GET /bookings/owner?state=&from=&size=
///
/// Bookings on the caller's items under the given scope.
pub async fn list_owner_bookings(
    actor: ActorId,
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let scope: BookingScope = params.state.parse()?;
    let page = Page::from_query(params.from, params.size)?;

    let bookings =
        BookingRepo::list_for_owner(&state.pool, actor.0, scope, Utc::now(), page).await?;

    Ok(Json(DataResponse { data: bookings }))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a refused decision onto the wire taxonomy.
///
/// A booker trying to approve is told the booking does not exist, hiding
/// the approval surface from everyone but the owner; every other refusal
/// is a plain validation failure.
fn decision_error_to_app(err: DecisionError, booking_id: DbId) -> AppError {
    match err {
        DecisionError::ApproveByBooker => AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }),
        DecisionError::WindowElapsed
        | DecisionError::AlreadyDecided
        | DecisionError::Canceled
        | DecisionError::NotOwner => AppError::Core(CoreError::Validation(err.to_string())),
    }
}
