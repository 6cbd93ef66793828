//! Booking lifecycle: status enum, the decision state machine, and the
//! time-window query scopes.
//!
//! The decision logic is a pure function over the booking's current
//! status, the caller's relation to it, the approve flag, and whether the
//! booking window has elapsed. The HTTP layer resolves the relation and
//! the clock, then maps [`DecisionError`] onto the wire taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking.
///
/// A booking is created `Waiting` and moves at most once into a terminal
/// status via [`decide`]; no transition is ever reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Awaiting the owner's decision.
    Waiting,
    /// Confirmed by the item's owner.
    Approved,
    /// Declined by the item's owner.
    Rejected,
    /// Withdrawn by the booker.
    Canceled,
}

impl BookingStatus {
    /// Stored representation (also the wire token).
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision state machine
// ---------------------------------------------------------------------------

/// The caller's relation to a booking, resolved before deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRelation {
    /// The caller created the booking.
    Booker,
    /// The caller owns the booked item.
    Owner,
    /// Neither booker nor owner.
    Other,
}

/// Why a decision was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("the booking window has already elapsed")]
    WindowElapsed,
    #[error("only the owner of the item may approve a booking")]
    ApproveByBooker,
    #[error("a decision on this booking has already been made")]
    AlreadyDecided,
    #[error("the booking was canceled")]
    Canceled,
    #[error("only the owner of the item may decide a booking")]
    NotOwner,
}

/// Evaluate a single approve/reject/cancel decision.
///
/// Precedence: an elapsed window refuses everything; then the booker
/// branch, then the owner branch, then everyone else. The booker branch
/// is deliberately unguarded by status — a booker may withdraw an already
/// approved booking as long as the window has not elapsed.
pub fn decide(
    current: BookingStatus,
    relation: ActorRelation,
    approve: bool,
    window_elapsed: bool,
) -> Result<BookingStatus, DecisionError> {
    if window_elapsed {
        return Err(DecisionError::WindowElapsed);
    }

    match relation {
        ActorRelation::Booker => {
            if approve {
                Err(DecisionError::ApproveByBooker)
            } else {
                Ok(BookingStatus::Canceled)
            }
        }
        ActorRelation::Owner if current != BookingStatus::Canceled => {
            if current != BookingStatus::Waiting {
                Err(DecisionError::AlreadyDecided)
            } else if approve {
                Ok(BookingStatus::Approved)
            } else {
                Ok(BookingStatus::Rejected)
            }
        }
        // Owner of a canceled booking falls through here too: a canceled
        // booking must report a distinct error from an unknown actor.
        _ => {
            if current == BookingStatus::Canceled {
                Err(DecisionError::Canceled)
            } else {
                Err(DecisionError::NotOwner)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Query scopes
// ---------------------------------------------------------------------------

/// Time-window / status filter for booking list queries.
///
/// Applied identically to the booker view and the item-owner view.
/// Tokens are case-sensitive; anything outside the six listed values is a
/// caller error and is rejected before the store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// No filter beyond the actor.
    All,
    /// `start_date <= now < end_date`.
    Current,
    /// `end_date < now`.
    Past,
    /// `start_date > now`.
    Future,
    /// `status = WAITING`.
    Waiting,
    /// `status = REJECTED`.
    Rejected,
}

impl FromStr for BookingScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingScope::All),
            "CURRENT" => Ok(BookingScope::Current),
            "PAST" => Ok(BookingScope::Past),
            "FUTURE" => Ok(BookingScope::Future),
            "WAITING" => Ok(BookingScope::Waiting),
            "REJECTED" => Ok(BookingScope::Rejected),
            other => Err(CoreError::Validation(format!("Unknown state: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
