//! Domain core for the lendit rental marketplace.
//!
//! Pure logic with no I/O: the error taxonomy, id and timestamp aliases,
//! the booking lifecycle state machine, time-window query scopes, and
//! pagination math. Both the persistence layer and the HTTP layer depend
//! on this crate; it depends on nothing but the clock types.

pub mod booking;
pub mod error;
pub mod pagination;
pub mod types;
