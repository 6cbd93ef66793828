//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) where the entity supports patches

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;
