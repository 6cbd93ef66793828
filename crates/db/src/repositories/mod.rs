//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument. The booking decision
//! methods instead take an open transaction so the read-evaluate-write
//! cycle holds a row lock until commit.

pub mod booking_repo;
pub mod comment_repo;
pub mod item_repo;
pub mod request_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use comment_repo::CommentRepo;
pub use item_repo::ItemRepo;
pub use request_repo::ItemRequestRepo;
pub use user_repo::UserRepo;
