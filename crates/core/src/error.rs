use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Some authorization failures are deliberately reported as [`NotFound`]
/// (booking one's own item, viewing a booking one has no relation to) so
/// that a prober cannot distinguish "does not exist" from "not yours".
///
/// [`NotFound`]: CoreError::NotFound
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
