//! Actor identity extractor.
//!
//! The service sits behind a gateway that authenticates callers and
//! forwards the caller's user id in the `X-User-Id` header. Handlers
//! that act on behalf of a user take [`ActorId`] as an extractor
//! parameter; the id is trusted as-is but its existence in the user
//! directory is still checked per operation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lendit_core::error::CoreError;
use lendit_core::types::DbId;

use crate::error::AppError;

/// Name of the trusted identity header.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling user's id, extracted from the `X-User-Id` header.
///
/// ```ignore
/// async fn my_handler(actor: ActorId) -> AppResult<Json<()>> {
///     tracing::info!(user_id = actor.0, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub DbId);

impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-User-Id header".into()))
            })?;

        let id: DbId = raw.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "X-User-Id must be a numeric user id".into(),
            ))
        })?;

        Ok(ActorId(id))
    }
}
