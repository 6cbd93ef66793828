//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use lendit_core::error::CoreError;
use lendit_core::types::DbId;
use lendit_db::models::user::{CreateUser, UpdateUser, User};
use lendit_db::repositories::UserRepo;
use lendit_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Request body for `PATCH /users/{id}`. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Directory lookup
// ---------------------------------------------------------------------------

/// Resolve a user id, failing with `NotFound` if absent.
///
/// Used by every handler that acts on behalf of a user, so a missing
/// actor fails fast with a uniform error shape.
pub async fn ensure_user_exists(pool: &DbPool, id: DbId) -> Result<User, AppError> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "User", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let create = CreateUser {
        name: input.name,
        email: input.email,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = ensure_user_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let update = UpdateUser {
        name: input.name,
        email: input.email,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}
