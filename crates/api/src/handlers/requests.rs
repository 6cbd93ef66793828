//! Handlers for the `/requests` resource: "looking for" posts that
//! owners answer by listing items against them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lendit_core::error::CoreError;
use lendit_core::pagination::Page;
use lendit_core::types::DbId;
use lendit_db::models::item::Item;
use lendit_db::models::request::{CreateItemRequest, ItemRequest};
use lendit_db::repositories::{ItemRepo, ItemRequestRepo};
use lendit_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::users::ensure_user_exists;
use crate::middleware::identity::ActorId;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestBody {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// An item request together with the items listed in answer to it.
#[derive(Debug, Serialize)]
pub struct ItemRequestDetail {
    #[serde(flatten)]
    pub request: ItemRequest,
    pub items: Vec<Item>,
}

async fn with_answers(pool: &DbPool, request: ItemRequest) -> Result<ItemRequestDetail, AppError> {
    let items = ItemRepo::list_by_request(pool, request.id).await?;
    Ok(ItemRequestDetail { request, items })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /requests
pub async fn create_request(
    actor: ActorId,
    State(state): State<AppState>,
    Json(input): Json<CreateRequestBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_user_exists(&state.pool, actor.0).await?;

    let create = CreateItemRequest {
        description: input.description,
        requester_id: actor.0,
    };
    let request = ItemRequestRepo::create(&state.pool, &create).await?;

    tracing::info!(request_id = request.id, requester_id = actor.0, "Item request created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /requests
///
/// The caller's own requests, newest first, each with its answers.
pub async fn list_my_requests(
    actor: ActorId,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let requests = ItemRequestRepo::list_by_requester(&state.pool, actor.0).await?;
    let mut details = Vec::with_capacity(requests.len());
    for request in requests {
        details.push(with_answers(&state.pool, request).await?);
    }

    Ok(Json(DataResponse { data: details }))
}

/// GET /requests/all?from=&size=
///
/// Other users' requests, newest first, paginated.
pub async fn list_other_requests(
    actor: ActorId,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;
    let page = Page::from_query(params.from, params.size)?;

    let requests = ItemRequestRepo::list_others(&state.pool, actor.0, page).await?;
    let mut details = Vec::with_capacity(requests.len());
    for request in requests {
        details.push(with_answers(&state.pool, request).await?);
    }

    Ok(Json(DataResponse { data: details }))
}

/// GET /requests/{id}
pub async fn get_request(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;

    let request = ItemRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ItemRequest",
            id,
        }))?;
    let detail = with_answers(&state.pool, request).await?;

    Ok(Json(DataResponse { data: detail }))
}
