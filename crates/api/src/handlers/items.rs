//! Handlers for the `/items` resource: CRUD, owner listing, free-text
//! search, and comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lendit_core::error::CoreError;
use lendit_core::pagination::Page;
use lendit_core::types::DbId;
use lendit_db::models::booking::BookingSummary;
use lendit_db::models::comment::{CommentWithAuthor, CreateComment};
use lendit_db::models::item::{CreateItem, Item, UpdateItem};
use lendit_db::repositories::{BookingRepo, CommentRepo, ItemRepo};
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

/// Request body for `POST /items`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub available: bool,
    /// Item request this listing answers, if any.
    pub request_id: Option<DbId>,
}

/// Request body for `PATCH /items/{id}`. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Request body for `POST /items/{id}/comment`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Query parameters for `GET /items/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_search_size")]
    pub size: i64,
}

fn default_search_size() -> i64 {
    10
}

/// Item detail view. Last/next booking summaries are populated only when
/// the caller owns the item.
#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<BookingSummary>,
    pub next_booking: Option<BookingSummary>,
    pub comments: Vec<CommentWithAuthor>,
}

// ---------------------------------------------------------------------------
// Directory lookup
// ---------------------------------------------------------------------------

/// Resolve an item id, failing with `NotFound` if absent.
pub async fn ensure_item_exists(pool: &DbPool, id: DbId) -> Result<Item, AppError> {
    ItemRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Item", id }))
}

/// Assemble the owner-facing view of an item: last/next approved booking
/// plus all comments.
async fn owner_detail(pool: &DbPool, item: Item) -> Result<ItemDetail, AppError> {
    let now = Utc::now();
    let last_booking = BookingRepo::last_for_item(pool, item.id, now).await?;
    let next_booking = BookingRepo::next_for_item(pool, item.id, now).await?;
    let comments = CommentRepo::list_for_item(pool, item.id).await?;
    Ok(ItemDetail {
        item,
        last_booking,
        next_booking,
        comments,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /items
pub async fn create_item(
    actor: ActorId,
    State(state): State<AppState>,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_user_exists(&state.pool, actor.0).await?;

    let create = CreateItem {
        name: input.name,
        description: input.description,
        available: input.available,
        owner_id: actor.0,
        request_id: input.request_id,
    };
    let item = ItemRepo::create(&state.pool, &create).await?;

    tracing::info!(item_id = item.id, owner_id = actor.0, "Item created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /items/{id}
///
/// Any existing caller sees the item and its comments; the owner
/// additionally sees the last and next approved booking.
pub async fn get_item(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ensure_item_exists(&state.pool, id).await?;

    let detail = if item.owner_id == actor.0 {
        owner_detail(&state.pool, item).await?
    } else {
        let comments = CommentRepo::list_for_item(&state.pool, id).await?;
        ItemDetail {
            item,
            last_booking: None,
            next_booking: None,
            comments,
        }
    };

    Ok(Json(DataResponse { data: detail }))
}

/// GET /items
///
/// The caller's own items, with booking summaries, ordered by id.
pub async fn list_my_items(
    actor: ActorId,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, actor.0).await?;
    let page = Page::from_query(params.from, params.size)?;

    let items = ItemRepo::list_by_owner(&state.pool, actor.0, page).await?;
    let mut details = Vec::with_capacity(items.len());
    for item in items {
        details.push(owner_detail(&state.pool, item).await?);
    }

    Ok(Json(DataResponse { data: details }))
}

/// PATCH /items/{id}
///
/// Owner only. A non-owner caller is told the item does not exist.
pub async fn update_item(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_user_exists(&state.pool, actor.0).await?;

    let item = ensure_item_exists(&state.pool, id).await?;
    if item.owner_id != actor.0 {
        return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
    }

    let update = UpdateItem {
        name: input.name,
        description: input.description,
        available: input.available,
    };
    let item = ItemRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /items/{id}
pub async fn delete_item(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ensure_item_exists(&state.pool, id).await?;
    if item.owner_id != actor.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Only the owner may delete an item".to_string(),
        )));
    }

    ItemRepo::delete(&state.pool, id).await?;

    tracing::info!(item_id = id, owner_id = actor.0, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /items/search?text=
///
/// Blank text returns an empty list without touching the store.
pub async fn search_items(
    _actor: ActorId,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let text = params.text.trim();
    if text.is_empty() {
        return Ok(Json(DataResponse {
            data: Vec::<Item>::new(),
        }));
    }

    let page = Page::from_query(params.from, params.size)?;
    let items = ItemRepo::search(&state.pool, text, page).await?;

    Ok(Json(DataResponse { data: items }))
}

/// POST /items/{id}/comment
///
/// Only a user with a completed approved booking of the item may comment.
pub async fn create_comment(
    actor: ActorId,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_item_exists(&state.pool, id).await?;

    let stay = BookingRepo::find_completed_stay(&state.pool, id, actor.0, Utc::now()).await?;
    if stay.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} has never rented item {id}",
            actor.0
        ))));
    }

    let create = CreateComment {
        text: input.text,
        item_id: id,
        author_id: actor.0,
    };
    let comment = CommentRepo::create(&state.pool, &create).await?;

    tracing::info!(item_id = id, author_id = actor.0, "Comment created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
