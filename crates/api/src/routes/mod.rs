pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                          list, create
/// /users/{id}                     get, update (PATCH), delete
///
/// /items                          caller's items with booking summaries, create
/// /items/search                   substring search over available items
/// /items/{id}                     get detail, update (PATCH, owner), delete (owner)
/// /items/{id}/comment             create comment (completed stay required)
///
/// /bookings                       caller's bookings (?state=&from=&size=), create
/// /bookings/owner                 bookings on caller's items (?state=&from=&size=)
/// /bookings/{id}                  get (booker/owner), decide (PATCH ?approved=)
///
/// /requests                       caller's requests with answers, create
/// /requests/all                   other users' requests (?from=&size=)
/// /requests/{id}                  get with answers
/// ```
///
/// All routes except `/users` identify the caller via the `X-User-Id`
/// header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // -- Users --
        .route(
            "/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // -- Items --
        .route(
            "/items",
            post(handlers::items::create_item).get(handlers::items::list_my_items),
        )
        .route("/items/search", get(handlers::items::search_items))
        .route(
            "/items/{id}",
            get(handlers::items::get_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route("/items/{id}/comment", post(handlers::items::create_comment))
        // -- Bookings --
        .route(
            "/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route(
            "/bookings/owner",
            get(handlers::bookings::list_owner_bookings),
        )
        .route(
            "/bookings/{id}",
            get(handlers::bookings::get_booking).patch(handlers::bookings::decide_booking),
        )
        // -- Item requests --
        .route(
            "/requests",
            post(handlers::requests::create_request).get(handlers::requests::list_my_requests),
        )
        .route(
            "/requests/all",
            get(handlers::requests::list_other_requests),
        )
        .route("/requests/{id}", get(handlers::requests::get_request))
}
