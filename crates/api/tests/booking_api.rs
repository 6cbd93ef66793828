//! HTTP-level integration tests for the booking lifecycle: creation
//! preconditions, the approve/reject/cancel state machine, visibility,
//! and the scoped list endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{body_json, get, patch, seed_booking, seed_item, seed_user};

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_booking_starts_waiting(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    let app = common::build_test_app(pool.clone());
    let now = chrono::Utc::now();
    let response = common::post_json(
        app,
        "/api/v1/bookings",
        Some(booker),
        serde_json::json!({
            "item_id": item,
            "start_date": (now + chrono::Duration::hours(1)).to_rfc3339(),
            "end_date": (now + chrono::Duration::hours(2)).to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "WAITING");
    assert_eq!(json["data"]["booker_id"], booker);
    assert_eq!(json["data"]["item_id"], item);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unavailable_item_cannot_be_booked(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", false).await;

    let app = common::build_test_app(pool.clone());
    let now = chrono::Utc::now();
    let response = common::post_json(
        app,
        "/api/v1/bookings",
        Some(booker),
        serde_json::json!({
            "item_id": item,
            "start_date": (now + chrono::Duration::hours(1)).to_rfc3339(),
            "end_date": (now + chrono::Duration::hours(2)).to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booking_own_item_reads_as_not_found(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    let app = common::build_test_app(pool.clone());
    let now = chrono::Utc::now();
    let response = common::post_json(
        app,
        "/api/v1/bookings",
        Some(owner),
        serde_json::json!({
            "item_id": item,
            "start_date": (now + chrono::Duration::hours(1)).to_rfc3339(),
            "end_date": (now + chrono::Duration::hours(2)).to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_window_must_end_after_start(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    let app = common::build_test_app(pool.clone());
    let now = chrono::Utc::now();
    let start = (now + chrono::Duration::hours(2)).to_rfc3339();
    let response = common::post_json(
        app,
        "/api/v1/bookings",
        Some(booker),
        serde_json::json!({
            "item_id": item,
            "start_date": start,
            "end_date": start,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_booker_reads_as_not_found(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    let app = common::build_test_app(pool.clone());
    let now = chrono::Utc::now();
    let response = common::post_json(
        app,
        "/api/v1/bookings",
        Some(999_999),
        serde_json::json!({
            "item_id": item,
            "start_date": (now + chrono::Duration::hours(1)).to_rfc3339(),
            "end_date": (now + chrono::Duration::hours(2)).to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_approves_then_cannot_redecide(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=true"),
        Some(owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "APPROVED");

    // A second decision by the owner is refused.
    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=false"),
        Some(owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // And the status is unchanged.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/bookings/{booking}"), Some(owner)).await;
    assert_eq!(body_json(response).await["data"]["status"], "APPROVED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_rejects_waiting_booking(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=false"),
        Some(owner),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "REJECTED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booker_approve_reads_as_not_found(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=true"),
        Some(booker),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booker_withdrawal_cancels(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=false"),
        Some(booker),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "CANCELED");

    // The owner can no longer decide a canceled booking.
    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=true"),
        Some(owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_elapsed_window_cannot_be_decided(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    // The boundary only requires end > start, so a window entirely in
    // the past is accepted on creation.
    let booking = seed_booking(&pool, booker, item, -120, -60).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=true"),
        Some(owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/bookings/{booking}"), Some(owner)).await;
    assert_eq!(body_json(response).await["data"]["status"], "WAITING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_outsider_cannot_decide(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let stranger = seed_user(&pool, "stranger").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = patch(
        app,
        &format!("/api/v1/bookings/{booking}?approved=true"),
        Some(stranger),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booking_visible_to_booker_and_owner_only(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let stranger = seed_user(&pool, "stranger").await;
    let item = seed_item(&pool, owner, "drill", true).await;
    let booking = seed_booking(&pool, booker, item, 60, 120).await;

    for viewer in [booker, owner] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, &format!("/api/v1/bookings/{booking}"), Some(viewer)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/bookings/{booking}"), Some(stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_identity_header_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Scoped lists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_state_token_is_rejected(pool: PgPool) {
    let booker = seed_user(&pool, "booker").await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        "/api/v1/bookings?state=UNSUPPORTED_STATUS",
        Some(booker),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Unknown state: UNSUPPORTED_STATUS"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scope_lists_for_booker_and_owner(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    let current = seed_booking(&pool, booker, item, -60, 60).await;
    let future = seed_booking(&pool, booker, item, 60, 120).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings?state=CURRENT", Some(booker)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], current);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings/owner?state=FUTURE", Some(owner)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], future);

    // The booker owns no items, so the owner view is empty for them.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings/owner?state=ALL", Some(booker)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_returns_most_recent_first(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let booker = seed_user(&pool, "booker").await;
    let item = seed_item(&pool, owner, "drill", true).await;

    seed_booking(&pool, booker, item, 60, 90).await;
    seed_booking(&pool, booker, item, 120, 180).await;
    let latest = seed_booking(&pool, booker, item, 240, 300).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings?state=ALL&from=0&size=1", Some(booker)).await;
    let json = body_json(response).await;

    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], latest);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_page_parameters_are_rejected(pool: PgPool) {
    let booker = seed_user(&pool, "booker").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings?from=-1", Some(booker)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/bookings?size=0", Some(booker)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
