//! Shared helpers for API integration tests.
//!
//! Tests drive the full production router (middleware stack included)
//! via `tower::ServiceExt::oneshot`, without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;

use lendit_api::config::ServerConfig;
use lendit_api::router::build_app_router;
use lendit_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a request. `user_id` populates the `X-User-Id` identity header
/// when present; `body` is serialized as JSON.
pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> Response {
    use tower::ServiceExt;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("X-User-Id", id.to_string());
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, user_id: Option<i64>) -> Response {
    request(app, "GET", uri, user_id, None).await
}

pub async fn post_json(app: Router, uri: &str, user_id: Option<i64>, body: Value) -> Response {
    request(app, "POST", uri, user_id, Some(body)).await
}

pub async fn patch(app: Router, uri: &str, user_id: Option<i64>) -> Response {
    request(app, "PATCH", uri, user_id, None).await
}

pub async fn patch_json(app: Router, uri: &str, user_id: Option<i64>, body: Value) -> Response {
    request(app, "PATCH", uri, user_id, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user_id: Option<i64>) -> Response {
    request(app, "DELETE", uri, user_id, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding through the API
// ---------------------------------------------------------------------------

/// Create a user via the API, returning its id.
pub async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users",
        None,
        serde_json::json!({"name": name, "email": format!("{name}@example.com")}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an item via the API, returning its id.
pub async fn seed_item(pool: &PgPool, owner_id: i64, name: &str, available: bool) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/items",
        Some(owner_id),
        serde_json::json!({
            "name": name,
            "description": format!("{name} for rent"),
            "available": available,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a booking via the API with a window offset from now by whole
/// minutes, returning its id.
pub async fn seed_booking(
    pool: &PgPool,
    booker_id: i64,
    item_id: i64,
    start_mins: i64,
    end_mins: i64,
) -> i64 {
    let now = chrono::Utc::now();
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/bookings",
        Some(booker_id),
        serde_json::json!({
            "item_id": item_id,
            "start_date": (now + chrono::Duration::minutes(start_mins)).to_rfc3339(),
            "end_date": (now + chrono::Duration::minutes(end_mins)).to_rfc3339(),
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
