//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use stratologia_core::clock::Clock;
use stratologia_core::notify::Notifier;
use stratologia_store::PgEnlistmentRepository;
use stratologia_test_support::{InMemoryStore, SteppingClock};
use tower::ServiceExt;

use stratologia_api::build_router;
use stratologia_api::state::AppState;

/// Origins reported by the debug endpoint in tests.
pub const TEST_ORIGINS: [&str; 1] = ["http://localhost:5173"];

fn stepping_clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::default())
}

fn origins() -> Vec<String> {
    TEST_ORIGINS.iter().map(|o| (*o).to_owned()).collect()
}

/// Build the full app router over an in-memory store. The clock steps one
/// minute per submission so listing order is deterministic.
pub fn build_test_app(store: Arc<InMemoryStore>, notifier: Arc<dyn Notifier>) -> Router {
    let state = AppState::new(stepping_clock(), store.clone(), store, notifier, origins());
    build_router(state)
}

/// Build the full app router over a real `PgEnlistmentRepository`.
pub fn build_pg_test_app(pool: PgPool, notifier: Arc<dyn Notifier>) -> Router {
    let repository = Arc::new(PgEnlistmentRepository::new(pool));
    let state = AppState::new(
        stepping_clock(),
        repository.clone(),
        repository,
        notifier,
        origins(),
    );
    build_router(state)
}

async fn read(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    read(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read(app, request).await
}
