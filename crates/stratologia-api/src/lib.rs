//! Stratologia API — HTTP surface for the applications backend.
//!
//! Exposed as a library so integration tests can build the same router the
//! binary serves.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::state::AppState;

/// Builds the application router with every route mounted and state applied.
/// Middleware layers are added by the caller.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::debug::router())
        .merge(routes::applications::router())
        .with_state(state)
}

/// CORS policy for the configured origins: credentials allowed, request
/// method and headers mirrored back.
///
/// Origins are expected to have been validated by [`config::Settings`];
/// anything that is not a valid header value is skipped.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
