//! Diagnostics for deployment problems.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// The CORS origins the server is enforcing.
#[derive(Debug, Serialize)]
pub struct CorsReport {
    /// Effective allow-list.
    pub allow_origins: Vec<String>,
}

/// GET /_debug/cors
async fn cors_report(State(state): State<AppState>) -> Json<CorsReport> {
    Json(CorsReport {
        allow_origins: state.allow_origins.to_vec(),
    })
}

/// Returns the diagnostics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/_debug/cors", get(cors_report))
}
