//! Health check route.

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// `GET /health` -> `{ "status": "ok" }`. Does not touch the database.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
