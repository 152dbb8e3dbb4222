//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::AppState;

/// Health check response, including connection accounting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub checked_out: u64,
    pub released: u64,
    pub in_use: u64,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.pool.snapshot();
    Json(HealthResponse {
        status: "ok",
        storage: state.storage,
        checked_out: snapshot.checked_out,
        released: snapshot.released,
        in_use: snapshot.in_use(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
