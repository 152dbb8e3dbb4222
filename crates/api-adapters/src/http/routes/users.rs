use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use domains::User;

use crate::http::{ApiError, AppState, Payload};

/// GET /users
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.services.users.list().await?))
}

/// POST /users
async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.services.users.create(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
