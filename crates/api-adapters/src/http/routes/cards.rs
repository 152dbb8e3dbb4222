use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::{get, post}, Json, Router};
use domains::{CardId, CardUser, CardWithOwner};

use crate::http::{ApiError, AppState, PathId, Payload};

/// GET /cards/{id}
async fn get_card(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<CardId>,
) -> Result<Json<CardWithOwner>, ApiError> {
    Ok(Json(state.services.cards.get_with_owner(id).await?))
}

/// GET /cards/{id}/users
async fn card_users(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<CardId>,
) -> Result<Json<Vec<CardUser>>, ApiError> {
    Ok(Json(state.services.cards.users_of(id).await?))
}

/// POST /cards/{id}/users/{user_id}
async fn assign_user(
    State(state): State<Arc<AppState>>,
    Path((card_id, user_id)): Path<(String, String)>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<CardUser>), ApiError> {
    let row = state.services.cards.assign(&card_id, &user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cards/{id}", get(get_card))
        .route("/cards/{id}/users", get(card_users))
        .route("/cards/{id}/users/{user_id}", post(assign_user))
}
