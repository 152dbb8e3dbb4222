use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use domains::{Card, List};

use crate::http::{ApiError, AppState, Payload};

/// POST /lists
async fn create_list(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<List>), ApiError> {
    let list = state.services.lists.create(&body).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// POST /lists/{id}/cards
///
/// The path id is validated together with the body, so a bad one is a 422.
async fn create_card(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let card = state.services.cards.create(&list_id, &body).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lists", post(create_list))
        .route("/lists/{id}/cards", post(create_card))
}
