use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use domains::{Board, BoardId, List};

use crate::http::{ApiError, AppState, PathId, Payload};

/// GET /boards
async fn list_boards(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Board>>, ApiError> {
    Ok(Json(state.services.boards.list().await?))
}

/// POST /boards
///
/// Creates the board and its admin membership in one transaction.
async fn create_board(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let board = state.services.boards.create(&body).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /boards/{id}/lists
async fn lists_of_board(
    State(state): State<Arc<AppState>>,
    PathId(board_id): PathId<BoardId>,
) -> Result<Json<Vec<List>>, ApiError> {
    Ok(Json(state.services.lists.for_board(board_id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route("/boards/{id}/lists", get(lists_of_board))
}
