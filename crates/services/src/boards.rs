use std::sync::Arc;

use domains::{validate, AppError, Board, BoardRepository, NewBoard, Result};
use serde_json::Value;

use crate::{read_failure, write_failure};

#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn BoardRepository>,
}

impl BoardService {
    pub fn new(repo: Arc<dyn BoardRepository>) -> Self {
        Self { repo }
    }

    /// Creates a board together with its admin link.
    #[tracing::instrument(name = "boards.create", skip_all)]
    pub async fn create(&self, payload: &Value) -> Result<Board> {
        let new_board = validate::<NewBoard>(payload).map_err(AppError::ValidationFailed)?;
        let board = self.repo.create_board(new_board).await.map_err(write_failure)?;
        tracing::info!(board_id = %board.id, admin_user_id = %board.admin_user_id, "board created");
        Ok(board)
    }

    #[tracing::instrument(name = "boards.list", skip_all)]
    pub async fn list(&self) -> Result<Vec<Board>> {
        self.repo.list_boards().await.map_err(read_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{BoardId, MockBoardRepository, StorageError, UserId};
    use serde_json::json;

    #[tokio::test]
    async fn missing_admin_is_rejected_before_any_write() {
        let mut repo = MockBoardRepository::new();
        repo.expect_create_board().never();
        let service = BoardService::new(Arc::new(repo));

        let err = service.create(&json!({ "name": "Sprint" })).await.unwrap_err();
        match err {
            AppError::ValidationFailed(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations.touches("adminUserId"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn passes_validated_board_to_repository() {
        let mut repo = MockBoardRepository::new();
        repo.expect_create_board()
            .withf(|b| b.name == "Sprint" && b.admin_user_id == UserId::new(4))
            .times(1)
            .returning(|b| {
                Ok(Board {
                    id: BoardId::new(10),
                    name: b.name,
                    admin_user_id: b.admin_user_id,
                })
            });
        let service = BoardService::new(Arc::new(repo));

        let board = service
            .create(&json!({ "name": "Sprint", "adminUserId": "4" }))
            .await
            .unwrap();
        assert_eq!(board.id, BoardId::new(10));
        assert_eq!(board.admin_user_id, UserId::new(4));
    }

    #[tokio::test]
    async fn aborted_composite_write_is_reported_as_such() {
        let mut repo = MockBoardRepository::new();
        repo.expect_create_board().returning(|_| {
            Err(StorageError::aborted(
                "create_board",
                StorageError::Constraint("board_users_user_id_fkey".into()),
            ))
        });
        let service = BoardService::new(Arc::new(repo));

        let err = service
            .create(&json!({ "name": "Sprint", "adminUserId": 99 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TransactionAborted { .. }));
    }
}
