use std::sync::Arc;

use domains::{validate, AppError, BoardId, List, ListRepository, NewList, Result};
use serde_json::Value;

use crate::{read_failure, write_failure};

#[derive(Clone)]
pub struct ListService {
    repo: Arc<dyn ListRepository>,
}

impl ListService {
    pub fn new(repo: Arc<dyn ListRepository>) -> Self {
        Self { repo }
    }

    /// The board reference is not checked here; the store's foreign key is
    /// the only guard.
    #[tracing::instrument(name = "lists.create", skip_all)]
    pub async fn create(&self, payload: &Value) -> Result<List> {
        let new_list = validate::<NewList>(payload).map_err(AppError::ValidationFailed)?;
        let list = self.repo.create_list(new_list).await.map_err(write_failure)?;
        tracing::info!(list_id = %list.id, board_id = %list.board_id, "list created");
        Ok(list)
    }

    #[tracing::instrument(name = "lists.for_board", skip(self))]
    pub async fn for_board(&self, board_id: BoardId) -> Result<Vec<List>> {
        self.repo.lists_by_board(board_id).await.map_err(read_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{ListId, MockListRepository, StorageError};
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_board_is_a_write_failure() {
        let mut repo = MockListRepository::new();
        repo.expect_create_list()
            .returning(|_| Err(StorageError::Constraint("lists_board_id_fkey".into())));
        let service = ListService::new(Arc::new(repo));

        let err = service
            .create(&json!({ "name": "Backlog", "boardId": 404 }))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::StorageFailure { access: domains::Access::Write, .. }
        ));
    }

    #[tokio::test]
    async fn reads_lists_of_one_board() {
        let mut repo = MockListRepository::new();
        repo.expect_lists_by_board()
            .with(eq(BoardId::new(2)))
            .times(1)
            .returning(|board_id| {
                Ok(vec![List {
                    id: ListId::new(1),
                    name: "Doing".into(),
                    board_id,
                }])
            });
        let service = ListService::new(Arc::new(repo));

        let lists = service.for_board(BoardId::new(2)).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].board_id, BoardId::new(2));
    }

    #[tokio::test]
    async fn non_integer_board_is_rejected() {
        let mut repo = MockListRepository::new();
        repo.expect_create_list().never();
        let service = ListService::new(Arc::new(repo));

        let err = service
            .create(&json!({ "name": "Backlog", "boardId": "abc" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(v) if v.touches("boardId")));
    }
}
