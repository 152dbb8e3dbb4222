//! Repository port contracts against the in-memory store, plus a check that
//! no service touches its port when the payload is invalid.

use std::sync::Arc;

use domains::{
    AppError, MockBoardRepository, MockCardRepository, MockListRepository, MockUserRepository,
};
use integration_tests::contracts;
use serde_json::json;
use services::{BoardService, CardService, ListService, UserService};
use storage_adapters::InMemoryStore;

#[tokio::test]
async fn memory_store_links_board_admin() {
    contracts::board_creation_links_its_admin(&InMemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_rolls_back_board() {
    contracts::failed_board_creation_leaves_no_board(&InMemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_writes_card_owner() {
    contracts::card_owner_is_written_with_the_card(&InMemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_rolls_back_card() {
    contracts::failed_owner_insert_leaves_no_card(&InMemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_enforces_assignment_rules() {
    contracts::assignments_are_unique_and_ordered(&InMemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_reports_absent_rows() {
    contracts::unknown_ids_read_as_absent(&InMemoryStore::new()).await;
}

fn is_validation(result: Result<impl Sized, AppError>) -> bool {
    matches!(result, Err(AppError::ValidationFailed(_)))
}

#[tokio::test]
async fn invalid_payloads_never_reach_a_port() {
    let mut users = MockUserRepository::new();
    users.expect_create_user().never();
    users.expect_user_exists().never();
    let mut boards = MockBoardRepository::new();
    boards.expect_create_board().never();
    let mut lists = MockListRepository::new();
    lists.expect_create_list().never();
    let mut cards = MockCardRepository::new();
    cards.expect_create_card().never();
    cards.expect_card_exists().never();
    cards.expect_assign_user().never();

    let users: Arc<MockUserRepository> = Arc::new(users);
    let user_service = UserService::new(users.clone());
    let board_service = BoardService::new(Arc::new(boards));
    let list_service = ListService::new(Arc::new(lists));
    let card_service = CardService::new(Arc::new(cards), users);

    assert!(is_validation(user_service.create(&json!({ "name": "Ada", "email": "ada" })).await));
    assert!(is_validation(board_service.create(&json!({ "name": "", "adminUserId": 1 })).await));
    assert!(is_validation(
        board_service
            .create(&json!({ "name": "Sprint", "adminUserId": -4 }))
            .await
    ));
    assert!(is_validation(list_service.create(&json!({ "name": "Todo" })).await));
    assert!(is_validation(
        card_service
            .create("1", &json!({ "title": "ok", "due_date": "2026-01-01" }))
            .await
    ));
    assert!(is_validation(
        card_service
            .create("1", &json!({ "title": "Long enough", "due_date": "someday" }))
            .await
    ));
    assert!(is_validation(card_service.assign("x", "1", &json!({})).await));
    assert!(is_validation(card_service.assign("1", "2", &json!({ "isOwner": "yes" })).await));
}
