use axum::http::StatusCode;
use integration_tests::{id_of, violated_fields, TestApp};
use serde_json::json;

#[tokio::test]
async fn board_without_admin_is_rejected_then_created_with_one() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;

    let (status, body) = app.post("/boards", json!({ "name": "Sprint" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(violated_fields(&body).contains(&"adminUserId".to_owned()));
    assert_eq!(app.store.row_counts().await[1], 0);

    let (status, board) = app
        .post("/boards", json!({ "name": "Sprint", "adminUserId": admin }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let board_id = id_of(&board);
    assert_eq!(board["adminUserId"], admin);

    let links = app.store.board_users().await;
    assert_eq!(links.len(), 1);
    assert_eq!(i64::from(links[0].board_id), board_id);
    assert_eq!(i64::from(links[0].user_id), admin);
    assert!(links[0].is_admin);
}

#[tokio::test]
async fn unknown_admin_rolls_the_board_back() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/boards", json!({ "name": "Sprint", "adminUserId": 404 }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "transaction_aborted");
    assert_eq!(app.store.row_counts().await, [0; 6]);
}

#[tokio::test]
async fn boards_are_listed_with_their_admin() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let grace = app.user("Grace").await;
    app.board("Alpha", ada).await;
    app.board("Beta", grace).await;

    let (status, boards) = app.get("/boards").await;

    assert_eq!(status, StatusCode::OK);
    let admins: Vec<_> = boards
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["name"].as_str().unwrap().to_owned(), b["adminUserId"].as_i64().unwrap()))
        .collect();
    assert_eq!(admins, vec![("Alpha".to_owned(), ada), ("Beta".to_owned(), grace)]);
}

#[tokio::test]
async fn lists_are_scoped_to_their_board() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let alpha = app.board("Alpha", ada).await;
    let beta = app.board("Beta", ada).await;
    let todo = app.list("To do", alpha).await;
    app.list("Elsewhere", beta).await;

    let (status, lists) = app.get(&format!("/boards/{alpha}/lists")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(lists, json!([{ "id": todo, "name": "To do", "boardId": alpha }]));
}

#[tokio::test]
async fn board_id_given_as_string_is_coerced() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let board = app.board("Alpha", ada).await;

    let (status, list) = app
        .post("/lists", json!({ "name": "Doing", "boardId": board.to_string() }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list["boardId"], board);
}

#[tokio::test]
async fn list_on_missing_board_is_a_write_failure() {
    let app = TestApp::new();

    let (status, body) = app.post("/lists", json!({ "name": "Orphan", "boardId": 77 })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "write_failed");
}

#[tokio::test]
async fn non_numeric_board_path_is_a_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.get("/boards/abc/lists").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_path");
}
