//! Rollback and connection-accounting behaviour of composite writes.

use std::sync::Arc;

use axum::http::StatusCode;
use futures::future::join_all;
use integration_tests::{card_payload, TestApp};
use serde_json::json;
use services::Services;
use storage_adapters::{FailPoint, InMemoryStore};

#[tokio::test]
async fn fault_between_board_inserts_rolls_back_both() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;
    app.store.fail_next(FailPoint::BoardAdminInsert);

    let (status, body) = app
        .post("/boards", json!({ "name": "Sprint", "adminUserId": admin }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "transaction_aborted");
    assert_eq!(app.store.row_counts().await, [1, 0, 0, 0, 0, 0]);

    // The fault was one-shot; the same request now succeeds.
    let (status, _) = app
        .post("/boards", json!({ "name": "Sprint", "adminUserId": admin }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.store.row_counts().await, [1, 1, 1, 0, 0, 0]);
}

#[tokio::test]
async fn fault_before_owner_insert_leaves_no_card() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;
    let board = app.board("Alpha", admin).await;
    let list = app.list("To do", board).await;
    app.store.fail_next(FailPoint::CardOwnerInsert);

    let mut payload = card_payload("Owned card");
    payload["ownerUserId"] = json!(admin);
    let (status, _) = app.post(&format!("/lists/{list}/cards"), payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let counts = app.store.row_counts().await;
    assert_eq!((counts[4], counts[5]), (0, 0));
}

#[tokio::test]
async fn failed_commit_publishes_nothing() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;
    app.store.fail_next(FailPoint::Commit);

    let (status, _) = app
        .post("/boards", json!({ "name": "Sprint", "adminUserId": admin }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.row_counts().await[1], 0);
}

#[tokio::test]
async fn unknown_owner_aborts_card_creation() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;
    let board = app.board("Alpha", admin).await;
    let list = app.list("To do", board).await;

    let mut payload = card_payload("Owned card");
    payload["ownerUserId"] = json!(9_999);
    let (status, body) = app.post(&format!("/lists/{list}/cards"), payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "transaction_aborted");
    assert_eq!(app.store.row_counts().await[4], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_composite_writes_release_every_connection() {
    let store = Arc::new(InMemoryStore::new());
    let services = Services::new(store.clone());
    let admin = services
        .users
        .create(&json!({ "name": "Ada", "email": "ada@example.com" }))
        .await
        .unwrap();

    // Every third request names an admin that does not exist and must roll back.
    let tasks = (0..48).map(|i| {
        let services = services.clone();
        let admin_id = if i % 3 == 0 { json!(999_999) } else { json!(admin.id) };
        tokio::spawn(async move {
            services
                .boards
                .create(&json!({ "name": format!("Board {i}"), "adminUserId": admin_id }))
                .await
        })
    });
    let results = join_all(tasks).await;

    let created = results
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(created, 32);

    let counts = store.row_counts().await;
    assert_eq!(counts[1], created);
    assert_eq!(counts[2], created);

    let snapshot = store.stats().snapshot();
    assert_eq!(snapshot.checked_out, snapshot.released);
    assert_eq!(snapshot.in_use(), 0);
}

#[tokio::test]
async fn health_counts_transaction_leases() {
    let app = TestApp::new();
    let admin = app.user("Ada").await;
    app.board("Alpha", admin).await;
    app.post("/boards", json!({ "name": "Ghost", "adminUserId": 404 })).await;

    let (_, health) = app.get("/health").await;

    // One user insert plus two board transactions.
    assert_eq!(health["checkedOut"], 3);
    assert_eq!(health["released"], 3);
    assert_eq!(health["inUse"], 0);
}
