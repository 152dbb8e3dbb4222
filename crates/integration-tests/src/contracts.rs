//! Behaviour every store must show through the repository ports. Shared by
//! the in-memory suite and the PostgreSQL suite; assertions only look at rows
//! the contract itself created, or at row counts taken before and after, so a
//! non-empty database is fine.

use async_trait::async_trait;
use domains::{
    validate, BoardId, BoardRepository, CardId, CardRepository, ListRepository, NewBoard,
    NewCard, NewCardUser, NewList, NewUser, StorageError, UserId, UserRepository,
};
use serde_json::json;
use storage_adapters::{InMemoryStore, PgStore};

pub trait Store: UserRepository + BoardRepository + ListRepository + CardRepository {}

impl<S> Store for S where S: UserRepository + BoardRepository + ListRepository + CardRepository {}

/// Raw table sizes read around the ports, so a row no port query would
/// return (a board without its admin link) still counts.
#[async_trait]
pub trait TableRows {
    async fn board_rows(&self) -> i64;
    async fn card_rows(&self) -> i64;
}

#[async_trait]
impl TableRows for InMemoryStore {
    async fn board_rows(&self) -> i64 {
        self.row_counts().await[1] as i64
    }

    async fn card_rows(&self) -> i64 {
        self.row_counts().await[4] as i64
    }
}

#[async_trait]
impl TableRows for PgStore {
    async fn board_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM boards")
            .fetch_one(self.pool())
            .await
            .expect("count boards")
    }

    async fn card_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM cards")
            .fetch_one(self.pool())
            .await
            .expect("count cards")
    }
}

/// Id no store will ever have handed out.
pub const MISSING: i64 = i64::MAX;

pub async fn new_user<S: Store>(store: &S, name: &str) -> UserId {
    store
        .create_user(NewUser {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .await
        .expect("user insert")
        .id
}

pub async fn new_list<S: Store>(store: &S, admin: UserId) -> (BoardId, domains::ListId) {
    let board = store
        .create_board(NewBoard {
            name: "Contract board".into(),
            admin_user_id: admin,
        })
        .await
        .expect("board insert");
    let list = store
        .create_list(NewList {
            name: "Backlog".into(),
            board_id: board.id,
        })
        .await
        .expect("list insert");
    (board.id, list.id)
}

fn new_card(list: domains::ListId, owner: Option<i64>) -> NewCard {
    let mut payload = json!({
        "title": "Contract card",
        "due_date": "2026-12-24",
        "listId": list,
    });
    if let Some(owner) = owner {
        payload["ownerUserId"] = json!(owner);
    }
    validate::<NewCard>(&payload).expect("valid card")
}

pub async fn board_creation_links_its_admin<S: Store>(store: &S) {
    let admin = new_user(store, "Admin").await;
    let (board_id, _) = new_list(store, admin).await;

    let boards = store.list_boards().await.expect("list boards");
    let board = boards.iter().find(|b| b.id == board_id).expect("board listed");
    assert_eq!(board.admin_user_id, admin);
}

pub async fn failed_board_creation_leaves_no_board<S: Store + TableRows>(store: &S) {
    let before = store.board_rows().await;

    let err = store
        .create_board(NewBoard {
            name: "Ghost".into(),
            admin_user_id: UserId::new(MISSING),
        })
        .await
        .expect_err("admin does not exist");

    assert!(
        matches!(err, StorageError::Aborted { operation: "create_board", .. }),
        "{err:?}"
    );
    assert!(matches!(err.root(), StorageError::Constraint(_)), "{err:?}");
    assert_eq!(store.board_rows().await, before);
}

pub async fn card_owner_is_written_with_the_card<S: Store>(store: &S) {
    let owner = new_user(store, "Owner").await;
    let (_, list) = new_list(store, owner).await;

    let card = store
        .create_card(new_card(list, Some(owner.get())))
        .await
        .expect("card insert");

    let read = store
        .card_with_owner(card.id)
        .await
        .expect("card read")
        .expect("card exists");
    assert_eq!(read.card, card);
    assert_eq!(read.owner.map(|u| u.id), Some(owner));
}

pub async fn failed_owner_insert_leaves_no_card<S: Store + TableRows>(store: &S) {
    let admin = new_user(store, "Lead").await;
    let (_, list) = new_list(store, admin).await;
    let before = store.card_rows().await;

    let err = store
        .create_card(new_card(list, Some(MISSING)))
        .await
        .expect_err("owner does not exist");

    assert!(
        matches!(err, StorageError::Aborted { operation: "create_card", .. }),
        "{err:?}"
    );
    assert_eq!(store.card_rows().await, before);

    let plain = store
        .create_card(new_card(list, None))
        .await
        .expect("card insert");
    assert_eq!(store.card_rows().await, before + 1);
    assert!(store.card_users(plain.id).await.expect("users").is_empty());
}

pub async fn assignments_are_unique_and_ordered<S: Store>(store: &S) {
    let first = new_user(store, "First").await;
    let second = new_user(store, "Second").await;
    let (_, list) = new_list(store, first).await;
    let card = store.create_card(new_card(list, None)).await.expect("card insert");

    for (user, is_owner) in [(second, false), (first, true)] {
        store
            .assign_user(NewCardUser {
                card_id: card.id,
                user_id: user,
                is_owner,
            })
            .await
            .expect("assignment");
    }

    let duplicate = store
        .assign_user(NewCardUser {
            card_id: card.id,
            user_id: second,
            is_owner: false,
        })
        .await
        .expect_err("pair already linked");
    assert!(matches!(duplicate, StorageError::Conflict(_)), "{duplicate:?}");

    let rows = store.card_users(card.id).await.expect("users");
    let users: Vec<_> = rows.iter().map(|r| (r.user_id, r.is_owner)).collect();
    assert_eq!(users, vec![(first, true), (second, false)]);
}

pub async fn unknown_ids_read_as_absent<S: Store>(store: &S) {
    let card = CardId::new(MISSING);
    assert!(store.card_with_owner(card).await.expect("read").is_none());
    assert!(!store.card_exists(card).await.expect("read"));
    assert!(!store.user_exists(UserId::new(MISSING)).await.expect("read"));
    assert!(store
        .lists_by_board(BoardId::new(MISSING))
        .await
        .expect("read")
        .is_empty());
}
