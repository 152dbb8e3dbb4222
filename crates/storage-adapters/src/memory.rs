//! In-memory store.
//!
//! Implements every repository port with the same constraints as the SQL
//! schema (foreign keys, unique card assignments, one owner per card) so it
//! can stand in for PostgreSQL in local runs and tests. Composite writes go
//! through the [`TransactionCoordinator`] like they do for PostgreSQL: a
//! transaction works on a copy of the tables and only a commit publishes it.
//!
//! Faults can be injected at named points to exercise rollback paths.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use domains::{
    Board, BoardId, BoardRepository, BoardUser, Card, CardId, CardRepository, CardUser,
    CardWithOwner, List, ListId, ListRepository, NewBoard, NewCard, NewCardUser, NewList, NewUser,
    StorageError, User, UserId, UserRepository,
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::pool::{Lease, PoolStats};
use crate::transaction::{TransactionBackend, TransactionCoordinator};

/// Places where a fault can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// The `board_users` insert of board creation.
    BoardAdminInsert,
    /// The ownership insert of card creation.
    CardOwnerInsert,
    /// Commit of any transaction.
    Commit,
}

#[derive(Debug, Default)]
struct Faults {
    armed: Mutex<Vec<FailPoint>>,
}

impl Faults {
    fn arm(&self, point: FailPoint) {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(point);
    }

    /// Consume one armed fault at `point`, if any.
    fn trip(&self, point: FailPoint) -> Result<(), StorageError> {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        match armed.iter().position(|p| *p == point) {
            Some(i) => {
                armed.remove(i);
                Err(StorageError::Query(format!("injected failure at {point:?}")))
            }
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
struct BoardRow {
    id: BoardId,
    name: String,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    boards: BTreeMap<BoardId, BoardRow>,
    board_users: Vec<BoardUser>,
    lists: BTreeMap<ListId, List>,
    cards: BTreeMap<CardId, Card>,
    card_users: Vec<CardUser>,
}

impl Tables {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_user(&mut self, new: NewUser) -> User {
        let id = UserId::new(self.allocate());
        let user = User {
            id,
            name: new.name,
            email: new.email,
        };
        self.users.insert(id, user.clone());
        user
    }

    fn insert_board(&mut self, name: String) -> BoardRow {
        let id = BoardId::new(self.allocate());
        let row = BoardRow { id, name };
        self.boards.insert(id, row.clone());
        row
    }

    fn insert_board_user(&mut self, link: BoardUser) -> Result<(), StorageError> {
        if !self.boards.contains_key(&link.board_id) {
            return Err(StorageError::Constraint(format!("board {} does not exist", link.board_id)));
        }
        if !self.users.contains_key(&link.user_id) {
            return Err(StorageError::Constraint(format!("user {} does not exist", link.user_id)));
        }
        if self
            .board_users
            .iter()
            .any(|l| l.board_id == link.board_id && l.user_id == link.user_id)
        {
            return Err(StorageError::Conflict("user already linked to board".into()));
        }
        self.board_users.push(link);
        Ok(())
    }

    fn insert_list(&mut self, new: NewList) -> Result<List, StorageError> {
        if !self.boards.contains_key(&new.board_id) {
            return Err(StorageError::Constraint(format!("board {} does not exist", new.board_id)));
        }
        let id = ListId::new(self.allocate());
        let list = List {
            id,
            name: new.name,
            board_id: new.board_id,
        };
        self.lists.insert(id, list.clone());
        Ok(list)
    }

    fn insert_card(&mut self, new: &NewCard) -> Result<Card, StorageError> {
        if !self.lists.contains_key(&new.list_id) {
            return Err(StorageError::Constraint(format!("list {} does not exist", new.list_id)));
        }
        let id = CardId::new(self.allocate());
        let card = Card {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            due_date: new.due_date,
            list_id: new.list_id,
        };
        self.cards.insert(id, card.clone());
        Ok(card)
    }

    fn insert_card_user(&mut self, new: NewCardUser) -> Result<CardUser, StorageError> {
        if !self.cards.contains_key(&new.card_id) {
            return Err(StorageError::Constraint(format!("card {} does not exist", new.card_id)));
        }
        if !self.users.contains_key(&new.user_id) {
            return Err(StorageError::Constraint(format!("user {} does not exist", new.user_id)));
        }
        let card_id = new.card_id;
        let on_card = || self.card_users.iter().filter(move |cu| cu.card_id == card_id);
        if on_card().any(|cu| cu.user_id == new.user_id) {
            return Err(StorageError::Conflict("user already assigned to card".into()));
        }
        if new.is_owner && on_card().any(|cu| cu.is_owner) {
            return Err(StorageError::Conflict("card already has an owner".into()));
        }
        let row = CardUser {
            card_id: new.card_id,
            user_id: new.user_id,
            is_owner: new.is_owner,
        };
        self.card_users.push(row.clone());
        Ok(row)
    }
}

/// Transaction primitive over the shared tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<AsyncMutex<Tables>>,
    stats: PoolStats,
    faults: Arc<Faults>,
}

/// An open in-memory transaction: exclusive access to the tables plus a
/// working copy that replaces them on commit.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    _lease: Lease,
}

#[async_trait]
impl TransactionBackend for MemoryBackend {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StorageError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            _lease: self.stats.lease(),
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), StorageError> {
        self.faults.trip(FailPoint::Commit)?;
        let MemoryTx {
            mut guard, working, ..
        } = tx;
        *guard = working;
        Ok(())
    }

    async fn rollback(&self, tx: MemoryTx) -> Result<(), StorageError> {
        drop(tx);
        Ok(())
    }
}

/// Repository implementation backed by process memory.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    coordinator: TransactionCoordinator<MemoryBackend>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            coordinator: TransactionCoordinator::new(MemoryBackend::default()),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PoolStats {
        self.backend().stats.clone()
    }

    /// Make the next operation reaching `point` fail.
    pub fn fail_next(&self, point: FailPoint) {
        self.backend().faults.arm(point);
    }

    /// Rows of the `board_users` association, in insertion order.
    pub async fn board_users(&self) -> Vec<BoardUser> {
        self.checkout().await.0.board_users.clone()
    }

    /// Number of rows in each table: users, boards, board_users, lists, cards, card_users.
    pub async fn row_counts(&self) -> [usize; 6] {
        let (tables, _lease) = self.checkout().await;
        [
            tables.users.len(),
            tables.boards.len(),
            tables.board_users.len(),
            tables.lists.len(),
            tables.cards.len(),
            tables.card_users.len(),
        ]
    }

    fn backend(&self) -> &MemoryBackend {
        self.coordinator.backend()
    }

    async fn checkout(&self) -> (tokio::sync::MutexGuard<'_, Tables>, Lease) {
        let tables = self.backend().tables.lock().await;
        (tables, self.backend().stats.lease())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let (mut tables, _lease) = self.checkout().await;
        Ok(tables.insert_user(user))
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables.users.contains_key(&id))
    }
}

#[async_trait]
impl BoardRepository for InMemoryStore {
    #[tracing::instrument(name = "memory.create_board", skip_all)]
    async fn create_board(&self, board: NewBoard) -> Result<Board, StorageError> {
        let faults = Arc::clone(&self.backend().faults);
        self.coordinator
            .run("create_board", move |tx| {
                Box::pin(async move {
                    let row = tx.working.insert_board(board.name);
                    faults.trip(FailPoint::BoardAdminInsert)?;
                    tx.working.insert_board_user(BoardUser {
                        board_id: row.id,
                        user_id: board.admin_user_id,
                        is_admin: true,
                    })?;
                    Ok(Board {
                        id: row.id,
                        name: row.name,
                        admin_user_id: board.admin_user_id,
                    })
                })
            })
            .await
    }

    async fn list_boards(&self) -> Result<Vec<Board>, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables
            .boards
            .values()
            .flat_map(|b| {
                tables
                    .board_users
                    .iter()
                    .filter(move |l| l.board_id == b.id && l.is_admin)
                    .map(move |l| Board {
                        id: b.id,
                        name: b.name.clone(),
                        admin_user_id: l.user_id,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl ListRepository for InMemoryStore {
    async fn create_list(&self, list: NewList) -> Result<List, StorageError> {
        let (mut tables, _lease) = self.checkout().await;
        tables.insert_list(list)
    }

    async fn lists_by_board(&self, board_id: BoardId) -> Result<Vec<List>, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables
            .lists
            .values()
            .filter(|l| l.board_id == board_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CardRepository for InMemoryStore {
    #[tracing::instrument(name = "memory.create_card", skip_all)]
    async fn create_card(&self, card: NewCard) -> Result<Card, StorageError> {
        let Some(owner) = card.owner_user_id else {
            let (mut tables, _lease) = self.checkout().await;
            return tables.insert_card(&card);
        };

        let faults = Arc::clone(&self.backend().faults);
        self.coordinator
            .run("create_card", move |tx| {
                Box::pin(async move {
                    let created = tx.working.insert_card(&card)?;
                    faults.trip(FailPoint::CardOwnerInsert)?;
                    tx.working.insert_card_user(NewCardUser {
                        card_id: created.id,
                        user_id: owner,
                        is_owner: true,
                    })?;
                    Ok(created)
                })
            })
            .await
    }

    async fn card_with_owner(&self, id: CardId) -> Result<Option<CardWithOwner>, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables.cards.get(&id).map(|card| {
            let owner = tables
                .card_users
                .iter()
                .find(|cu| cu.card_id == id && cu.is_owner)
                .and_then(|cu| tables.users.get(&cu.user_id))
                .cloned();
            CardWithOwner {
                card: card.clone(),
                owner,
            }
        }))
    }

    async fn card_users(&self, id: CardId) -> Result<Vec<CardUser>, StorageError> {
        let (tables, _lease) = self.checkout().await;
        let mut rows: Vec<CardUser> = tables
            .card_users
            .iter()
            .filter(|cu| cu.card_id == id)
            .cloned()
            .collect();
        rows.sort_by_key(|cu| cu.user_id);
        Ok(rows)
    }

    async fn card_exists(&self, id: CardId) -> Result<bool, StorageError> {
        let (tables, _lease) = self.checkout().await;
        Ok(tables.cards.contains_key(&id))
    }

    async fn assign_user(&self, assignment: NewCardUser) -> Result<CardUser, StorageError> {
        let (mut tables, _lease) = self.checkout().await;
        tables.insert_card_user(assignment)
    }
}
