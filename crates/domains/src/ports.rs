//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to be used by the services.
//! Composite writes (`create_board`, `create_card` with an owner) must be
//! atomic: either every row is written or none is.

use async_trait::async_trait;

use crate::errors::StorageError;
use crate::ids::{BoardId, CardId, UserId};
use crate::models::{
    Board, Card, CardUser, CardWithOwner, List, NewBoard, NewCard, NewCardUser, NewList, NewUser,
    User,
};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Inserts the board and its admin link in one transaction.
    async fn create_board(&self, board: NewBoard) -> Result<Board, StorageError>;
    /// Boards joined with their admin user.
    async fn list_boards(&self) -> Result<Vec<Board>, StorageError>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn create_list(&self, list: NewList) -> Result<List, StorageError>;
    async fn lists_by_board(&self, board_id: BoardId) -> Result<Vec<List>, StorageError>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Inserts the card; with an owner, also the ownership row, atomically.
    async fn create_card(&self, card: NewCard) -> Result<Card, StorageError>;
    async fn card_with_owner(&self, id: CardId) -> Result<Option<CardWithOwner>, StorageError>;
    async fn card_users(&self, id: CardId) -> Result<Vec<CardUser>, StorageError>;
    async fn card_exists(&self, id: CardId) -> Result<bool, StorageError>;
    async fn assign_user(&self, assignment: NewCardUser) -> Result<CardUser, StorageError>;
}
