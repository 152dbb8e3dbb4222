//! # Domain Models
//!
//! These structs represent the core entities of the kanban board.
//! `New*` types are the validated inputs of write operations; the plain
//! types are rows as persisted, including store-assigned identifiers.
//! JSON field names follow the public API (`adminUserId`, `due_date`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{BoardId, CardId, ListId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// A board as exposed by the API, projected together with its admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(rename = "adminUserId")]
    pub admin_user_id: UserId,
}

/// Board creation input. Always persisted together with its admin link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBoard {
    pub name: String,
    #[serde(rename = "adminUserId")]
    pub admin_user_id: UserId,
}

/// A row of the `board_users` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUser {
    #[serde(rename = "boardId")]
    pub board_id: BoardId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    #[serde(rename = "boardId")]
    pub board_id: BoardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewList {
    pub name: String,
    #[serde(rename = "boardId")]
    pub board_id: BoardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(rename = "listId")]
    pub list_id: ListId,
}

/// Card creation input.
///
/// When `owner_user_id` is present the card and its ownership row are
/// written as one composite operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(rename = "listId")]
    pub list_id: ListId,
    #[serde(rename = "ownerUserId", default)]
    pub owner_user_id: Option<UserId>,
}

/// Association recording that a user is linked to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUser {
    #[serde(rename = "cardId")]
    pub card_id: CardId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "isOwner")]
    pub is_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCardUser {
    #[serde(rename = "cardId")]
    pub card_id: CardId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "isOwner", default)]
    pub is_owner: bool,
}

/// A card together with the user owning it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardWithOwner {
    #[serde(flatten)]
    pub card: Card,
    pub owner: Option<User>,
}
