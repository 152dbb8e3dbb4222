//! Row shapes returned by the queries, and their mapping onto domain models.

use chrono::NaiveDate;
use domains::{Board, BoardId, Card, CardId, CardUser, CardWithOwner, List, ListId, User, UserId};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct BoardRow {
    pub id: i64,
    pub name: String,
    pub admin_user_id: i64,
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        Self {
            id: BoardId::new(row.id),
            name: row.name,
            admin_user_id: UserId::new(row.admin_user_id),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ListRow {
    pub id: i64,
    pub name: String,
    pub board_id: i64,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        Self {
            id: ListId::new(row.id),
            name: row.name,
            board_id: BoardId::new(row.board_id),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CardRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub list_id: i64,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Self {
            id: CardId::new(row.id),
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            list_id: ListId::new(row.list_id),
        }
    }
}

/// A card left-joined with its owner; the owner columns are all null when
/// the card has none.
#[derive(Debug, FromRow)]
pub(crate) struct CardOwnerRow {
    #[sqlx(flatten)]
    pub card: CardRow,
    pub owner_id: Option<i64>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

impl From<CardOwnerRow> for CardWithOwner {
    fn from(row: CardOwnerRow) -> Self {
        let owner = match (row.owner_id, row.owner_name, row.owner_email) {
            (Some(id), Some(name), Some(email)) => Some(User {
                id: UserId::new(id),
                name,
                email,
            }),
            _ => None,
        };
        Self {
            card: row.card.into(),
            owner,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CardUserRow {
    pub card_id: i64,
    pub user_id: i64,
    pub is_owner: bool,
}

impl From<CardUserRow> for CardUser {
    fn from(row: CardUserRow) -> Self {
        Self {
            card_id: CardId::new(row.card_id),
            user_id: UserId::new(row.user_id),
            is_owner: row.is_owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_row() -> CardRow {
        CardRow {
            id: 1,
            title: "Triage inbox".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            list_id: 2,
        }
    }

    #[test]
    fn ownerless_card_maps_to_none() {
        let row = CardOwnerRow {
            card: card_row(),
            owner_id: None,
            owner_name: None,
            owner_email: None,
        };
        let card = CardWithOwner::from(row);
        assert!(card.owner.is_none());
        assert_eq!(card.card.list_id, ListId::new(2));
    }

    #[test]
    fn owner_columns_build_a_user() {
        let row = CardOwnerRow {
            card: card_row(),
            owner_id: Some(9),
            owner_name: Some("Rita".into()),
            owner_email: Some("rita@example.com".into()),
        };
        let card = CardWithOwner::from(row);
        assert_eq!(card.owner.map(|u| u.id), Some(UserId::new(9)));
    }
}
