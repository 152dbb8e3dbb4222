use std::sync::Arc;

use domains::{
    validate, AppError, Card, CardId, CardRepository, CardUser, CardWithOwner, NewCard,
    NewCardUser, Result, UserRepository,
};
use serde_json::Value;

use crate::{read_failure, with_path_fields, write_failure};

#[derive(Clone)]
pub struct CardService {
    cards: Arc<dyn CardRepository>,
    users: Arc<dyn UserRepository>,
}

impl CardService {
    pub fn new(cards: Arc<dyn CardRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { cards, users }
    }

    /// Creates a card in the list named by the path. A body `ownerUserId`
    /// makes this a composite write (card + ownership row).
    #[tracing::instrument(name = "cards.create", skip(self, payload))]
    pub async fn create(&self, list_id: &str, payload: &Value) -> Result<Card> {
        let merged = with_path_fields(payload, &[("listId", list_id)]);
        let new_card = validate::<NewCard>(&merged).map_err(AppError::ValidationFailed)?;
        let owner = new_card.owner_user_id;
        let card = self.cards.create_card(new_card).await.map_err(write_failure)?;
        tracing::info!(card_id = %card.id, list_id = %card.list_id, owner = ?owner, "card created");
        Ok(card)
    }

    #[tracing::instrument(name = "cards.get", skip(self))]
    pub async fn get_with_owner(&self, id: CardId) -> Result<CardWithOwner> {
        self.cards
            .card_with_owner(id)
            .await
            .map_err(read_failure)?
            .ok_or_else(|| AppError::not_found(CardId::ENTITY, id))
    }

    #[tracing::instrument(name = "cards.users", skip(self))]
    pub async fn users_of(&self, id: CardId) -> Result<Vec<CardUser>> {
        self.cards.card_users(id).await.map_err(read_failure)
    }

    /// Links a user to a card. Both ends must exist; the card is checked
    /// first, and nothing is written when either check fails.
    #[tracing::instrument(name = "cards.assign", skip(self, payload))]
    pub async fn assign(&self, card_id: &str, user_id: &str, payload: &Value) -> Result<CardUser> {
        let merged = with_path_fields(payload, &[("cardId", card_id), ("userId", user_id)]);
        let assignment = validate::<NewCardUser>(&merged).map_err(AppError::ValidationFailed)?;

        if !self
            .cards
            .card_exists(assignment.card_id)
            .await
            .map_err(write_failure)?
        {
            return Err(AppError::not_found(CardId::ENTITY, assignment.card_id));
        }
        if !self
            .users
            .user_exists(assignment.user_id)
            .await
            .map_err(write_failure)?
        {
            return Err(AppError::not_found(domains::UserId::ENTITY, assignment.user_id));
        }

        let row = self.cards.assign_user(assignment).await.map_err(write_failure)?;
        tracing::info!(
            card_id = %row.card_id,
            user_id = %row.user_id,
            is_owner = row.is_owner,
            "user assigned to card"
        );
        Ok(row)
    }
}
