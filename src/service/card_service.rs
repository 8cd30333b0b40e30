use crate::domain::{
    card::{Card, NewCard, Rarity},
    deck_contents::CardWithDecks,
    grouped_card::GroupedCard,
};

use super::service::{Service, ServiceError, not_found, required};

impl Service {
    pub async fn list_cards(&self) -> Result<Vec<Card>, ServiceError> {
        Ok(self.repository.list_cards().await?)
    }

    pub async fn list_cards_grouped(&self) -> Result<Vec<GroupedCard>, ServiceError> {
        Ok(self.repository.list_cards_grouped().await?)
    }

    pub async fn list_cards_with_decks(&self) -> Result<Vec<CardWithDecks>, ServiceError> {
        Ok(self.repository.list_cards_with_decks().await?)
    }

    pub async fn cards_by_rarity(&self, rarity: Rarity) -> Result<Vec<Card>, ServiceError> {
        Ok(self.repository.cards_by_rarity(rarity).await?)
    }

    pub async fn cards_by_cost(&self, cost: i64) -> Result<Vec<Card>, ServiceError> {
        Ok(self.repository.cards_by_cost(cost).await?)
    }

    pub async fn get_card(&self, id: i64) -> Result<Card, ServiceError> {
        self.repository
            .get_card(id)
            .await?
            .ok_or_else(|| not_found("card", id))
    }

    pub async fn card_with_decks(&self, id: i64) -> Result<CardWithDecks, ServiceError> {
        self.repository
            .get_card_with_decks(id)
            .await?
            .ok_or_else(|| not_found("card", id))
    }

    pub async fn add_card(&self, mut card: NewCard) -> Result<Card, ServiceError> {
        card.name = required("card name", &card.name)?;
        Ok(self.repository.insert_card(card).await?)
    }

    pub async fn update_card(&self, mut card: Card) -> Result<Card, ServiceError> {
        card.name = required("card name", &card.name)?;
        self.repository.update_card(&card).await?;
        Ok(card)
    }

    pub async fn delete_card(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.repository.delete_card(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::card::{NewCard, Rarity},
        repository::repository::RepositoryError,
        service::service::{ServiceError, test_service},
    };

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let service = test_service().await;
        let err = service
            .add_card(NewCard::new("   ", 1, 1, 1, Rarity::Common))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list_cards().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn names_are_trimmed() {
        let service = test_service().await;
        let card = service
            .add_card(NewCard::new("  Goblin ", 1, 1, 1, Rarity::Common))
            .await
            .unwrap();
        assert_eq!(card.name, "Goblin");

        let mut renamed = card.clone();
        renamed.name = " Hobgoblin".to_string();
        let renamed = service.update_card(renamed).await.unwrap();
        assert_eq!(service.get_card(card.id).await.unwrap(), renamed);
        assert_eq!(renamed.name, "Hobgoblin");
    }

    #[tokio::test]
    async fn missing_card_is_not_found() {
        let service = test_service().await;
        assert!(matches!(
            service.get_card(5).await,
            Err(ServiceError::Repository(RepositoryError::NotFound(..)))
        ));
        assert!(service.card_with_decks(5).await.is_err());
        assert!(service.delete_card(5).await.is_err());
    }
}
