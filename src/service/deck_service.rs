use crate::domain::{
    deck::{Deck, DeckType, NewDeck},
    deck_contents::DeckContents,
    placement::{DEFAULT_LOCATION, Placement},
};

use super::service::{Service, ServiceError, not_found, required};

/// Upper bound on copies placed by a single add.
pub const MAX_COPIES_PER_ADD: usize = 4;

impl Service {
    pub async fn list_decks(&self) -> Result<Vec<Deck>, ServiceError> {
        Ok(self.repository.list_decks().await?)
    }

    pub async fn decks_by_type(&self, deck_type: DeckType) -> Result<Vec<Deck>, ServiceError> {
        Ok(self.repository.decks_by_type(deck_type).await?)
    }

    pub async fn get_deck(&self, id: i64) -> Result<Deck, ServiceError> {
        self.repository
            .get_deck(id)
            .await?
            .ok_or_else(|| not_found("deck", id))
    }

    pub async fn deck_contents(&self, id: i64) -> Result<DeckContents, ServiceError> {
        self.repository
            .get_deck_contents(id)
            .await?
            .ok_or_else(|| not_found("deck", id))
    }

    pub async fn deck_placements(&self, id: i64) -> Result<Vec<Placement>, ServiceError> {
        self.get_deck(id).await?;
        Ok(self.repository.deck_placements(id).await?)
    }

    pub async fn card_ids_in_deck(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        self.get_deck(id).await?;
        Ok(self.repository.card_ids_in_deck(id).await?)
    }

    pub async fn add_deck(&self, mut deck: NewDeck) -> Result<Deck, ServiceError> {
        deck.name = required("deck name", &deck.name)?;
        Ok(self.repository.insert_deck(deck).await?)
    }

    /// Placements are untouched; only name, description and type change.
    pub async fn update_deck(&self, mut deck: Deck) -> Result<Deck, ServiceError> {
        deck.name = required("deck name", &deck.name)?;
        self.repository.update_deck(&deck).await?;
        Ok(deck)
    }

    pub async fn delete_deck(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.repository.delete_deck(id).await?)
    }

    /// Places one copy of the card per location. Blank locations become the default one.
    pub async fn add_card_to_deck(
        &self,
        deck_id: i64,
        card_id: i64,
        locations: Vec<String>,
    ) -> Result<Vec<Placement>, ServiceError> {
        if locations.is_empty() || locations.len() > MAX_COPIES_PER_ADD {
            return Err(ServiceError::Validation(format!(
                "between 1 and {MAX_COPIES_PER_ADD} copies can be added at once, got {}",
                locations.len()
            )));
        }
        self.get_deck(deck_id).await?;
        self.get_card(card_id).await?;

        let locations: Vec<String> = locations
            .into_iter()
            .map(|location| normalize_location(&location))
            .collect();
        Ok(self
            .repository
            .add_card_copies_to_deck(deck_id, card_id, &locations)
            .await?)
    }

    pub async fn remove_card_from_deck(&self, deck_id: i64, card_id: i64) -> Result<u64, ServiceError> {
        Ok(self.repository.remove_one_card_from_deck(deck_id, card_id).await?)
    }

    pub async fn remove_all_card_from_deck(
        &self,
        deck_id: i64,
        card_id: i64,
    ) -> Result<u64, ServiceError> {
        Ok(self.repository.remove_card_from_deck(deck_id, card_id).await?)
    }

    pub async fn remove_card_location_from_deck(
        &self,
        deck_id: i64,
        card_id: i64,
        location: &str,
    ) -> Result<u64, ServiceError> {
        Ok(self
            .repository
            .remove_card_location_from_deck(deck_id, card_id, location)
            .await?)
    }
}

pub fn normalize_location(location: &str) -> String {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::card::{Card, NewCard, Rarity},
        repository::repository::RepositoryError,
        service::service::test_service,
    };

    async fn setup() -> (Service, Deck, Card) {
        let service = test_service().await;
        let deck = service
            .add_deck(NewDeck::new("Standard Deck", "", DeckType::Balanced))
            .await
            .unwrap();
        let card = service
            .add_card(NewCard::new("Test Card", 3, 2, 4, Rarity::Rare))
            .await
            .unwrap();
        (service, deck, card)
    }

    #[tokio::test]
    async fn adding_copies_counts_each_location() {
        let (service, deck, card) = setup().await;
        let before = service.deck_contents(deck.id).await.unwrap().card_count();

        service
            .add_card_to_deck(deck.id, card.id, vec!["Main".into(), "  ".into()])
            .await
            .unwrap();

        let contents = service.deck_contents(deck.id).await.unwrap();
        assert_eq!(contents.card_count(), before + 2);
        assert_eq!(contents.count_of(card.id), 2);
        assert_eq!(contents.cards[0].1, ["Main", DEFAULT_LOCATION]);
    }

    #[tokio::test]
    async fn card_ids_in_deck_needs_existing_deck() {
        let (service, deck, card) = setup().await;
        assert!(service.card_ids_in_deck(deck.id).await.unwrap().is_empty());

        service
            .add_card_to_deck(deck.id, card.id, vec!["Main".into(), "Side".into()])
            .await
            .unwrap();
        assert_eq!(service.card_ids_in_deck(deck.id).await.unwrap(), vec![card.id]);
        assert!(matches!(
            service.card_ids_in_deck(deck.id + 100).await,
            Err(ServiceError::Repository(RepositoryError::NotFound(..)))
        ));
    }

    #[tokio::test]
    async fn copy_count_is_bounded() {
        let (service, deck, card) = setup().await;
        let too_many = vec![String::new(); MAX_COPIES_PER_ADD + 1];
        assert!(matches!(
            service.add_card_to_deck(deck.id, card.id, too_many).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.add_card_to_deck(deck.id, card.id, vec![]).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(service.add_card_to_deck(deck.id, 404, vec!["x".into()]).await.is_err());
    }

    #[tokio::test]
    async fn remove_one_then_all() {
        let (service, deck, card) = setup().await;
        service
            .add_card_to_deck(deck.id, card.id, vec!["Main".into(), "Side".into(), "Side".into()])
            .await
            .unwrap();

        service.remove_card_from_deck(deck.id, card.id).await.unwrap();
        assert_eq!(service.deck_contents(deck.id).await.unwrap().count_of(card.id), 2);

        service
            .remove_card_location_from_deck(deck.id, card.id, "Main")
            .await
            .unwrap();
        assert_eq!(service.deck_contents(deck.id).await.unwrap().count_of(card.id), 1);

        service.remove_all_card_from_deck(deck.id, card.id).await.unwrap();
        assert_eq!(service.deck_contents(deck.id).await.unwrap().count_of(card.id), 0);
    }

    #[tokio::test]
    async fn update_requires_name_and_keeps_cards() {
        let (service, deck, card) = setup().await;
        service
            .add_card_to_deck(deck.id, card.id, vec!["Main".into()])
            .await
            .unwrap();

        let mut blank = deck.clone();
        blank.name = String::new();
        assert!(service.update_deck(blank).await.is_err());

        let mut changed = deck.clone();
        changed.description = "Updated description".to_string();
        changed.deck_type = DeckType::Control;
        service.update_deck(changed.clone()).await.unwrap();

        let contents = service.deck_contents(deck.id).await.unwrap();
        assert_eq!(contents.deck, changed);
        assert_eq!(contents.card_count(), 1);
        assert_eq!(service.deck_placements(deck.id).await.unwrap().len(), 1);
    }
}
