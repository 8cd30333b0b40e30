use crate::domain::{
    card::{NewCard, Rarity},
    deck::{DeckType, NewDeck},
};

use super::service::{Service, ServiceError};

fn sample_cards() -> Vec<NewCard> {
    vec![
        NewCard::new("Dragon Knight", 5, 4, 5, Rarity::Rare),
        NewCard::new("Goblin", 1, 1, 1, Rarity::Common),
        NewCard::new("Elven Archer", 2, 2, 1, Rarity::Common),
        NewCard::new("Flame Sorcerer", 3, 2, 3, Rarity::Uncommon),
        NewCard::new("Holy Knight", 4, 3, 4, Rarity::Rare),
        NewCard::new("Dark Overlord", 8, 8, 8, Rarity::Legendary),
        NewCard::new("Healing Fairy", 2, 1, 2, Rarity::Common),
        NewCard::new("Giant Golem", 6, 5, 7, Rarity::Rare),
        NewCard::new("Thunder Spirit", 4, 4, 3, Rarity::Uncommon),
        NewCard::new("Ancient Dragon", 10, 10, 10, Rarity::Legendary),
    ]
}

fn sample_decks() -> Vec<NewDeck> {
    vec![
        NewDeck::new(
            "Standard Deck",
            "A beginner deck built from basic cards",
            DeckType::Balanced,
        ),
        NewDeck::new(
            "Aggro Deck",
            "Cheap cards that attack early and often",
            DeckType::Aggro,
        ),
        NewDeck::new(
            "Control Deck",
            "Limits the opponent's options and wins late",
            DeckType::Defensive,
        ),
        NewDeck::new(
            "Midrange Deck",
            "Aims to take over the middle of the game",
            DeckType::Balanced,
        ),
        NewDeck::new(
            "Combo Deck",
            "Wins with a specific combination of cards",
            DeckType::Combo,
        ),
    ]
}

impl Service {
    /// Fills an empty database with the sample collection. Returns false if anything was there.
    pub async fn seed_sample_data(&self) -> Result<bool, ServiceError> {
        if !self.repository.list_cards().await?.is_empty()
            || !self.repository.list_decks().await?.is_empty()
        {
            tracing::debug!("database not empty, skipping sample data");
            return Ok(false);
        }

        self.repository.insert_cards(sample_cards()).await?;
        self.repository.insert_decks(sample_decks()).await?;
        Ok(true)
    }
}
