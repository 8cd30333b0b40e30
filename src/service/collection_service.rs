use std::{collections::HashMap, path::Path};

use thiserror::Error;

use crate::{
    data::collection::{CollectionFile, CollectionFileError, DeckEntry, PlacementEntry},
    domain::{card::NewCard, deck::NewDeck},
    repository::collection_repository::{CardRef, DeckBatch, ImportSummary},
};

use super::{
    deck_service::normalize_location,
    service::{Service, ServiceError, required},
};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    File(#[from] CollectionFileError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("deck \"{deck}\" references unknown card \"{card}\"")]
    UnknownCard { deck: String, card: String },

    #[error("deck \"{deck}\" places card #{index}, but the file lists no \"{card}\" there")]
    CardIndex {
        deck: String,
        card: String,
        index: usize,
    },
}

impl Service {
    /// Loads a collection file. With `replace`, existing cards and decks are dropped first.
    pub async fn import_collection<P: AsRef<Path>>(
        &self,
        path: P,
        replace: bool,
    ) -> Result<ImportSummary, CollectionError> {
        let file = CollectionFile::load(path)?;
        self.import(file, replace).await
    }

    /// Every reference is resolved before anything is written; the write itself is
    /// a single transaction.
    pub async fn import(
        &self,
        file: CollectionFile,
        replace: bool,
    ) -> Result<ImportSummary, CollectionError> {
        let CollectionFile { cards, decks } = file;
        let cards = cards
            .into_iter()
            .map(|mut card| {
                card.name = required("card name", &card.name)?;
                Ok(card)
            })
            .collect::<Result<Vec<NewCard>, ServiceError>>()?;

        let mut first_by_name: HashMap<String, usize> = HashMap::new();
        for (index, card) in cards.iter().enumerate() {
            first_by_name.entry(card.name.clone()).or_insert(index);
        }
        let mut stored_by_name: HashMap<String, i64> = HashMap::new();

        let mut batches = Vec::with_capacity(decks.len());
        for DeckEntry {
            name,
            description,
            deck_type,
            placements,
        } in decks
        {
            let name = required("deck name", &name)?;
            let mut resolved = Vec::with_capacity(placements.len());
            for PlacementEntry {
                card,
                card_index,
                location,
            } in placements
            {
                let card = card.trim().to_string();
                let target = match card_index {
                    Some(index) => match cards.get(index) {
                        Some(listed) if listed.name == card => CardRef::New(index),
                        _ => {
                            return Err(CollectionError::CardIndex {
                                deck: name,
                                card,
                                index,
                            });
                        }
                    },
                    None => match first_by_name.get(&card) {
                        Some(index) => CardRef::New(*index),
                        None if replace => {
                            return Err(CollectionError::UnknownCard { deck: name, card });
                        }
                        None => match stored_by_name.get(&card) {
                            Some(id) => CardRef::Stored(*id),
                            None => {
                                let id = self.lookup_card_id(&name, &card).await?;
                                stored_by_name.insert(card, id);
                                CardRef::Stored(id)
                            }
                        },
                    },
                };
                resolved.push((target, normalize_location(&location)));
            }
            batches.push(DeckBatch {
                deck: NewDeck::new(name, description, deck_type),
                placements: resolved,
            });
        }

        Ok(self
            .repository
            .write_collection(replace, cards, batches)
            .await
            .map_err(ServiceError::from)?)
    }

    pub async fn export_collection<P: AsRef<Path>>(&self, path: P) -> Result<(), CollectionError> {
        let file = self.export().await?;
        file.save(path)?;
        Ok(())
    }

    /// Placements carry the index of their card in `cards`, so copies sharing a
    /// name come back as the same copy.
    pub async fn export(&self) -> Result<CollectionFile, ServiceError> {
        let cards = self.repository.list_cards().await?;
        let decks = self.repository.list_deck_contents().await?;

        let index_by_id: HashMap<i64, usize> = cards
            .iter()
            .enumerate()
            .map(|(index, card)| (card.id, index))
            .collect();

        let decks = decks
            .into_iter()
            .map(|contents| DeckEntry {
                placements: contents
                    .card_with_locations()
                    .into_iter()
                    .map(|placed| PlacementEntry {
                        card_index: index_by_id.get(&placed.card.id).copied(),
                        card: placed.card.name,
                        location: placed.location,
                    })
                    .collect(),
                name: contents.deck.name,
                description: contents.deck.description,
                deck_type: contents.deck.deck_type,
            })
            .collect();
        let cards = cards
            .into_iter()
            .map(|card| NewCard {
                name: card.name,
                cost: card.cost,
                attack: card.attack,
                defense: card.defense,
                rarity: card.rarity,
                location: card.location,
                memo: card.memo,
            })
            .collect();

        Ok(CollectionFile { cards, decks })
    }

    async fn lookup_card_id(&self, deck: &str, card: &str) -> Result<i64, CollectionError> {
        let existing = self
            .repository
            .cards_by_name(card)
            .await
            .map_err(ServiceError::from)?;
        existing
            .first()
            .map(|c| c.id)
            .ok_or_else(|| CollectionError::UnknownCard {
                deck: deck.to_string(),
                card: card.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        domain::{card::Rarity, deck::DeckType},
        service::service::test_service,
    };

    const COLLECTION: &str = r#"
[[cards]]
name = "Goblin"
cost = 1
attack = 1
defense = 1
rarity = "Common"
location = "Binder A"

[[cards]]
name = "Ancient Dragon"
cost = 10
attack = 10
defense = 10
rarity = "Legendary"
memo = "signed"

[[decks]]
name = "Aggro Deck"
description = "Low curve"
deck_type = "Aggro"
placements = [
    { card = "Goblin", location = "Box 1" },
    { card = "Goblin", location = "Box 2" },
    { card = "Ancient Dragon" },
]
"#;

    #[tokio::test]
    async fn imports_cards_decks_and_placements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.toml");
        fs::write(&path, COLLECTION).unwrap();

        let service = test_service().await;
        let summary = service.import_collection(&path, false).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                cards: 2,
                decks: 1,
                placements: 3
            }
        );

        let deck = &service.list_decks().await.unwrap()[0];
        assert_eq!(deck.deck_type, DeckType::Aggro);
        let contents = service.deck_contents(deck.id).await.unwrap();
        assert_eq!(contents.card_type_count(), 2);
        assert_eq!(contents.card_count(), 3);
        let dragon = contents
            .cards
            .iter()
            .find(|(card, _)| card.name == "Ancient Dragon")
            .unwrap();
        assert_eq!(dragon.1, ["default"]);
    }

    #[tokio::test]
    async fn placements_may_reference_existing_cards() {
        let service = test_service().await;
        service
            .add_card(NewCard::new("Holy Knight", 4, 3, 4, Rarity::Rare))
            .await
            .unwrap();

        let file: CollectionFile = toml::from_str(
            r#"
            [[decks]]
            name = "Knights"
            placements = [{ card = "Holy Knight", location = "Sleeve" }]
            "#,
        )
        .unwrap();
        let summary = service.import(file, false).await.unwrap();
        assert_eq!(summary.placements, 1);
        assert_eq!(summary.cards, 0);
    }

    #[tokio::test]
    async fn unknown_card_reference_fails() {
        let service = test_service().await;
        let file: CollectionFile = toml::from_str(
            r#"
            [[decks]]
            name = "Ghosts"
            placements = [{ card = "Nobody" }]
            "#,
        )
        .unwrap();
        let err = service.import(file, false).await.unwrap_err();
        assert!(matches!(err, CollectionError::UnknownCard { .. }));
    }

    #[tokio::test]
    async fn export_then_replace_import_restores_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.toml");
        let source = dir.path().join("source.toml");
        fs::write(&source, COLLECTION).unwrap();

        let service = test_service().await;
        service.import_collection(&source, false).await.unwrap();
        let before = service.export().await.unwrap();
        service.export_collection(&path).await.unwrap();

        service.import_collection(&path, true).await.unwrap();
        assert_eq!(service.export().await.unwrap(), before);
        assert_eq!(service.list_cards().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_replace_import_keeps_collection() {
        let service = test_service().await;
        service.seed_sample_data().await.unwrap();
        let before = service.export().await.unwrap();

        let file: CollectionFile = toml::from_str(
            r#"
            [[cards]]
            name = "Goblin"

            [[decks]]
            name = "First"
            placements = [{ card = "Goblin" }]

            [[decks]]
            name = "Ghosts"
            placements = [{ card = "Nobody" }]
            "#,
        )
        .unwrap();
        let err = service.import(file, true).await.unwrap_err();
        assert!(matches!(err, CollectionError::UnknownCard { ref card, .. } if card == "Nobody"));

        assert_eq!(service.list_cards().await.unwrap().len(), 10);
        assert_eq!(service.list_decks().await.unwrap().len(), 5);
        assert_eq!(service.export().await.unwrap(), before);
    }

    #[tokio::test]
    async fn replace_import_cannot_reference_dropped_cards() {
        let service = test_service().await;
        service
            .add_card(NewCard::new("Holy Knight", 4, 3, 4, Rarity::Rare))
            .await
            .unwrap();

        let file: CollectionFile = toml::from_str(
            r#"
            [[decks]]
            name = "Knights"
            placements = [{ card = "Holy Knight" }]
            "#,
        )
        .unwrap();
        let err = service.import(file, true).await.unwrap_err();
        assert!(matches!(err, CollectionError::UnknownCard { .. }));
        assert_eq!(service.list_cards().await.unwrap().len(), 1);
        assert!(service.list_decks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_copies_survive_export_and_replace_import() {
        let service = test_service().await;
        let mut in_box_a = NewCard::new("Goblin", 1, 1, 1, Rarity::Common);
        in_box_a.location = "Box A".to_string();
        let mut in_box_b = in_box_a.clone();
        in_box_b.location = "Box B".to_string();
        service.add_card(in_box_a).await.unwrap();
        let placed = service.add_card(in_box_b).await.unwrap();
        let deck = service
            .add_deck(NewDeck::new("Aggro Deck", "", DeckType::Aggro))
            .await
            .unwrap();
        service
            .add_card_to_deck(deck.id, placed.id, vec!["Sleeve".into()])
            .await
            .unwrap();

        let before = service.export().await.unwrap();
        assert_eq!(before.decks[0].placements[0].card_index, Some(1));
        service.import(before, true).await.unwrap();

        let deck = &service.list_decks().await.unwrap()[0];
        let contents = service.deck_contents(deck.id).await.unwrap();
        assert_eq!(contents.cards.len(), 1);
        assert_eq!(contents.cards[0].0.location, "Box B");
        assert_eq!(contents.cards[0].1, ["Sleeve"]);
        assert_eq!(service.list_cards().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn card_index_must_match_listed_name() {
        let service = test_service().await;
        let file: CollectionFile = toml::from_str(
            r#"
            [[cards]]
            name = "Goblin"

            [[decks]]
            name = "Aggro Deck"
            placements = [{ card = "Golem", card_index = 0 }]
            "#,
        )
        .unwrap();
        let err = service.import(file, false).await.unwrap_err();
        assert!(matches!(err, CollectionError::CardIndex { index: 0, .. }));
        assert!(service.list_cards().await.unwrap().is_empty());
    }
}
