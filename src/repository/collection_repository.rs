use sqlx::{Sqlite, Transaction};

use crate::domain::{card::NewCard, deck::NewDeck};

use super::{
    card_repository::insert_card_in,
    deck_repository::insert_deck_in,
    placement_repository::insert_placement_in,
    repository::{Repository, RepositoryError, Table},
};

/// Card a placement points at while a collection is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRef {
    /// Position in the batch of cards written alongside.
    New(usize),
    /// Card already in the store.
    Stored(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckBatch {
    pub deck: NewDeck,
    pub placements: Vec<(CardRef, String)>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub cards: usize,
    pub decks: usize,
    pub placements: usize,
}

impl Repository {
    /// Writes cards, decks and their placements as one transaction. With `replace`,
    /// the existing collection is deleted inside that same transaction, so a failure
    /// anywhere leaves the store as it was.
    pub async fn write_collection(
        &self,
        replace: bool,
        cards: Vec<NewCard>,
        decks: Vec<DeckBatch>,
    ) -> Result<ImportSummary, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        if replace {
            sqlx::query("DELETE FROM deck_card_locations")
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM decks").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM cards").execute(&mut *tx).await?;
        }

        let mut card_ids = Vec::with_capacity(cards.len());
        for card in cards {
            card_ids.push(insert_card_in(&mut tx, card).await?.id);
        }

        let mut summary = ImportSummary {
            cards: card_ids.len(),
            ..ImportSummary::default()
        };
        for DeckBatch { deck, placements } in decks {
            let deck = insert_deck_in(&mut tx, deck).await?;
            summary.decks += 1;
            for (card, location) in placements {
                let card_id = match card {
                    CardRef::New(index) => *card_ids.get(index).ok_or_else(|| {
                        RepositoryError::NotFound("card".into(), format!("#{index} in batch"))
                    })?,
                    CardRef::Stored(id) => id,
                };
                insert_placement_in(&mut tx, deck.id, card_id, &location).await?;
                summary.placements += 1;
            }
        }
        tx.commit().await?;

        tracing::info!(
            replace,
            cards = summary.cards,
            decks = summary.decks,
            placements = summary.placements,
            "wrote collection"
        );
        self.touch(&[Table::Cards, Table::Decks, Table::Placements]);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{card::Rarity, deck::DeckType};

    async fn stocked() -> Repository {
        let repo = Repository::in_memory().await.unwrap();
        let goblin = repo
            .insert_card(NewCard::new("Goblin", 1, 1, 1, Rarity::Common))
            .await
            .unwrap();
        let deck = repo
            .insert_deck(NewDeck::new("Aggro Deck", "", DeckType::Aggro))
            .await
            .unwrap();
        repo.add_card_to_deck(deck.id, goblin.id, "Box").await.unwrap();
        repo
    }

    #[tokio::test]
    async fn writes_batch_cards_and_stored_references() {
        let repo = stocked().await;
        let stored = repo.list_cards().await.unwrap()[0].id;

        let summary = repo
            .write_collection(
                false,
                vec![
                    NewCard::new("Golem", 6, 5, 7, Rarity::Rare),
                    NewCard::new("Golem", 6, 5, 7, Rarity::Rare),
                ],
                vec![DeckBatch {
                    deck: NewDeck::new("Walls", "", DeckType::Defensive),
                    placements: vec![
                        (CardRef::New(1), "Sleeve".to_string()),
                        (CardRef::Stored(stored), "Box".to_string()),
                    ],
                }],
            )
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                cards: 2,
                decks: 1,
                placements: 2
            }
        );

        let golems = repo.cards_by_name("Golem").await.unwrap();
        let walls = repo
            .decks_by_type(DeckType::Defensive)
            .await
            .unwrap()
            .remove(0);
        let placed = repo.deck_placements(walls.id).await.unwrap();
        assert_eq!(placed[0].card_id, golems[1].id);
        assert_eq!(placed[1].card_id, stored);
    }

    #[tokio::test]
    async fn failed_replace_keeps_existing_collection() {
        let repo = stocked().await;
        let before_cards = repo.list_cards().await.unwrap();
        let before_decks = repo.list_deck_contents().await.unwrap();

        let result = repo
            .write_collection(
                true,
                vec![NewCard::new("Golem", 6, 5, 7, Rarity::Rare)],
                vec![
                    DeckBatch {
                        deck: NewDeck::new("First", "", DeckType::Balanced),
                        placements: vec![(CardRef::New(0), "Box".to_string())],
                    },
                    DeckBatch {
                        deck: NewDeck::new("Broken", "", DeckType::Combo),
                        placements: vec![(CardRef::Stored(before_cards[0].id), "Box".to_string())],
                    },
                ],
            )
            .await;
        assert!(result.is_err());

        assert_eq!(repo.list_cards().await.unwrap(), before_cards);
        assert_eq!(repo.list_deck_contents().await.unwrap(), before_decks);
    }

    #[tokio::test]
    async fn out_of_range_batch_index_is_rejected() {
        let repo = stocked().await;
        let result = repo
            .write_collection(
                false,
                Vec::new(),
                vec![DeckBatch {
                    deck: NewDeck::new("Empty hands", "", DeckType::Balanced),
                    placements: vec![(CardRef::New(3), String::new())],
                }],
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(..))));
        assert_eq!(repo.list_decks().await.unwrap().len(), 1);
    }
}
