use serde::Serialize;

use super::{card::Card, deck::Deck};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DeckContents {
    pub deck: Deck,
    /// Each distinct card with the location of every copy, in placement order.
    pub cards: Vec<(Card, Vec<String>)>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CardWithLocation {
    pub card: Card,
    pub location: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CardWithDecks {
    pub card: Card,
    pub decks: Vec<Deck>,
}

impl DeckContents {
    pub fn empty(deck: Deck) -> Self {
        DeckContents {
            deck,
            cards: Vec::new(),
        }
    }

    pub fn card_type_count(&self) -> usize {
        self.cards.len()
    }

    pub fn card_count(&self) -> usize {
        self.cards.iter().map(|(_, locations)| locations.len()).sum()
    }

    pub fn card_with_locations(&self) -> Vec<CardWithLocation> {
        self.cards
            .iter()
            .flat_map(|(card, locations)| {
                locations.iter().map(move |location| CardWithLocation {
                    card: card.clone(),
                    location: location.clone(),
                })
            })
            .collect()
    }

    pub fn count_of(&self, card_id: i64) -> usize {
        self.cards
            .iter()
            .find(|(card, _)| card.id == card_id)
            .map_or(0, |(_, locations)| locations.len())
    }

    /// Appends a copy, keeping the first-seen order of distinct cards.
    pub(crate) fn push(&mut self, card: Card, location: String) {
        match self.cards.iter_mut().find(|(c, _)| c.id == card.id) {
            Some((_, locations)) => locations.push(location),
            None => self.cards.push((card, vec![location])),
        }
    }
}
