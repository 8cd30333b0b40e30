//! Input state of the add/edit dialogs, independent of how it is collected.

use crate::{
    domain::{
        card::{Card, NewCard, Rarity},
        deck::{Deck, DeckType, NewDeck},
    },
    service::deck_service::{MAX_COPIES_PER_ADD, normalize_location},
};

/// Unparseable numbers count as zero.
fn lenient_number(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardForm {
    pub name: String,
    pub cost: String,
    pub attack: String,
    pub defense: String,
    pub rarity: Rarity,
    pub location: String,
    pub memo: String,
}

impl Default for CardForm {
    fn default() -> Self {
        CardForm {
            name: String::new(),
            cost: "0".to_string(),
            attack: "0".to_string(),
            defense: "0".to_string(),
            rarity: Rarity::Common,
            location: String::new(),
            memo: String::new(),
        }
    }
}

impl CardForm {
    pub fn from_card(card: &Card) -> Self {
        CardForm {
            name: card.name.clone(),
            cost: card.cost.to_string(),
            attack: card.attack.to_string(),
            defense: card.defense.to_string(),
            rarity: card.rarity,
            location: card.location.clone(),
            memo: card.memo.clone(),
        }
    }

    /// `None` while the name is blank.
    pub fn to_new_card(&self) -> Option<NewCard> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(NewCard {
            name: self.name.trim().to_string(),
            cost: lenient_number(&self.cost),
            attack: lenient_number(&self.attack),
            defense: lenient_number(&self.defense),
            rarity: self.rarity,
            location: self.location.trim().to_string(),
            memo: self.memo.clone(),
        })
    }

    pub fn apply_to(&self, card: &Card) -> Option<Card> {
        self.to_new_card().map(|new| new.with_id(card.id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckForm {
    pub name: String,
    pub description: String,
    pub deck_type: DeckType,
}

impl DeckForm {
    pub fn from_deck(deck: &Deck) -> Self {
        DeckForm {
            name: deck.name.clone(),
            description: deck.description.clone(),
            deck_type: deck.deck_type,
        }
    }

    pub fn to_new_deck(&self) -> Option<NewDeck> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(NewDeck::new(
            self.name.trim(),
            self.description.clone(),
            self.deck_type,
        ))
    }

    pub fn apply_to(&self, deck: &Deck) -> Option<Deck> {
        self.to_new_deck().map(|new| new.with_id(deck.id))
    }
}

/// A picked card plus one location field per copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCardToDeckForm {
    pub card_id: Option<i64>,
    locations: Vec<String>,
}

impl Default for AddCardToDeckForm {
    fn default() -> Self {
        AddCardToDeckForm {
            card_id: None,
            locations: vec![String::new()],
        }
    }
}

impl AddCardToDeckForm {
    /// One blank location, with the card already picked.
    pub fn for_card(card_id: i64) -> Self {
        AddCardToDeckForm {
            card_id: Some(card_id),
            ..AddCardToDeckForm::default()
        }
    }

    pub fn copies(&self) -> usize {
        self.locations.len()
    }

    pub fn can_increment(&self) -> bool {
        self.copies() < MAX_COPIES_PER_ADD
    }

    pub fn can_decrement(&self) -> bool {
        self.copies() > 1
    }

    pub fn increment(&mut self) {
        if self.can_increment() {
            self.locations.push(String::new());
        }
    }

    pub fn decrement(&mut self) {
        if self.can_decrement() {
            self.locations.pop();
        }
    }

    pub fn set_location(&mut self, index: usize, location: impl Into<String>) {
        if let Some(slot) = self.locations.get_mut(index) {
            *slot = location.into();
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// `None` until a card is picked.
    pub fn submit(&self) -> Option<(i64, Vec<String>)> {
        let card_id = self.card_id?;
        let locations = self
            .locations
            .iter()
            .map(|location| normalize_location(location))
            .collect();
        Some((card_id, locations))
    }
}

/// Answer to "apply these changes?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmUpdate {
    Yes,
    No,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision<T> {
    Apply(T),
    Discard,
    KeepEditing,
}

impl ConfirmUpdate {
    pub const ALL: [ConfirmUpdate; 3] = [ConfirmUpdate::Yes, ConfirmUpdate::No, ConfirmUpdate::Cancel];

    pub fn label(&self) -> &'static str {
        match self {
            ConfirmUpdate::Yes => "Yes",
            ConfirmUpdate::No => "No",
            ConfirmUpdate::Cancel => "Cancel",
        }
    }

    /// Yes with nothing valid to apply behaves like No.
    pub fn resolve<T>(self, pending: Option<T>) -> UpdateDecision<T> {
        match (self, pending) {
            (ConfirmUpdate::Yes, Some(update)) => UpdateDecision::Apply(update),
            (ConfirmUpdate::Yes, None) | (ConfirmUpdate::No, _) => UpdateDecision::Discard,
            (ConfirmUpdate::Cancel, _) => UpdateDecision::KeepEditing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::placement::DEFAULT_LOCATION;

    #[test]
    fn card_form_parses_numbers_leniently() {
        let form = CardForm {
            name: " Goblin ".to_string(),
            cost: "3".to_string(),
            attack: "abc".to_string(),
            defense: "".to_string(),
            ..CardForm::default()
        };
        let card = form.to_new_card().unwrap();
        assert_eq!(card.name, "Goblin");
        assert_eq!((card.cost, card.attack, card.defense), (3, 0, 0));
        assert_eq!(card.rarity, Rarity::Common);
    }

    #[test]
    fn blank_name_yields_nothing() {
        assert!(CardForm::default().to_new_card().is_none());
        assert!(DeckForm::default().to_new_deck().is_none());
    }

    #[test]
    fn edit_form_keeps_id() {
        let card = NewCard::new("Golem", 6, 5, 7, Rarity::Rare).with_id(9);
        let mut form = CardForm::from_card(&card);
        form.memo = "heavy".to_string();
        let edited = form.apply_to(&card).unwrap();
        assert_eq!(edited.id, 9);
        assert_eq!(edited.memo, "heavy");
        assert_eq!(edited.defense, 7);

        let deck = NewDeck::new("Combo", "", DeckType::Combo).with_id(4);
        let mut deck_form = DeckForm::from_deck(&deck);
        deck_form.deck_type = DeckType::Control;
        assert_eq!(deck_form.apply_to(&deck).unwrap().deck_type, DeckType::Control);
    }

    #[test]
    fn copies_stay_between_one_and_four() {
        let mut form = AddCardToDeckForm::default();
        assert!(!form.can_decrement());
        form.decrement();
        assert_eq!(form.copies(), 1);

        for _ in 0..10 {
            form.increment();
        }
        assert_eq!(form.copies(), MAX_COPIES_PER_ADD);
        assert!(!form.can_increment());
    }

    #[test]
    fn submit_needs_card_and_fills_blank_locations() {
        let mut form = AddCardToDeckForm::default();
        assert!(form.submit().is_none());

        form.card_id = Some(3);
        form.increment();
        form.set_location(0, "Binder");
        let (card_id, locations) = form.submit().unwrap();
        assert_eq!(card_id, 3);
        assert_eq!(locations, ["Binder", DEFAULT_LOCATION]);
    }

    #[test]
    fn form_for_picked_card_starts_with_one_copy() {
        let mut form = AddCardToDeckForm::for_card(7);
        assert_eq!(form.copies(), 1);
        assert_eq!(form.locations(), [""]);

        for _ in 0..10 {
            form.increment();
        }
        let (card_id, locations) = form.submit().unwrap();
        assert_eq!(card_id, 7);
        assert_eq!(locations, vec![DEFAULT_LOCATION; MAX_COPIES_PER_ADD]);
    }

    #[test]
    fn confirm_update_decisions() {
        assert_eq!(ConfirmUpdate::Yes.resolve(Some(1)), UpdateDecision::Apply(1));
        assert_eq!(ConfirmUpdate::Yes.resolve::<i32>(None), UpdateDecision::Discard);
        assert_eq!(ConfirmUpdate::No.resolve(Some(1)), UpdateDecision::Discard);
        assert_eq!(ConfirmUpdate::Cancel.resolve(Some(1)), UpdateDecision::KeepEditing);
    }
}
