use crate::{
    domain::{
        deck::{Deck, NewDeck},
        deck_contents::DeckContents,
    },
    repository::observe::Live,
    service::service::{Service, ServiceError},
};

/// State behind the deck list and deck detail screens.
pub struct DeckListViewModel<'a> {
    service: &'a Service,
    decks: Live<'a, Vec<Deck>>,
    current: Option<Deck>,
    selected: Option<Live<'a, Option<DeckContents>>>,
    show_add_dialog: bool,
    show_edit_dialog: bool,
    show_delete_dialog: bool,
    show_add_card_dialog: bool,
}

impl<'a> DeckListViewModel<'a> {
    pub async fn load(service: &'a Service) -> Result<Self, ServiceError> {
        Ok(DeckListViewModel {
            service,
            decks: service.repository().live_decks().await?,
            current: None,
            selected: None,
            show_add_dialog: false,
            show_edit_dialog: false,
            show_delete_dialog: false,
            show_add_card_dialog: false,
        })
    }

    /// Brings the list and the selected deck up to date with writes made since
    /// they were last read.
    pub async fn refresh(&mut self) -> Result<(), ServiceError> {
        self.decks.sync().await?;
        if let Some(selected) = &mut self.selected {
            selected.sync().await?;
        }
        Ok(())
    }

    pub fn decks(&self) -> &[Deck] {
        self.decks.get()
    }

    pub fn current(&self) -> Option<&Deck> {
        self.current.as_ref()
    }

    pub fn selected(&self) -> Option<&DeckContents> {
        self.selected.as_ref().and_then(|live| live.get().as_ref())
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected().map(|s| s.deck.id)
    }

    pub fn is_add_dialog_shown(&self) -> bool {
        self.show_add_dialog
    }

    pub fn is_edit_dialog_shown(&self) -> bool {
        self.show_edit_dialog
    }

    pub fn is_delete_dialog_shown(&self) -> bool {
        self.show_delete_dialog
    }

    pub fn is_add_card_dialog_shown(&self) -> bool {
        self.show_add_card_dialog
    }

    pub async fn add_deck(&mut self, deck: NewDeck) -> Result<Deck, ServiceError> {
        let stored = self.service.add_deck(deck).await?;
        self.hide_add_dialog();
        self.refresh().await?;
        Ok(stored)
    }

    /// Closes the edit dialog whether or not the update went through.
    pub async fn update_deck(&mut self, deck: Deck) -> Result<(), ServiceError> {
        let updated = self.service.update_deck(deck).await;
        self.hide_edit_dialog();
        updated?;
        self.refresh().await
    }

    pub async fn delete_deck(&mut self) -> Result<(), ServiceError> {
        let deleted = match self.current.take() {
            Some(deck) => {
                let deleted = self.service.delete_deck(deck.id).await;
                if deleted.is_ok() && self.selected_id() == Some(deck.id) {
                    self.selected = None;
                }
                deleted
            }
            None => Ok(()),
        };
        self.hide_delete_dialog();
        deleted?;
        self.refresh().await
    }

    pub async fn select_deck(&mut self, deck_id: i64) -> Result<(), ServiceError> {
        self.service.get_deck(deck_id).await?;
        self.selected = Some(self.service.repository().live_deck_contents(deck_id).await?);
        Ok(())
    }

    /// Ids of the cards placed in the selected deck, empty without a selection.
    pub async fn selected_card_ids(&self) -> Result<Vec<i64>, ServiceError> {
        match self.selected_id() {
            Some(deck_id) => self.service.card_ids_in_deck(deck_id).await,
            None => Ok(Vec::new()),
        }
    }

    pub fn clear_selected_deck(&mut self) {
        self.selected = None;
    }

    /// Adds one copy per location to the selected deck.
    pub async fn add_card_to_deck(
        &mut self,
        card_id: i64,
        locations: Vec<String>,
    ) -> Result<(), ServiceError> {
        if let Some(deck_id) = self.selected_id() {
            self.service
                .add_card_to_deck(deck_id, card_id, locations)
                .await?;
        }
        self.hide_add_card_dialog();
        self.refresh().await
    }

    /// Takes a single copy of the card out of the selected deck.
    pub async fn remove_card_from_deck(&mut self, card_id: i64) -> Result<(), ServiceError> {
        if let Some(deck_id) = self.selected_id() {
            self.service.remove_card_from_deck(deck_id, card_id).await?;
        }
        self.refresh().await
    }

    pub async fn remove_all_card_from_deck(&mut self, card_id: i64) -> Result<(), ServiceError> {
        if let Some(deck_id) = self.selected_id() {
            self.service
                .remove_all_card_from_deck(deck_id, card_id)
                .await?;
        }
        self.refresh().await
    }

    pub fn show_add_dialog(&mut self) {
        self.show_add_dialog = true;
    }

    pub fn hide_add_dialog(&mut self) {
        self.show_add_dialog = false;
    }

    pub fn show_edit_dialog(&mut self, deck: Deck) {
        self.current = Some(deck);
        self.show_edit_dialog = true;
    }

    pub fn hide_edit_dialog(&mut self) {
        self.show_edit_dialog = false;
        self.current = None;
    }

    pub fn show_delete_dialog(&mut self, deck: Deck) {
        self.current = Some(deck);
        self.show_delete_dialog = true;
    }

    pub fn hide_delete_dialog(&mut self) {
        self.show_delete_dialog = false;
        self.current = None;
    }

    pub fn show_add_card_dialog(&mut self) {
        self.show_add_card_dialog = true;
    }

    pub fn hide_add_card_dialog(&mut self) {
        self.show_add_card_dialog = false;
    }
}
