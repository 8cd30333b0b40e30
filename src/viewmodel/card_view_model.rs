use crate::{
    domain::{
        card::{Card, NewCard},
        grouped_card::GroupedCard,
    },
    repository::observe::Live,
    service::service::{Service, ServiceError},
};

/// State behind the card list screen and its add/edit/delete dialogs.
pub struct CardListViewModel<'a> {
    service: &'a Service,
    cards: Live<'a, Vec<Card>>,
    current: Option<Card>,
    show_add_dialog: bool,
    show_edit_dialog: bool,
    show_delete_dialog: bool,
}

impl<'a> CardListViewModel<'a> {
    pub async fn load(service: &'a Service) -> Result<Self, ServiceError> {
        Ok(CardListViewModel {
            service,
            cards: service.repository().live_cards().await?,
            current: None,
            show_add_dialog: false,
            show_edit_dialog: false,
            show_delete_dialog: false,
        })
    }

    /// Picks up writes made since the list was last read, from here or elsewhere.
    pub async fn refresh(&mut self) -> Result<(), ServiceError> {
        self.cards.sync().await?;
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        self.cards.get()
    }

    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
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

    pub async fn grouped(&self) -> Result<Vec<GroupedCard>, ServiceError> {
        self.service.list_cards_grouped().await
    }

    pub async fn add_card(&mut self, card: NewCard) -> Result<Card, ServiceError> {
        let stored = self.service.add_card(card).await?;
        self.hide_add_dialog();
        self.refresh().await?;
        Ok(stored)
    }

    /// Closes the edit dialog whether or not the update went through.
    pub async fn update_card(&mut self, card: Card) -> Result<(), ServiceError> {
        let updated = self.service.update_card(card).await;
        self.hide_edit_dialog();
        updated?;
        self.refresh().await
    }

    /// Deletes the card picked with `show_delete_dialog`, then closes the dialog.
    pub async fn delete_card(&mut self) -> Result<(), ServiceError> {
        let deleted = match self.current.take() {
            Some(card) => self.service.delete_card(card.id).await,
            None => Ok(()),
        };
        self.hide_delete_dialog();
        deleted?;
        self.refresh().await
    }

    pub fn show_add_dialog(&mut self) {
        self.show_add_dialog = true;
    }

    pub fn hide_add_dialog(&mut self) {
        self.show_add_dialog = false;
    }

    pub fn show_edit_dialog(&mut self, card: Card) {
        self.current = Some(card);
        self.show_edit_dialog = true;
    }

    pub fn hide_edit_dialog(&mut self) {
        self.show_edit_dialog = false;
        self.current = None;
    }

    pub fn show_delete_dialog(&mut self, card: Card) {
        self.current = Some(card);
        self.show_delete_dialog = true;
    }

    pub fn hide_delete_dialog(&mut self) {
        self.show_delete_dialog = false;
        self.current = None;
    }
}
