use std::future::Future;

use futures::{Stream, StreamExt, stream::LocalBoxStream};

use crate::domain::{
    card::Card, deck::Deck, deck_contents::DeckContents, grouped_card::GroupedCard,
};

use super::repository::{Repository, RepositoryError, Revision, Table};

const CARDS: &[Table] = &[Table::Cards];
const DECKS: &[Table] = &[Table::Decks];
const DECK_CONTENTS: &[Table] = &[Table::Decks, Table::Cards, Table::Placements];

type Tagged<T> = (Revision, Result<T, RepositoryError>);

impl Repository {
    pub fn observe_cards(&self) -> impl Stream<Item = Result<Vec<Card>, RepositoryError>> + '_ {
        untag(self.observe(CARDS, |repo| repo.list_cards()))
    }

    pub fn observe_grouped_cards(
        &self,
    ) -> impl Stream<Item = Result<Vec<GroupedCard>, RepositoryError>> + '_ {
        untag(self.observe(CARDS, |repo| repo.list_cards_grouped()))
    }

    pub fn observe_decks(&self) -> impl Stream<Item = Result<Vec<Deck>, RepositoryError>> + '_ {
        untag(self.observe(DECKS, |repo| repo.list_decks()))
    }

    pub fn observe_deck_contents(
        &self,
        deck_id: i64,
    ) -> impl Stream<Item = Result<Option<DeckContents>, RepositoryError>> + '_ {
        untag(self.observe(DECK_CONTENTS, move |repo| {
            repo.get_deck_contents(deck_id)
        }))
    }

    pub async fn live_cards(&self) -> Result<Live<'_, Vec<Card>>, RepositoryError> {
        Live::start(self, CARDS, self.observe(CARDS, |repo| repo.list_cards())).await
    }

    pub async fn live_decks(&self) -> Result<Live<'_, Vec<Deck>>, RepositoryError> {
        Live::start(self, DECKS, self.observe(DECKS, |repo| repo.list_decks())).await
    }

    pub async fn live_deck_contents(
        &self,
        deck_id: i64,
    ) -> Result<Live<'_, Option<DeckContents>>, RepositoryError> {
        let stream = self.observe(DECK_CONTENTS, move |repo| {
            repo.get_deck_contents(deck_id)
        });
        Live::start(self, DECK_CONTENTS, stream).await
    }

    /// Yields `query` now and again after every write touching one of `tables`,
    /// each result tagged with the revision it was read at.
    fn observe<'a, T, F, Fut>(
        &'a self,
        tables: &'static [Table],
        query: F,
    ) -> impl Stream<Item = Tagged<T>> + 'a
    where
        T: 'a,
        F: Fn(&'a Repository) -> Fut + 'a,
        Fut: Future<Output = Result<T, RepositoryError>> + 'a,
    {
        let mut changes = self.changes.subscribe();
        async_stream::stream! {
            let mut seen = *changes.borrow_and_update();
            yield (seen, query(self).await);

            while changes.changed().await.is_ok() {
                let now = *changes.borrow_and_update();
                if now.changed_since(&seen, tables) {
                    seen = now;
                    yield (seen, query(self).await);
                }
            }
        }
    }
}

fn untag<'a, T: 'a>(
    stream: impl Stream<Item = Tagged<T>> + 'a,
) -> impl Stream<Item = Result<T, RepositoryError>> + 'a {
    stream.map(|(_, result)| result)
}

/// Latest value of an observed query. `sync` takes the next item from the
/// stream only when a watched table was written since the held value was read,
/// so it never waits on a change that did not happen.
pub struct Live<'a, T> {
    repository: &'a Repository,
    tables: &'static [Table],
    stream: LocalBoxStream<'a, Tagged<T>>,
    seen: Revision,
    value: T,
}

impl<'a, T: 'a> Live<'a, T> {
    async fn start(
        repository: &'a Repository,
        tables: &'static [Table],
        stream: impl Stream<Item = Tagged<T>> + 'a,
    ) -> Result<Live<'a, T>, RepositoryError> {
        let mut stream = stream.boxed_local();
        let (seen, value) = next_item(&mut stream).await;
        Ok(Live {
            repository,
            tables,
            stream,
            seen,
            value: value?,
        })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// On a failed read the previous value is kept.
    pub async fn sync(&mut self) -> Result<&T, RepositoryError> {
        if self
            .repository
            .revision()
            .changed_since(&self.seen, self.tables)
        {
            let (seen, value) = next_item(&mut self.stream).await;
            self.seen = seen;
            self.value = value?;
        }
        Ok(&self.value)
    }
}

async fn next_item<T>(stream: &mut LocalBoxStream<'_, Tagged<T>>) -> Tagged<T> {
    match stream.next().await {
        Some(item) => item,
        None => (Revision::default(), Err(RepositoryError::Closed)),
    }
}
