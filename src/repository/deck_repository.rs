use sqlx::{Sqlite, Transaction};

use crate::domain::{
    card::Card,
    deck::{Deck, DeckType, NewDeck},
    deck_contents::DeckContents,
};

use super::repository::{Repository, RepositoryError, Table};

impl Repository {
    pub async fn list_decks(&self) -> Result<Vec<Deck>, RepositoryError> {
        let decks = sqlx::query_as::<_, Deck>(
            "SELECT id, name, description, deck_type FROM decks ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(decks)
    }

    pub async fn get_deck(&self, id: i64) -> Result<Option<Deck>, RepositoryError> {
        let deck = sqlx::query_as::<_, Deck>(
            "SELECT id, name, description, deck_type FROM decks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deck)
    }

    pub async fn decks_by_type(&self, deck_type: DeckType) -> Result<Vec<Deck>, RepositoryError> {
        let decks = sqlx::query_as::<_, Deck>(
            r#"
            SELECT id, name, description, deck_type
            FROM decks
            WHERE deck_type = ?
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(deck_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(decks)
    }

    pub async fn insert_deck(&self, deck: NewDeck) -> Result<Deck, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        let deck = insert_deck_in(&mut tx, deck).await?;
        tx.commit().await?;

        tracing::info!(id = deck.id, name = %deck.name, "inserted deck");
        self.touch(&[Table::Decks]);
        Ok(deck)
    }

    pub async fn insert_decks(&self, decks: Vec<NewDeck>) -> Result<Vec<Deck>, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(decks.len());
        for deck in decks {
            stored.push(insert_deck_in(&mut tx, deck).await?);
        }
        tx.commit().await?;

        tracing::info!(count = stored.len(), "inserted decks");
        self.touch(&[Table::Decks]);
        Ok(stored)
    }

    pub async fn update_deck(&self, deck: &Deck) -> Result<(), RepositoryError> {
        let res = sqlx::query(
            r#"
            UPDATE decks
            SET
                name = ?,
                description = ?,
                deck_type = ?
            WHERE id = ?
            "#,
        )
        .bind(&deck.name)
        .bind(&deck.description)
        .bind(deck.deck_type)
        .bind(deck.id)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            Err(RepositoryError::not_found("deck", deck.id))?
        }

        tracing::info!(id = deck.id, "updated deck");
        self.touch(&[Table::Decks]);
        Ok(())
    }

    pub async fn delete_deck(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        sqlx::query("DELETE FROM deck_card_locations WHERE deck_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM decks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            Err(RepositoryError::not_found("deck", id))?
        }
        tx.commit().await?;

        tracing::info!(id, "deleted deck");
        self.touch(&[Table::Decks, Table::Placements]);
        Ok(())
    }

    pub async fn delete_all_decks(&self) -> Result<u64, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        sqlx::query("DELETE FROM deck_card_locations")
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM decks").execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(count = res.rows_affected(), "deleted all decks");
        self.touch(&[Table::Decks, Table::Placements]);
        Ok(res.rows_affected())
    }

    pub async fn get_deck_contents(&self, id: i64) -> Result<Option<DeckContents>, RepositoryError> {
        let Some(deck) = self.get_deck(id).await? else {
            return Ok(None);
        };
        self.fill_contents(deck).await.map(Some)
    }

    pub async fn list_deck_contents(&self) -> Result<Vec<DeckContents>, RepositoryError> {
        let decks = self.list_decks().await?;
        let mut contents = Vec::with_capacity(decks.len());
        for deck in decks {
            contents.push(self.fill_contents(deck).await?);
        }
        Ok(contents)
    }

    async fn fill_contents(&self, deck: Deck) -> Result<DeckContents, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct PlacedCard {
            #[sqlx(flatten)]
            card: Card,
            placed_at: String,
        }

        let rows = sqlx::query_as::<_, PlacedCard>(
            r#"
            SELECT
                c.id,
                c.name,
                c.cost,
                c.attack,
                c.defense,
                c.rarity,
                c.location,
                c.memo,
                p.location AS placed_at
            FROM deck_card_locations p
            INNER JOIN cards c ON c.id = p.card_id
            WHERE p.deck_id = ?
            ORDER BY p.id ASC
            "#,
        )
        .bind(deck.id)
        .fetch_all(&self.pool)
        .await?;

        let mut contents = DeckContents::empty(deck);
        for row in rows {
            contents.push(row.card, row.placed_at);
        }
        Ok(contents)
    }
}

pub(in crate::repository) async fn insert_deck_in(
    tx: &mut Transaction<'_, Sqlite>,
    deck: NewDeck,
) -> Result<Deck, RepositoryError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO decks
            (name, description, deck_type)
        VALUES
            (?,    ?,           ?)
        RETURNING id
        "#,
    )
    .bind(&deck.name)
    .bind(&deck.description)
    .bind(deck.deck_type)
    .fetch_one(&mut **tx)
    .await?;
    Ok(deck.with_id(id))
}
