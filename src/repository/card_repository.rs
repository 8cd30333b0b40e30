use std::collections::HashMap;

use sqlx::{Sqlite, Transaction};

use crate::domain::{
    card::{Card, NewCard, Rarity},
    deck::Deck,
    deck_contents::CardWithDecks,
    grouped_card::GroupedCard,
};

use super::repository::{Repository, RepositoryError, Table};

const CARD_COLUMNS: &str = "id, name, cost, attack, defense, rarity, location, memo";

impl Repository {
    pub async fn list_cards(&self) -> Result<Vec<Card>, RepositoryError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    pub async fn list_cards_grouped(&self) -> Result<Vec<GroupedCard>, RepositoryError> {
        let groups = sqlx::query_as::<_, GroupedCard>(
            r#"
            SELECT
                name,
                cost,
                attack,
                defense,
                rarity,
                MIN(location) AS location,
                MIN(memo)     AS memo,
                COUNT(*)      AS count
            FROM cards
            GROUP BY name, cost, attack, defense, rarity
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }

    pub async fn get_card(&self, id: i64) -> Result<Option<Card>, RepositoryError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    pub async fn cards_by_rarity(&self, rarity: Rarity) -> Result<Vec<Card>, RepositoryError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE rarity = ? ORDER BY name ASC, id ASC"
        ))
        .bind(rarity)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    pub async fn cards_by_cost(&self, cost: i64) -> Result<Vec<Card>, RepositoryError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE cost = ? ORDER BY name ASC, id ASC"
        ))
        .bind(cost)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    pub async fn cards_by_name(&self, name: &str) -> Result<Vec<Card>, RepositoryError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE name = ? ORDER BY id ASC"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    pub async fn insert_card(&self, card: NewCard) -> Result<Card, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        let card = insert_card_in(&mut tx, card).await?;
        tx.commit().await?;

        tracing::info!(id = card.id, name = %card.name, "inserted card");
        self.touch(&[Table::Cards]);
        Ok(card)
    }

    pub async fn insert_cards(&self, cards: Vec<NewCard>) -> Result<Vec<Card>, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(cards.len());
        for card in cards {
            stored.push(insert_card_in(&mut tx, card).await?);
        }
        tx.commit().await?;

        tracing::info!(count = stored.len(), "inserted cards");
        self.touch(&[Table::Cards]);
        Ok(stored)
    }

    pub async fn update_card(&self, card: &Card) -> Result<(), RepositoryError> {
        let res = sqlx::query(
            r#"
            UPDATE cards
            SET
                name = ?,
                cost = ?,
                attack = ?,
                defense = ?,
                rarity = ?,
                location = ?,
                memo = ?
            WHERE id = ?
            "#,
        )
        .bind(&card.name)
        .bind(card.cost)
        .bind(card.attack)
        .bind(card.defense)
        .bind(card.rarity)
        .bind(&card.location)
        .bind(&card.memo)
        .bind(card.id)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            Err(RepositoryError::not_found("card", card.id))?
        }

        tracing::info!(id = card.id, "updated card");
        self.touch(&[Table::Cards]);
        Ok(())
    }

    /// Placements of the card go with it.
    pub async fn delete_card(&self, id: i64) -> Result<(), RepositoryError> {
        let res = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            Err(RepositoryError::not_found("card", id))?
        }

        tracing::info!(id, "deleted card");
        self.touch(&[Table::Cards, Table::Placements]);
        Ok(())
    }

    pub async fn delete_all_cards(&self) -> Result<u64, RepositoryError> {
        let res = sqlx::query("DELETE FROM cards").execute(&self.pool).await?;

        tracing::info!(count = res.rows_affected(), "deleted all cards");
        self.touch(&[Table::Cards, Table::Placements]);
        Ok(res.rows_affected())
    }

    pub async fn get_card_with_decks(
        &self,
        id: i64,
    ) -> Result<Option<CardWithDecks>, RepositoryError> {
        let Some(card) = self.get_card(id).await? else {
            return Ok(None);
        };
        let decks = sqlx::query_as::<_, Deck>(
            r#"
            SELECT DISTINCT d.id, d.name, d.description, d.deck_type
            FROM decks d
            INNER JOIN deck_card_locations p ON p.deck_id = d.id
            WHERE p.card_id = ?
            ORDER BY d.name ASC, d.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(CardWithDecks { card, decks }))
    }

    pub async fn list_cards_with_decks(&self) -> Result<Vec<CardWithDecks>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Membership {
            card_id: i64,
            #[sqlx(flatten)]
            deck: Deck,
        }

        let cards = self.list_cards().await?;
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT DISTINCT p.card_id, d.id, d.name, d.description, d.deck_type
            FROM deck_card_locations p
            INNER JOIN decks d ON d.id = p.deck_id
            ORDER BY d.name ASC, d.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut decks_by_card: HashMap<i64, Vec<Deck>> = HashMap::new();
        for membership in memberships {
            decks_by_card
                .entry(membership.card_id)
                .or_default()
                .push(membership.deck);
        }

        Ok(cards
            .into_iter()
            .map(|card| CardWithDecks {
                decks: decks_by_card.remove(&card.id).unwrap_or_default(),
                card,
            })
            .collect())
    }
}

pub(in crate::repository) async fn insert_card_in(
    tx: &mut Transaction<'_, Sqlite>,
    card: NewCard,
) -> Result<Card, RepositoryError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO cards
            (name, cost, attack, defense, rarity, location, memo)
        VALUES
            (?,    ?,    ?,      ?,       ?,      ?,        ?)
        RETURNING id
        "#,
    )
    .bind(&card.name)
    .bind(card.cost)
    .bind(card.attack)
    .bind(card.defense)
    .bind(card.rarity)
    .bind(&card.location)
    .bind(&card.memo)
    .fetch_one(&mut **tx)
    .await?;
    Ok(card.with_id(id))
}
