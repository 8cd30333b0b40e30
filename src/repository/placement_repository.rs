use sqlx::{Sqlite, Transaction};

use crate::domain::placement::Placement;

use super::repository::{Repository, RepositoryError, Table};

impl Repository {
    pub async fn add_card_to_deck(
        &self,
        deck_id: i64,
        card_id: i64,
        location: &str,
    ) -> Result<Placement, RepositoryError> {
        let mut placements = self
            .add_card_copies_to_deck(deck_id, card_id, &[location.to_string()])
            .await?;
        Ok(placements.remove(0))
    }

    /// Inserts one placement per location, all or nothing.
    pub async fn add_card_copies_to_deck(
        &self,
        deck_id: i64,
        card_id: i64,
        locations: &[String],
    ) -> Result<Vec<Placement>, RepositoryError> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        let mut placements = Vec::with_capacity(locations.len());
        for location in locations {
            placements.push(insert_placement_in(&mut tx, deck_id, card_id, location).await?);
        }
        tx.commit().await?;

        tracing::info!(deck_id, card_id, copies = placements.len(), "placed card");
        self.touch(&[Table::Placements]);
        Ok(placements)
    }

    /// Removes every copy of the card from the deck.
    pub async fn remove_card_from_deck(
        &self,
        deck_id: i64,
        card_id: i64,
    ) -> Result<u64, RepositoryError> {
        let res = sqlx::query("DELETE FROM deck_card_locations WHERE deck_id = ? AND card_id = ?")
            .bind(deck_id)
            .bind(card_id)
            .execute(&self.pool)
            .await?;
        self.placements_removed(deck_id, card_id, res.rows_affected())
    }

    pub async fn remove_card_location_from_deck(
        &self,
        deck_id: i64,
        card_id: i64,
        location: &str,
    ) -> Result<u64, RepositoryError> {
        let res = sqlx::query(
            r#"
            DELETE FROM deck_card_locations
            WHERE deck_id = ? AND card_id = ? AND location = ?
            "#,
        )
        .bind(deck_id)
        .bind(card_id)
        .bind(location)
        .execute(&self.pool)
        .await?;
        self.placements_removed(deck_id, card_id, res.rows_affected())
    }

    /// Removes the most recently placed copy only.
    pub async fn remove_one_card_from_deck(
        &self,
        deck_id: i64,
        card_id: i64,
    ) -> Result<u64, RepositoryError> {
        let res = sqlx::query(
            r#"
            DELETE FROM deck_card_locations
            WHERE id = (
                SELECT id FROM deck_card_locations
                WHERE deck_id = ? AND card_id = ?
                ORDER BY id DESC
                LIMIT 1
            )
            "#,
        )
        .bind(deck_id)
        .bind(card_id)
        .execute(&self.pool)
        .await?;
        self.placements_removed(deck_id, card_id, res.rows_affected())
    }

    pub async fn deck_placements(&self, deck_id: i64) -> Result<Vec<Placement>, RepositoryError> {
        let placements = sqlx::query_as::<_, Placement>(
            r#"
            SELECT id, deck_id, card_id, location
            FROM deck_card_locations
            WHERE deck_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(placements)
    }

    pub async fn card_ids_in_deck(&self, deck_id: i64) -> Result<Vec<i64>, RepositoryError> {
        let ids = sqlx::query_scalar(
            "SELECT DISTINCT card_id FROM deck_card_locations WHERE deck_id = ? ORDER BY card_id",
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    fn placements_removed(
        &self,
        deck_id: i64,
        card_id: i64,
        removed: u64,
    ) -> Result<u64, RepositoryError> {
        if removed > 0 {
            tracing::info!(deck_id, card_id, removed, "removed card from deck");
            self.touch(&[Table::Placements]);
        }
        Ok(removed)
    }
}

pub(in crate::repository) async fn insert_placement_in(
    tx: &mut Transaction<'_, Sqlite>,
    deck_id: i64,
    card_id: i64,
    location: &str,
) -> Result<Placement, RepositoryError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO deck_card_locations
            (deck_id, card_id, location)
        VALUES
            (?,       ?,       ?)
        RETURNING id
        "#,
    )
    .bind(deck_id)
    .bind(card_id)
    .bind(location)
    .fetch_one(&mut **tx)
    .await?;
    Ok(Placement {
        id,
        deck_id,
        card_id,
        location: location.to_string(),
    })
}
