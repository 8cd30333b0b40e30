use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// One physical copy of a card sitting in a deck.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Placement {
    pub id: i64,
    pub deck_id: i64,
    pub card_id: i64,
    pub location: String,
}

pub const DEFAULT_LOCATION: &str = "default";
