use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use super::card::Rarity;

/// Cards sharing name, cost, attack, defense and rarity, folded into one row.
///
/// `location` and `memo` are the smallest values found in the group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GroupedCard {
    pub name: String,
    pub cost: i64,
    pub attack: i64,
    pub defense: i64,
    pub rarity: Rarity,
    pub location: String,
    pub memo: String,
    pub count: i64,
}
