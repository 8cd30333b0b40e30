use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{Type, prelude::FromRow};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub cost: i64,
    pub attack: i64,
    pub defense: i64,
    pub rarity: Rarity,
    pub location: String,
    pub memo: String,
}

/// A card that has not been stored yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub name: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub attack: i64,
    #[serde(default)]
    pub defense: i64,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub memo: String,
}

impl NewCard {
    pub fn new(name: impl Into<String>, cost: i64, attack: i64, defense: i64, rarity: Rarity) -> Self {
        NewCard {
            name: name.into(),
            cost,
            attack,
            defense,
            rarity,
            location: String::new(),
            memo: String::new(),
        }
    }

    pub fn with_id(self, id: i64) -> Card {
        Card {
            id,
            name: self.name,
            cost: self.cost,
            attack: self.attack,
            defense: self.defense,
            rarity: self.rarity,
            location: self.location,
            memo: self.memo,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Type)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} \"{value}\"")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Rarity {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError {
                kind: "rarity",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_parses_case_insensitively() {
        assert_eq!("legendary".parse::<Rarity>(), Ok(Rarity::Legendary));
        assert_eq!(" Rare ".parse::<Rarity>(), Ok(Rarity::Rare));
        assert!("mythic".parse::<Rarity>().is_err());
    }

    #[test]
    fn new_card_defaults_location_and_memo() {
        let card = NewCard::new("Goblin", 1, 1, 1, Rarity::Common).with_id(7);
        assert_eq!(card.id, 7);
        assert_eq!(card.location, "");
        assert_eq!(card.memo, "");
    }

    #[test]
    fn cards_with_different_ids_are_not_equal() {
        let card = NewCard::new("Goblin", 1, 1, 1, Rarity::Common);
        assert_ne!(card.clone().with_id(1), card.with_id(2));
    }
}
