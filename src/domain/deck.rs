use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{Type, prelude::FromRow};

use super::card::ParseKindError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub deck_type: DeckType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewDeck {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deck_type: DeckType,
}

impl NewDeck {
    pub fn new(name: impl Into<String>, description: impl Into<String>, deck_type: DeckType) -> Self {
        NewDeck {
            name: name.into(),
            description: description.into(),
            deck_type,
        }
    }

    pub fn with_id(self, id: i64) -> Deck {
        Deck {
            id,
            name: self.name,
            description: self.description,
            deck_type: self.deck_type,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Type)]
pub enum DeckType {
    #[default]
    Balanced,
    Aggro,
    Defensive,
    Combo,
    Control,
}

impl DeckType {
    pub const ALL: [DeckType; 5] = [
        DeckType::Balanced,
        DeckType::Aggro,
        DeckType::Defensive,
        DeckType::Combo,
        DeckType::Control,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeckType::Balanced => "Balanced",
            DeckType::Aggro => "Aggro",
            DeckType::Defensive => "Defensive",
            DeckType::Combo => "Combo",
            DeckType::Control => "Control",
        }
    }
}

impl fmt::Display for DeckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeckType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeckType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError {
                kind: "deck type",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_type_round_trips_through_display() {
        for deck_type in DeckType::ALL {
            assert_eq!(deck_type.to_string().parse::<DeckType>(), Ok(deck_type));
        }
        assert_eq!(
            "tempo".parse::<DeckType>().unwrap_err().to_string(),
            "unknown deck type \"tempo\""
        );
    }
}
