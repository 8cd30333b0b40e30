use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{card::NewCard, deck::DeckType};

#[derive(Debug, Error)]
pub enum CollectionFileError {
    #[error("failed to access file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// On-disk shape of an exported collection.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct CollectionFile {
    #[serde(default)]
    pub cards: Vec<NewCard>,
    #[serde(default)]
    pub decks: Vec<DeckEntry>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct DeckEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deck_type: DeckType,
    #[serde(default)]
    pub placements: Vec<PlacementEntry>,
}

/// A card copy placed in a deck. `card_index` points into `cards` of the same
/// file and picks one copy among cards sharing a name. Without it the name
/// resolves to the first listed card, then to a stored card.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct PlacementEntry {
    pub card: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<usize>,
    #[serde(default)]
    pub location: String,
}

impl CollectionFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<CollectionFile, CollectionFileError> {
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CollectionFileError> {
        let data = toml::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Rarity;

    #[test]
    fn parses_minimal_collection() {
        let file: CollectionFile = toml::from_str(
            r#"
            [[cards]]
            name = "Goblin"
            cost = 1
            rarity = "Common"

            [[decks]]
            name = "Aggro Deck"
            deck_type = "Aggro"
            placements = [{ card = "Goblin", location = "Binder A" }, { card = "Goblin" }]
            "#,
        )
        .unwrap();

        assert_eq!(file.cards.len(), 1);
        assert_eq!(file.cards[0].rarity, Rarity::Common);
        assert_eq!(file.cards[0].attack, 0);
        assert_eq!(file.decks[0].deck_type, DeckType::Aggro);
        assert_eq!(file.decks[0].description, "");
        assert_eq!(file.decks[0].placements[1].location, "");
        assert_eq!(file.decks[0].placements[0].card_index, None);
    }

    #[test]
    fn saved_file_keeps_card_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.toml");
        let file = CollectionFile {
            cards: vec![
                NewCard::new("Goblin", 1, 1, 1, Rarity::Common),
                NewCard::new("Goblin", 1, 1, 1, Rarity::Common),
            ],
            decks: vec![DeckEntry {
                name: "Aggro Deck".to_string(),
                description: String::new(),
                deck_type: DeckType::Aggro,
                placements: vec![PlacementEntry {
                    card: "Goblin".to_string(),
                    card_index: Some(1),
                    location: "Box B".to_string(),
                }],
            }],
        };
        file.save(&path).unwrap();

        assert_eq!(CollectionFile::load(&path).unwrap(), file);
    }

    #[test]
    fn rejects_unknown_rarity() {
        let err = toml::from_str::<CollectionFile>(
            r#"
            [[cards]]
            name = "Goblin"
            rarity = "Mythic"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Mythic"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CollectionFile::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, CollectionFileError::Io(_)));
    }
}
