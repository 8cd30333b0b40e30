use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    DeckList,
    CardList,
    DeckDetail(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown route \"{0}\"")]
pub struct UnknownRoute(pub String);

impl Screen {
    pub const START: Screen = Screen::Menu;

    pub fn route(&self) -> String {
        match self {
            Screen::Menu => "menu".to_string(),
            Screen::DeckList => "deck_list".to_string(),
            Screen::CardList => "card_list".to_string(),
            Screen::DeckDetail(id) => format!("deck_detail/{id}"),
        }
    }

    /// Where "back" leads from this screen.
    pub fn parent(&self) -> Option<Screen> {
        match self {
            Screen::Menu => None,
            Screen::DeckList | Screen::CardList => Some(Screen::Menu),
            Screen::DeckDetail(_) => Some(Screen::DeckList),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Menu => "Menu",
            Screen::DeckList => "Decks",
            Screen::CardList => "Cards",
            Screen::DeckDetail(_) => "Deck",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}

impl FromStr for Screen {
    type Err = UnknownRoute;

    fn from_str(route: &str) -> Result<Self, Self::Err> {
        match route {
            "menu" => Ok(Screen::Menu),
            "deck_list" => Ok(Screen::DeckList),
            "card_list" => Ok(Screen::CardList),
            _ => route
                .strip_prefix("deck_detail/")
                .and_then(|id| id.parse().ok())
                .map(Screen::DeckDetail)
                .ok_or_else(|| UnknownRoute(route.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_parse_back() {
        for screen in [
            Screen::Menu,
            Screen::DeckList,
            Screen::CardList,
            Screen::DeckDetail(12),
        ] {
            assert_eq!(screen.route().parse::<Screen>(), Ok(screen));
        }
    }

    #[test]
    fn rejects_bad_routes() {
        assert!("deck_detail/abc".parse::<Screen>().is_err());
        assert!("settings".parse::<Screen>().is_err());
    }

    #[test]
    fn back_stack_ends_at_menu() {
        assert_eq!(Screen::DeckDetail(1).parent(), Some(Screen::DeckList));
        assert_eq!(Screen::CardList.parent(), Some(Screen::START));
        assert_eq!(Screen::Menu.parent(), None);
    }
}
