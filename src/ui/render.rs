use std::fmt::Write;

use comfy_table::Table;

use crate::domain::{
    card::Card,
    deck::Deck,
    deck_contents::{CardWithDecks, DeckContents},
    grouped_card::GroupedCard,
    placement::Placement,
};

const CARD_HEADER: [&str; 8] = [
    "ID", "Name", "Cost", "Attack", "Defense", "Rarity", "Location", "Memo",
];

fn card_row(card: &Card) -> Vec<String> {
    vec![
        card.id.to_string(),
        card.name.clone(),
        card.cost.to_string(),
        card.attack.to_string(),
        card.defense.to_string(),
        card.rarity.to_string(),
        card.location.clone(),
        card.memo.clone(),
    ]
}

/// One-line label, used where a single row is picked from a list.
pub fn card_line(card: &Card) -> String {
    let mut line = format!(
        "#{} {} (cost {}, atk {}, def {}, {})",
        card.id, card.name, card.cost, card.attack, card.defense, card.rarity
    );
    if !card.location.trim().is_empty() {
        let _ = write!(line, " @ {}", card.location);
    }
    if !card.memo.trim().is_empty() {
        let _ = write!(line, " [{}]", card.memo);
    }
    line
}

pub fn card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards.\n".to_string();
    }
    let mut table = Table::new();
    table.set_header(CARD_HEADER.to_vec());
    for card in cards {
        table.add_row(card_row(card));
    }
    format!("{table}\n")
}

pub fn grouped_list(groups: &[GroupedCard]) -> String {
    if groups.is_empty() {
        return "No cards.\n".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec![
        "Count", "Name", "Cost", "Attack", "Defense", "Rarity", "Location", "Memo",
    ]);
    for group in groups {
        table.add_row(vec![
            group.count.to_string(),
            group.name.clone(),
            group.cost.to_string(),
            group.attack.to_string(),
            group.defense.to_string(),
            group.rarity.to_string(),
            group.location.clone(),
            group.memo.clone(),
        ]);
    }
    format!("{table}\n")
}

pub fn card_detail(card: &CardWithDecks) -> String {
    let mut out = card_line(&card.card);
    out.push('\n');
    if card.decks.is_empty() {
        out.push_str("Not in any deck.\n");
    } else {
        out.push_str("In decks:\n");
        out.push_str(&deck_list(&card.decks));
    }
    out
}

pub fn cards_with_decks(cards: &[CardWithDecks]) -> String {
    if cards.is_empty() {
        return "No cards.\n".to_string();
    }
    let mut table = Table::new();
    let mut header = CARD_HEADER.to_vec();
    header.push("Decks");
    table.set_header(header);
    for entry in cards {
        let decks: Vec<&str> = entry.decks.iter().map(|d| d.name.as_str()).collect();
        let mut row = card_row(&entry.card);
        row.push(decks.join(", "));
        table.add_row(row);
    }
    format!("{table}\n")
}

pub fn deck_line(deck: &Deck) -> String {
    let mut line = format!("#{} {} ({})", deck.id, deck.name, deck.deck_type);
    if !deck.description.trim().is_empty() {
        let _ = write!(line, " - {}", deck.description);
    }
    line
}

pub fn deck_list(decks: &[Deck]) -> String {
    if decks.is_empty() {
        return "No decks.\n".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Description"]);
    for deck in decks {
        table.add_row(vec![
            deck.id.to_string(),
            deck.name.clone(),
            deck.deck_type.to_string(),
            deck.description.clone(),
        ]);
    }
    format!("{table}\n")
}

pub fn deck_detail(contents: &DeckContents) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", deck_line(&contents.deck));
    let _ = writeln!(
        out,
        "{} cards, {} distinct",
        contents.card_count(),
        contents.card_type_count()
    );
    if contents.cards.is_empty() {
        out.push_str("This deck has no cards yet.\n");
        return out;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Copies", "ID", "Name", "Cost", "Attack", "Defense", "Rarity", "Placed at",
    ]);
    for (card, locations) in &contents.cards {
        table.add_row(vec![
            locations.len().to_string(),
            card.id.to_string(),
            card.name.clone(),
            card.cost.to_string(),
            card.attack.to_string(),
            card.defense.to_string(),
            card.rarity.to_string(),
            locations.join("\n"),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

pub fn placements(placements: &[Placement]) -> String {
    if placements.is_empty() {
        return "No placements.\n".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Card", "Location"]);
    for placement in placements {
        table.add_row(vec![
            placement.id.to_string(),
            placement.card_id.to_string(),
            placement.location.clone(),
        ]);
    }
    format!("{table}\n")
}
