use serde::Serialize;

use crate::{
    args::{CardCommands, CardFieldArgs, Commands, DeckCommands, NewCardArgs},
    domain::{
        card::{Card, NewCard},
        deck::NewDeck,
    },
    service::service::Service,
    ui::{interactive, render},
};

pub async fn run(service: &Service, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Card(command) => card(service, command, json).await?,
        Commands::Deck(command) => deck(service, command, json).await?,
        Commands::Import { path, replace } => {
            let summary = service.import_collection(&path, replace).await?;
            println!(
                "Imported {} cards, {} decks, {} placements from {}",
                summary.cards,
                summary.decks,
                summary.placements,
                path.display()
            );
        }
        Commands::Export { path } => {
            service.export_collection(&path).await?;
            println!("Exported collection to {}", path.display());
        }
        Commands::Seed => {
            if service.seed_sample_data().await? {
                println!("Added sample cards and decks");
            } else {
                println!("Database is not empty, nothing added");
            }
        }
        Commands::Interactive => interactive::run(service).await?,
    };
    Ok(())
}

fn output<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

async fn card(service: &Service, command: CardCommands, json: bool) -> anyhow::Result<()> {
    match command {
        CardCommands::List { grouped: true, .. } => {
            let groups = service.list_cards_grouped().await?;
            output(json, &groups[..], render::grouped_list)?;
        }
        CardCommands::List { with_decks: true, .. } => {
            let cards = service.list_cards_with_decks().await?;
            output(json, &cards[..], render::cards_with_decks)?;
        }
        CardCommands::List { rarity, cost, .. } => {
            let cards = match (rarity, cost) {
                (Some(rarity), _) => service.cards_by_rarity(rarity).await?,
                (None, Some(cost)) => service.cards_by_cost(cost).await?,
                (None, None) => service.list_cards().await?,
            };
            output(json, &cards[..], render::card_list)?;
        }
        CardCommands::Show { id } => {
            let card = service.card_with_decks(id).await?;
            output(json, &card, render::card_detail)?;
        }
        CardCommands::Add(args) => {
            let card = service.add_card(new_card(args)).await?;
            output(json, &card, |c| render::card_line(c) + "\n")?;
        }
        CardCommands::Edit { id, fields } => {
            let card = apply_fields(service.get_card(id).await?, fields);
            let card = service.update_card(card).await?;
            output(json, &card, |c| render::card_line(c) + "\n")?;
        }
        CardCommands::Delete { id } => {
            service.delete_card(id).await?;
            println!("Deleted card #{id}");
        }
    }
    Ok(())
}

async fn deck(service: &Service, command: DeckCommands, json: bool) -> anyhow::Result<()> {
    match command {
        DeckCommands::List { deck_type } => {
            let decks = match deck_type {
                Some(deck_type) => service.decks_by_type(deck_type).await?,
                None => service.list_decks().await?,
            };
            output(json, &decks[..], render::deck_list)?;
        }
        DeckCommands::Show {
            id,
            placements: true,
        } => {
            let placements = service.deck_placements(id).await?;
            output(json, &placements[..], render::placements)?;
        }
        DeckCommands::Show { id, .. } => {
            let contents = service.deck_contents(id).await?;
            output(json, &contents, render::deck_detail)?;
        }
        DeckCommands::Add {
            name,
            description,
            deck_type,
        } => {
            let deck = service
                .add_deck(NewDeck::new(name, description, deck_type))
                .await?;
            output(json, &deck, |d| render::deck_line(d) + "\n")?;
        }
        DeckCommands::Edit {
            id,
            name,
            description,
            deck_type,
        } => {
            let mut deck = service.get_deck(id).await?;
            if let Some(name) = name {
                deck.name = name;
            }
            if let Some(description) = description {
                deck.description = description;
            }
            if let Some(deck_type) = deck_type {
                deck.deck_type = deck_type;
            }
            let deck = service.update_deck(deck).await?;
            output(json, &deck, |d| render::deck_line(d) + "\n")?;
        }
        DeckCommands::Delete { id } => {
            service.delete_deck(id).await?;
            println!("Deleted deck #{id}");
        }
        DeckCommands::AddCard {
            deck,
            card,
            locations,
        } => {
            let placed = service.add_card_to_deck(deck, card, locations).await?;
            println!("Placed {} copies of card #{card} in deck #{deck}", placed.len());
        }
        DeckCommands::RemoveCard {
            deck,
            card,
            location,
            one,
        } => {
            let removed = match (location, one) {
                (Some(location), _) => {
                    service
                        .remove_card_location_from_deck(deck, card, &location)
                        .await?
                }
                (None, true) => service.remove_card_from_deck(deck, card).await?,
                (None, false) => service.remove_all_card_from_deck(deck, card).await?,
            };
            println!("Removed {removed} copies of card #{card} from deck #{deck}");
        }
    }
    Ok(())
}

fn new_card(args: NewCardArgs) -> NewCard {
    NewCard {
        name: args.name,
        cost: args.cost,
        attack: args.attack,
        defense: args.defense,
        rarity: args.rarity,
        location: args.location,
        memo: args.memo,
    }
}

fn apply_fields(mut card: Card, fields: CardFieldArgs) -> Card {
    if let Some(name) = fields.name {
        card.name = name;
    }
    if let Some(cost) = fields.cost {
        card.cost = cost;
    }
    if let Some(attack) = fields.attack {
        card.attack = attack;
    }
    if let Some(defense) = fields.defense {
        card.defense = defense;
    }
    if let Some(rarity) = fields.rarity {
        card.rarity = rarity;
    }
    if let Some(location) = fields.location {
        card.location = location;
    }
    if let Some(memo) = fields.memo {
        card.memo = memo;
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Rarity;

    #[test]
    fn edit_only_touches_given_fields() {
        let card = NewCard::new("Goblin", 1, 1, 1, Rarity::Common).with_id(3);
        let fields = CardFieldArgs {
            name: None,
            cost: Some(2),
            attack: None,
            defense: None,
            rarity: Some(Rarity::Uncommon),
            location: None,
            memo: Some("upgraded".to_string()),
        };
        let edited = apply_fields(card.clone(), fields);
        assert_eq!(edited.name, card.name);
        assert_eq!(edited.cost, 2);
        assert_eq!(edited.attack, 1);
        assert_eq!(edited.rarity, Rarity::Uncommon);
        assert_eq!(edited.memo, "upgraded");
    }
}
