use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::domain::{card::Rarity, deck::DeckType};

#[derive(Parser)]
#[command(name = "cardpro", version, about = "Manage a trading-card collection and its decks")]
pub struct Args {
    /// SQLite file to use instead of the per-user default
    #[arg(long, global = true, env = "CARDPRO_DATABASE")]
    pub database: Option<PathBuf>,

    /// Log filter, e.g. "cardpro=debug"
    #[arg(long, global = true, env = "CARDPRO_LOG", default_value = "cardpro=warn")]
    pub log: String,

    /// Print lists as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with cards
    #[command(subcommand)]
    Card(CardCommands),
    /// Work with decks
    #[command(subcommand)]
    Deck(DeckCommands),
    #[command(about = "Import a collection file")]
    Import {
        path: PathBuf,
        /// Drop existing cards and decks first
        #[arg(long)]
        replace: bool,
    },
    #[command(about = "Export the collection to a file")]
    Export { path: PathBuf },
    #[command(about = "Fill an empty database with sample cards and decks")]
    Seed,
    #[command(about = "Browse and edit with menus (default)")]
    Interactive,
}

#[derive(Subcommand)]
pub enum CardCommands {
    #[command(about = "List cards")]
    List {
        /// Fold identical cards into one row with a count
        #[arg(long, conflicts_with_all = ["rarity", "cost", "with_decks"])]
        grouped: bool,
        #[arg(long)]
        rarity: Option<Rarity>,
        #[arg(long, conflicts_with = "rarity")]
        cost: Option<i64>,
        /// Show the decks each card is in
        #[arg(long, conflicts_with_all = ["rarity", "cost"])]
        with_decks: bool,
    },
    #[command(about = "Show a card and the decks it is in")]
    Show { id: i64 },
    #[command(about = "Add a card")]
    Add(NewCardArgs),
    #[command(about = "Change fields of a card")]
    Edit {
        id: i64,
        #[command(flatten)]
        fields: CardFieldArgs,
    },
    #[command(about = "Delete a card")]
    Delete { id: i64 },
}

#[derive(ClapArgs)]
pub struct NewCardArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = 0)]
    pub cost: i64,
    #[arg(long, default_value_t = 0)]
    pub attack: i64,
    #[arg(long, default_value_t = 0)]
    pub defense: i64,
    #[arg(long, default_value = "Common")]
    pub rarity: Rarity,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub memo: String,
}

#[derive(ClapArgs)]
pub struct CardFieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub cost: Option<i64>,
    #[arg(long)]
    pub attack: Option<i64>,
    #[arg(long)]
    pub defense: Option<i64>,
    #[arg(long)]
    pub rarity: Option<Rarity>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Subcommand)]
pub enum DeckCommands {
    #[command(about = "List decks")]
    List {
        #[arg(long = "type")]
        deck_type: Option<DeckType>,
    },
    #[command(about = "Show the cards in a deck")]
    Show {
        id: i64,
        /// List every placement row instead of grouping by card
        #[arg(long)]
        placements: bool,
    },
    #[command(about = "Add a deck")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "type", default_value = "Balanced")]
        deck_type: DeckType,
    },
    #[command(about = "Change fields of a deck")]
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        deck_type: Option<DeckType>,
    },
    #[command(about = "Delete a deck")]
    Delete { id: i64 },
    #[command(about = "Put copies of a card into a deck, one per location")]
    AddCard {
        deck: i64,
        card: i64,
        #[arg(short, long = "location", default_value = "")]
        locations: Vec<String>,
    },
    #[command(about = "Take a card out of a deck")]
    RemoveCard {
        deck: i64,
        card: i64,
        /// Only copies stored at this location
        #[arg(long, conflicts_with = "one")]
        location: Option<String>,
        /// Only the most recently added copy
        #[arg(long)]
        one: bool,
    },
}
