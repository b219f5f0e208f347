//! Card and deck loaders
//!
//! Parsers for card definition files (.txt) and deck lists (.dck)

pub mod card;
pub mod database;
pub mod deck;
pub mod game_init;

pub use card::{CardDefinition, CardLoader};
pub use database::CardDatabase;
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use game_init::GameInitializer;
