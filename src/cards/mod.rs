//! Card supply collaborator.

mod deck;

pub use deck::{CardSource, TarotDeck};
