//! The card economy: draw pile, discard pile, reshuffle on exhaustion.
//!
//! The deck is shared by player submissions and the NPC decision module.
//! Execution is single-threaded, so no locking, but every consumer must
//! discard a used card back or the pool shrinks irreversibly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Card, DeckRng, Suit};

/// Narrow interface the engine needs from a card supply.
pub trait CardSource {
    /// Draw the top card. Reshuffles the discard pile into the draw pile
    /// on exhaustion; returns `None` only when both piles are empty.
    fn draw(&mut self) -> Option<Card>;

    /// Return a used card to the discard pile.
    fn discard(&mut self, card: Card);

    /// Cards remaining across both piles.
    fn remaining(&self) -> usize;
}

/// The standard 78-card tarot deck.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TarotDeck {
    /// Top of the draw pile is the end of the vec.
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    #[serde(skip, default = "default_rng")]
    rng: DeckRng,
}

fn default_rng() -> DeckRng {
    DeckRng::new(0)
}

impl TarotDeck {
    /// Build and shuffle a full 78-card deck.
    #[must_use]
    pub fn shuffled(seed: u64) -> Self {
        let mut rng = DeckRng::new(seed);
        let mut draw_pile = Self::full_registry();
        rng.shuffle(&mut draw_pile);
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            rng,
        }
    }

    /// A deck with a fixed draw order, top card last. Test convenience.
    #[must_use]
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
            rng: DeckRng::new(0),
        }
    }

    /// All 78 cards: four minor suits of 14, majors 0-21.
    fn full_registry() -> Vec<Card> {
        let mut cards = Vec::with_capacity(78);
        for suit in Suit::MINOR {
            for value in 1..=14 {
                cards.push(Card::minor(suit, value));
            }
        }
        for value in 0..=21 {
            cards.push(Card::major(value));
        }
        cards
    }

    /// Cards in the draw pile only.
    #[must_use]
    pub fn draw_pile_size(&self) -> usize {
        self.draw_pile.len()
    }

    /// Cards in the discard pile only.
    #[must_use]
    pub fn discard_pile_size(&self) -> usize {
        self.discard_pile.len()
    }

    fn reshuffle(&mut self) {
        debug!(discards = self.discard_pile.len(), "reshuffling deck");
        self.draw_pile.append(&mut self.discard_pile);
        self.rng.shuffle(&mut self.draw_pile);
    }
}

impl CardSource for TarotDeck {
    fn draw(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            self.reshuffle();
        }
        self.draw_pile.pop()
    }

    fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    fn remaining(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }
}
