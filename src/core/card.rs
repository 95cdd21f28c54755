//! Tarot cards: suits, values, and Doom classification.
//!
//! Every card in play is a copy of an entry in the static tarot registry;
//! cards are immutable once drawn and are passed around by value.
//!
//! ## Value ranges
//!
//! - Major arcana: 0 (the Fool, the zero-value wildcard) through 21
//! - Minor arcana: 1-10 numbered, 11-14 face-equivalent
//!
//! ## Usage
//!
//! ```
//! use tarot_tactics::core::{Card, Suit};
//!
//! let seven = Card::minor(Suit::Swords, 7);
//! assert!(!seven.is_face());
//!
//! let fool = Card::fool();
//! assert!(fool.is_fool());
//! assert!(fool.doom().is_none());
//! ```

use serde::{Deserialize, Serialize};

/// The highest count-up value; initiative derived from a card never
/// exceeds this.
pub const COUNT_MAX: u8 = 14;

/// Card suit: four minor arcana plus the major arcana.
///
/// Each minor suit governs one attribute and one action category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Combat: attacks with weapons.
    Swords,
    /// Agility: contests of position and leverage.
    Pentacles,
    /// Support: defense preparation, healing, aid.
    Cups,
    /// Magic and social: banter, spellcasting, recovery.
    Wands,
    /// Major arcana: doom and initiative-granting cards.
    Major,
}

impl Suit {
    /// The four minor suits, in registry order.
    pub const MINOR: [Suit; 4] = [Suit::Swords, Suit::Pentacles, Suit::Cups, Suit::Wands];

    /// Check whether this is one of the four minor suits.
    #[must_use]
    pub const fn is_minor(self) -> bool {
        !matches!(self, Suit::Major)
    }

    /// Index into attribute arrays for minor suits.
    ///
    /// Returns `None` for the major arcana, which has no attribute.
    #[must_use]
    pub const fn attribute_index(self) -> Option<usize> {
        match self {
            Suit::Swords => Some(0),
            Suit::Pentacles => Some(1),
            Suit::Cups => Some(2),
            Suit::Wands => Some(3),
            Suit::Major => None,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Swords => "Swords",
            Suit::Pentacles => "Pentacles",
            Suit::Cups => "Cups",
            Suit::Wands => "Wands",
            Suit::Major => "Major",
        };
        write!(f, "{name}")
    }
}

/// Doom classification of major-arcana cards.
///
/// The NPC decision layer gates access to powerful effects on this;
/// the engine itself only classifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Doom {
    /// Values 1-14.
    Lesser,
    /// Values 15-21.
    Greater,
}

/// A drawn card: suit plus numeric value.
///
/// Immutable once drawn. Copied, never referenced, from the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub value: u8,
}

impl Card {
    /// Create a minor-arcana card.
    ///
    /// Panics if `value` is outside 1-14 or `suit` is the major arcana.
    #[must_use]
    pub fn minor(suit: Suit, value: u8) -> Self {
        assert!(suit.is_minor(), "minor card cannot have the Major suit");
        assert!((1..=14).contains(&value), "minor card value must be 1-14");
        Self { suit, value }
    }

    /// Create a major-arcana card.
    ///
    /// Panics if `value` is outside 0-21.
    #[must_use]
    pub fn major(value: u8) -> Self {
        assert!(value <= 21, "major card value must be 0-21");
        Self {
            suit: Suit::Major,
            value,
        }
    }

    /// The Fool: the zero-value wildcard major card.
    #[must_use]
    pub const fn fool() -> Self {
        Self {
            suit: Suit::Major,
            value: 0,
        }
    }

    /// Check whether this is the Fool.
    #[must_use]
    pub const fn is_fool(self) -> bool {
        matches!(self.suit, Suit::Major) && self.value == 0
    }

    /// Check whether this is a major-arcana card.
    #[must_use]
    pub const fn is_major(self) -> bool {
        matches!(self.suit, Suit::Major)
    }

    /// Check whether this is a face-equivalent minor card (value 11-14).
    ///
    /// Face cards are one of the two requirements for a Great Success.
    #[must_use]
    pub const fn is_face(self) -> bool {
        self.suit.is_minor() && self.value >= 11 && self.value <= 14
    }

    /// Initiative value when this card is submitted for the count-up.
    ///
    /// Capped at [`COUNT_MAX`] so high majors still act on the final count.
    #[must_use]
    pub fn initiative_value(self) -> u8 {
        self.value.min(COUNT_MAX)
    }

    /// Doom classification, for major-arcana cards other than the Fool.
    #[must_use]
    pub fn doom(self) -> Option<Doom> {
        if !self.is_major() || self.is_fool() {
            return None;
        }
        if self.value <= 14 {
            Some(Doom::Lesser)
        } else {
            Some(Doom::Greater)
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fool() {
            write!(f, "The Fool")
        } else {
            write!(f, "{} of {}", self.value, self.suit)
        }
    }
}
