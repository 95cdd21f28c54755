//! Core types: cards, combatants, the roster, errors, and RNG.
//!
//! Everything here is a plain value type; the state machines live in
//! `challenge` and `resolve`.

pub mod card;
pub mod combatant;
pub mod error;
pub mod rng;
pub mod roster;

pub use card::{Card, Doom, Suit, COUNT_MAX};
pub use combatant::{
    Attributes, Combatant, CombatantId, Condition, DefenseKind, Disposition, Equipment,
    PreparedDefense, Weapon, WeaponCategory,
};
pub use error::ChallengeError;
pub use rng::{DeckRng, DeckRngState};
pub use roster::Roster;
