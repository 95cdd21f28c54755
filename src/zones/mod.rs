//! Zone and engagement registry.
//!
//! Two narrow collaborators for the resolver and controller:
//!
//! - [`ZoneMap`]: which zones exist and which are adjacent
//! - [`EngagementRegistry`]: which combatant pairs are locked in melee

mod engagement;
mod map;

pub use engagement::EngagementRegistry;
pub use map::{ZoneId, ZoneMap};
