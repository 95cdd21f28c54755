//! # tarot-tactics
//!
//! The Challenge Resolution Engine for a card-driven tactical tabletop RPG:
//! combatants draw tarot cards for turn order and action outcomes, fight
//! across spatial zones, and accumulate conditions.
//!
//! ## Design Principles
//!
//! 1. **Explicit state machine**: the [`ChallengeController`] owns phase
//!    progression and suspends at two well-defined points (`VisualSync`,
//!    `MinorWindow`) until the caller acknowledges or resumes.
//!
//! 2. **Soft resolution, hard state**: the [`ActionResolver`] never errors —
//!    a bad input is an [`ActionResult`] with `success = false` — while
//!    controller operations return `Result<_, ChallengeError>` reason codes.
//!
//! 3. **Injected collaborators**: the event bus, card deck, and Test-of-Fate
//!    hook are constructor-injected, never process-wide defaults.
//!
//! ## Modules
//!
//! - `core`: cards, combatants, roster, errors, RNG
//! - `cards`: the draw/discard/reshuffle card economy
//! - `zones`: battlefield zones and pairwise engagement
//! - `events`: the challenge notification bus
//! - `resolve`: the Action Resolver and its five category handlers
//! - `challenge`: the Challenge Controller state machine
//! - `npc`: the NPC-facing decision surface

pub mod cards;
pub mod challenge;
pub mod core;
pub mod events;
pub mod npc;
pub mod resolve;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Attributes, Card, ChallengeError, Combatant, CombatantId, Condition, DeckRng, DeckRngState,
    DefenseKind, Disposition, Doom, Equipment, PreparedDefense, Roster, Suit, Weapon,
    WeaponCategory, COUNT_MAX,
};

pub use crate::cards::{CardSource, TarotDeck};

pub use crate::zones::{EngagementRegistry, ZoneId, ZoneMap};

pub use crate::events::{ChallengeEvent, EventBus, EventLog};

pub use crate::resolve::{
    ActionCategory, ActionKind, ActionRequest, ActionResolver, ActionResult, EffectTag, FateHook,
    FollowUp, Opposition, ResolverContext, RoundBank, VigilanceTrigger, AID_BONUS, MAX_NESTING,
    UNDIRECTED_DIFFICULTY,
};

pub use crate::challenge::{
    ChallengeController, ChallengeOutcome, ChallengePhase, ChallengeType, InitiativeSlot,
    InitiativeTracker, MinorDeclaration, MinorQueue, BASELINE_DIFFICULTY,
};

pub use crate::npc::{doom_permits, NpcDecider, ScriptedDecider};
