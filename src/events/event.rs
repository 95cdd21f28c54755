//! Challenge notification vocabulary.
//!
//! Unlike a configurable trigger system, the engine's events are a closed
//! enum: the set of things a challenge can announce is fixed by the rules.
//! Subscribers receive events synchronously, in emission order.

use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeOutcome;
use crate::core::{Card, CombatantId};
use crate::resolve::{ActionRequest, ActionResult};
use crate::zones::ZoneId;

/// An event published on the challenge bus.
///
/// The one signal the engine *consumes* rather than emits is the visual
/// acknowledgement, which arrives as a call to
/// `ChallengeController::on_visual_complete`, not as an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChallengeEvent {
    /// A challenge began.
    ChallengeStart {
        pcs: Vec<CombatantId>,
        npcs: Vec<CombatantId>,
        zones: Vec<ZoneId>,
    },
    /// A new round's initiative phase opened.
    InitiativePhaseStart {
        round: u32,
        combatants: Vec<CombatantId>,
    },
    /// A combatant submitted initiative. The card stays face-down, so the
    /// payload deliberately withholds it.
    InitiativeSubmitted { entity: CombatantId },
    /// The count-up clock ticked.
    CountUpTick { count: u8, round: u32 },
    /// A combatant's turn began.
    ChallengeTurnStart {
        count: u8,
        round: u32,
        entity: CombatantId,
        is_pc: bool,
        initiative_card: Card,
    },
    /// An action was submitted for resolution.
    ChallengeAction { action: ActionRequest },
    /// An action resolved.
    ChallengeResolution {
        action: ActionRequest,
        result: ActionResult,
    },
    /// A combatant's turn ended.
    ChallengeTurnEnd {
        count: u8,
        round: u32,
        entity: CombatantId,
    },
    /// The minor-action window opened; progression is paused until resume.
    MinorActionWindow {
        count: u8,
        round: u32,
        paused: bool,
    },
    /// A face-down initiative slot was turned face-up.
    InitiativeRevealed { entity: CombatantId },
    /// The Fool was played as an interrupt. With no bundled follow-up the
    /// challenge stays paused for a decision.
    FoolInterrupt {
        entity: CombatantId,
        awaiting_follow_up: bool,
    },
    /// Free damage on leaving an engaged zone.
    PartingBlow {
        attacker: CombatantId,
        victim: CombatantId,
    },
    /// A combatant took wounds.
    WoundTaken {
        entity: CombatantId,
        wounds: u8,
        source: Option<CombatantId>,
    },
    /// A combatant was defeated.
    EntityDefeated { entity: CombatantId },
    /// The challenge ended.
    ChallengeEnd {
        outcome: ChallengeOutcome,
        rounds: u32,
    },
}

impl ChallengeEvent {
    /// Stable name for logging and subscriber filtering.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ChallengeEvent::ChallengeStart { .. } => "ChallengeStart",
            ChallengeEvent::InitiativePhaseStart { .. } => "InitiativePhaseStart",
            ChallengeEvent::InitiativeSubmitted { .. } => "InitiativeSubmitted",
            ChallengeEvent::CountUpTick { .. } => "CountUpTick",
            ChallengeEvent::ChallengeTurnStart { .. } => "ChallengeTurnStart",
            ChallengeEvent::ChallengeAction { .. } => "ChallengeAction",
            ChallengeEvent::ChallengeResolution { .. } => "ChallengeResolution",
            ChallengeEvent::ChallengeTurnEnd { .. } => "ChallengeTurnEnd",
            ChallengeEvent::MinorActionWindow { .. } => "MinorActionWindow",
            ChallengeEvent::InitiativeRevealed { .. } => "InitiativeRevealed",
            ChallengeEvent::FoolInterrupt { .. } => "FoolInterrupt",
            ChallengeEvent::PartingBlow { .. } => "PartingBlow",
            ChallengeEvent::WoundTaken { .. } => "WoundTaken",
            ChallengeEvent::EntityDefeated { .. } => "EntityDefeated",
            ChallengeEvent::ChallengeEnd { .. } => "ChallengeEnd",
        }
    }
}
