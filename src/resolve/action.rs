//! Action vocabulary: kinds, requests, and results.
//!
//! Every declared action is an [`ActionKind`] plus an ephemeral
//! [`ActionRequest`] value object. The kind carries the rules metadata —
//! category, governing suit, opposition, prerequisites — so the resolver
//! dispatches on data instead of long special-case chains.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, CombatantId, Condition, DefenseKind, Suit};
use crate::zones::ZoneId;

/// The five resolution categories, one handler each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    Swords,
    Pentacles,
    Cups,
    Wands,
    Misc,
}

impl ActionCategory {
    /// The governing suit, if the category has one.
    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        match self {
            ActionCategory::Swords => Some(Suit::Swords),
            ActionCategory::Pentacles => Some(Suit::Pentacles),
            ActionCategory::Cups => Some(Suit::Cups),
            ActionCategory::Wands => Some(Suit::Wands),
            ActionCategory::Misc => None,
        }
    }
}

/// What an action's test value is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opposition {
    /// Fixed baseline difficulty (10).
    Undirected,
    /// The target's revealed-or-computed current initiative value.
    Initiative,
    /// The target's live morale; the harder social variant adds one.
    Morale { hard: bool },
    /// No test: succeeds once prerequisites hold.
    Auto,
}

/// Prerequisites checked before any test is rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequirements {
    pub melee_weapon: bool,
    pub ranged_weapon: bool,
    pub shield: bool,
    pub companion: bool,
    pub consumable: bool,
}

/// Every action type a combatant can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    // === Swords ===
    MeleeAttack,
    MissileAttack,

    // === Pentacles ===
    Trip,
    Disarm,
    Displace,
    Grapple,
    /// Clean disengage: success negates the parting blow.
    Avoid,
    /// Fast reposition; suffers the parting blow if engaged.
    Dash,

    // === Cups ===
    PrepareDodge,
    PrepareRiposte,
    Heal,
    Command,
    AidAnother,
    PullItem,
    UseItem,

    // === Wands ===
    Banter,
    /// The harder social variant (+1 difficulty).
    Parley,
    Spellcast,
    Recover,

    // === Misc ===
    Move,
    Guard,
    Vigilance,
    Reload,
    Signal,
    Wait,
}

impl ActionKind {
    /// Resolution category.
    #[must_use]
    pub const fn category(self) -> ActionCategory {
        match self {
            ActionKind::MeleeAttack | ActionKind::MissileAttack => ActionCategory::Swords,
            ActionKind::Trip
            | ActionKind::Disarm
            | ActionKind::Displace
            | ActionKind::Grapple
            | ActionKind::Avoid
            | ActionKind::Dash => ActionCategory::Pentacles,
            ActionKind::PrepareDodge
            | ActionKind::PrepareRiposte
            | ActionKind::Heal
            | ActionKind::Command
            | ActionKind::AidAnother
            | ActionKind::PullItem
            | ActionKind::UseItem => ActionCategory::Cups,
            ActionKind::Banter
            | ActionKind::Parley
            | ActionKind::Spellcast
            | ActionKind::Recover => ActionCategory::Wands,
            ActionKind::Move
            | ActionKind::Guard
            | ActionKind::Vigilance
            | ActionKind::Reload
            | ActionKind::Signal
            | ActionKind::Wait => ActionCategory::Misc,
        }
    }

    /// The suit that governs this action's attribute modifier.
    #[must_use]
    pub const fn governing_suit(self) -> Option<Suit> {
        self.category().suit()
    }

    /// Suit a card must carry to declare this as a minor action.
    #[must_use]
    pub const fn required_minor_suit(self) -> Option<Suit> {
        self.governing_suit()
    }

    /// What the test value is compared against.
    #[must_use]
    pub const fn opposition(self) -> Opposition {
        match self {
            ActionKind::MeleeAttack
            | ActionKind::MissileAttack
            | ActionKind::Trip
            | ActionKind::Disarm
            | ActionKind::Displace
            | ActionKind::Grapple
            | ActionKind::Avoid
            | ActionKind::Dash
            | ActionKind::Spellcast
            | ActionKind::Command
            | ActionKind::UseItem => Opposition::Initiative,
            ActionKind::Banter => Opposition::Morale { hard: false },
            ActionKind::Parley => Opposition::Morale { hard: true },
            ActionKind::Heal
            | ActionKind::AidAnother
            | ActionKind::PullItem
            | ActionKind::Recover => Opposition::Undirected,
            // Arming a defense is not a test; it only fails when a
            // defense is already armed.
            ActionKind::PrepareDodge
            | ActionKind::PrepareRiposte
            | ActionKind::Move
            | ActionKind::Guard
            | ActionKind::Vigilance
            | ActionKind::Reload
            | ActionKind::Signal
            | ActionKind::Wait => Opposition::Auto,
        }
    }

    /// Defense-only actions take no attribute modifier.
    #[must_use]
    pub const fn is_defense_only(self) -> bool {
        matches!(self, ActionKind::PrepareDodge | ActionKind::PrepareRiposte)
    }

    /// Kinds handed to the external Test-of-Fate collaborator while a
    /// challenge is active. Spellwork is the only such working.
    #[must_use]
    pub const fn is_fate_bound(self) -> bool {
        matches!(self, ActionKind::Spellcast)
    }

    /// A ranged action cannot be performed while engaged.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, ActionKind::MissileAttack)
    }

    /// Whether this kind may appear in the minor-action window.
    ///
    /// Miscellaneous-category actions never can.
    #[must_use]
    pub const fn minor_eligible(self) -> bool {
        !matches!(self.category(), ActionCategory::Misc)
    }

    /// Prerequisites on the actor's equipment and companions.
    #[must_use]
    pub const fn requirements(self) -> ActionRequirements {
        let mut req = ActionRequirements {
            melee_weapon: false,
            ranged_weapon: false,
            shield: false,
            companion: false,
            consumable: false,
        };
        match self {
            ActionKind::MissileAttack => req.ranged_weapon = true,
            ActionKind::Guard => req.shield = true,
            ActionKind::Command => req.companion = true,
            ActionKind::Heal | ActionKind::UseItem => req.consumable = true,
            _ => {}
        }
        req
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Condition a vigilance follow-up waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VigilanceTrigger {
    /// An enemy enters the watcher's zone.
    EnemyEntersZone,
    /// An enemy leaves the watcher's zone.
    EnemyLeavesZone,
}

/// A bundled follow-up action (Fool interrupts, vigilance).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub kind: ActionKind,
    pub card: Card,
    pub target: Option<CombatantId>,
    pub destination: Option<ZoneId>,
}

/// An ephemeral action declaration. Not persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub actor: CombatantId,
    pub kind: ActionKind,
    /// `None` models a declaration that never supplied a card; the
    /// resolver fails soft on it.
    pub card: Option<Card>,
    pub target: Option<CombatantId>,
    pub destination: Option<ZoneId>,
    pub follow_up: Option<Box<FollowUp>>,
    /// Minor actions take no attribute modifier.
    pub minor: bool,
    /// Trigger condition for `Vigilance` declarations.
    pub vigilance_trigger: Option<VigilanceTrigger>,
}

impl ActionRequest {
    /// Create a request.
    #[must_use]
    pub fn new(actor: CombatantId, kind: ActionKind, card: Card) -> Self {
        Self {
            actor,
            kind,
            card: Some(card),
            target: None,
            destination: None,
            follow_up: None,
            minor: false,
            vigilance_trigger: None,
        }
    }

    /// Set the target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the destination zone (builder pattern).
    #[must_use]
    pub fn with_destination(mut self, destination: ZoneId) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Bundle a follow-up action (builder pattern).
    #[must_use]
    pub fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(Box::new(follow_up));
        self
    }

    /// Mark as a minor action (builder pattern).
    #[must_use]
    pub fn as_minor(mut self) -> Self {
        self.minor = true;
        self
    }

    /// Set the vigilance trigger (builder pattern).
    #[must_use]
    pub fn with_vigilance_trigger(mut self, trigger: VigilanceTrigger) -> Self {
        self.vigilance_trigger = Some(trigger);
        self
    }
}

/// Mechanical side effects of a resolved action, in application order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectTag {
    WoundInflicted,
    /// Blade bonus wound on a Great Success.
    ExtraWound,
    ArmorPierce,
    ConditionSet(Condition),
    ConditionCleared(Condition),
    ItemDropped,
    ItemUsed,
    Healed,
    MovedTo(ZoneId),
    EngagementFormed,
    EngagementBroken,
    PartingBlowTaken,
    MoraleDamage(i32),
    DispositionShift { warmer: bool },
    DefensePrepared(DefenseKind),
    DodgeConsumed,
    RiposteTriggered,
    AidBanked,
    AidSpent,
    VigilanceArmed,
    VigilanceTriggered,
    AmmoSpent,
    Reloaded,
    Cleave,
    /// Mob-rule advantage from at least one ally in the target's zone.
    Favor,
    InitiativeOverwritten,
    Commanded,
    FatePending,
    FoolPlayed,
    AwaitingFollowUp,
}

/// The computed outcome of one resolved action.
///
/// Produced once per action; consumed by the controller and the bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub is_great: bool,
    pub damage_dealt: u8,
    pub effects: SmallVec<[EffectTag; 4]>,
    pub description: String,
    pub test_value: i32,
    pub difficulty: i32,
}

impl ActionResult {
    /// A contested outcome.
    #[must_use]
    pub fn contested(success: bool, test_value: i32, difficulty: i32) -> Self {
        Self {
            success,
            is_great: false,
            damage_dealt: 0,
            effects: SmallVec::new(),
            description: String::new(),
            test_value,
            difficulty,
        }
    }

    /// A soft failure with no test: invalid input, unmet prerequisite.
    #[must_use]
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            success: false,
            is_great: false,
            damage_dealt: 0,
            effects: SmallVec::new(),
            description: description.into(),
            test_value: 0,
            difficulty: 0,
        }
    }

    /// An untested success (auto-success actions).
    #[must_use]
    pub fn auto(description: impl Into<String>) -> Self {
        Self {
            success: true,
            is_great: false,
            damage_dealt: 0,
            effects: SmallVec::new(),
            description: description.into(),
            test_value: 0,
            difficulty: 0,
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append an effect tag (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectTag) -> Self {
        self.effects.push(effect);
        self
    }

    /// Record dealt damage (builder pattern).
    #[must_use]
    pub fn with_damage(mut self, damage: u8) -> Self {
        self.damage_dealt = damage;
        self
    }

    /// Mark as a Great Success (builder pattern).
    #[must_use]
    pub fn great(mut self) -> Self {
        self.is_great = true;
        self
    }

    /// Check whether a given effect tag is present.
    #[must_use]
    pub fn has_effect(&self, effect: &EffectTag) -> bool {
        self.effects.contains(effect)
    }
}
