//! Combatants: identity, attributes, conditions, morale, and equipment.
//!
//! A [`Combatant`] is the engine's view of an entity taking part in a
//! challenge. Capabilities are explicit optional fields with defined
//! defaults (no inventory means an empty [`Equipment`]), resolved once at
//! construction rather than probed ad hoc during resolution.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::{Card, Suit};
use crate::zones::ZoneId;

/// Unique identifier for a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Create a new combatant ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Combatant({})", self.0)
    }
}

/// One attribute score per minor suit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub swords: i8,
    pub pentacles: i8,
    pub cups: i8,
    pub wands: i8,
}

impl Attributes {
    /// Create attribute scores in suit order.
    #[must_use]
    pub const fn new(swords: i8, pentacles: i8, cups: i8, wands: i8) -> Self {
        Self {
            swords,
            pentacles,
            cups,
            wands,
        }
    }

    /// Score for a suit. The major arcana has no attribute and scores 0.
    #[must_use]
    pub const fn for_suit(&self, suit: Suit) -> i8 {
        match suit {
            Suit::Swords => self.swords,
            Suit::Pentacles => self.pentacles,
            Suit::Cups => self.cups,
            Suit::Wands => self.wands,
            Suit::Major => 0,
        }
    }
}

/// Named boolean conditions a combatant can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Staggered,
    Rooted,
    Prone,
    Disarmed,
    Blind,
    Deaf,
}

impl Condition {
    /// Fixed priority order in which `Recover` clears conditions.
    pub const RECOVER_PRIORITY: [Condition; 5] = [
        Condition::Rooted,
        Condition::Prone,
        Condition::Blind,
        Condition::Deaf,
        Condition::Disarmed,
    ];
}

/// Disposition ladder shifted by social actions.
///
/// Each step toward `Devoted` lowers the social difficulty modifier by one;
/// each step toward `Hostile` raises it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disposition {
    Hostile,
    Wary,
    #[default]
    Neutral,
    Open,
    Devoted,
}

impl Disposition {
    /// Difficulty modifier added to morale-opposed social actions.
    #[must_use]
    pub const fn modifier(self) -> i32 {
        match self {
            Disposition::Hostile => 2,
            Disposition::Wary => 1,
            Disposition::Neutral => 0,
            Disposition::Open => -1,
            Disposition::Devoted => -2,
        }
    }

    /// One step toward `Devoted`, saturating.
    #[must_use]
    pub const fn warmer(self) -> Self {
        match self {
            Disposition::Hostile => Disposition::Wary,
            Disposition::Wary => Disposition::Neutral,
            Disposition::Neutral => Disposition::Open,
            Disposition::Open | Disposition::Devoted => Disposition::Devoted,
        }
    }

    /// One step toward `Hostile`, saturating.
    #[must_use]
    pub const fn colder(self) -> Self {
        match self {
            Disposition::Devoted => Disposition::Open,
            Disposition::Open => Disposition::Neutral,
            Disposition::Neutral => Disposition::Wary,
            Disposition::Wary | Disposition::Hostile => Disposition::Hostile,
        }
    }
}

/// Kind of prepared one-shot defensive reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseKind {
    Dodge,
    Riposte,
}

/// A prepared defense: armed before being attacked, consumed at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedDefense {
    pub kind: DefenseKind,
    /// The card that armed it; a dodge adds this value to the defender's
    /// initiative for the incoming attack.
    pub card: Card,
}

/// Weapon category, driving Great Success bonuses and edge-case rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponCategory {
    /// Extra wound on Great Success.
    Blade,
    /// Stagger on Great Success.
    Blunt,
    /// Armor-pierce on Great Success.
    Piercing,
    /// Free cleave attack on a killing blow.
    Axe,
    /// Turns a losing tie into a success.
    Flail,
    /// Ranged; consumes ammunition.
    Bow,
    /// Ranged; must be loaded, unloads after each shot.
    Crossbow,
}

impl WeaponCategory {
    /// Ranged weapons cannot be used while engaged.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, WeaponCategory::Bow | WeaponCategory::Crossbow)
    }
}

/// An equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub category: WeaponCategory,
}

impl Weapon {
    /// Create a weapon.
    pub fn new(name: impl Into<String>, category: WeaponCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Equipment and consumable state.
///
/// The default is the defined no-op: bare hands, no shield, no ammunition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Weapon>,
    /// Shield presence negates the attacker's tie advantage and is
    /// required for the guard action.
    pub shield: bool,
    pub ammo: u8,
    /// Crossbow load state; irrelevant for other weapons.
    pub loaded: bool,
    pub consumables: u8,
    /// An animal or bound companion, required by some actions.
    pub companion: bool,
}

/// A combatant taking part in a challenge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub is_pc: bool,
    pub zone: ZoneId,
    pub attributes: Attributes,
    conditions: FxHashSet<Condition>,
    /// Present for combatants that can be swayed socially.
    pub morale: Option<i32>,
    pub disposition: Disposition,
    wounds: u8,
    resilience: u8,
    pub prepared_defense: Option<PreparedDefense>,
    pub equipment: Equipment,
}

impl Combatant {
    /// Default wounds a combatant can take before defeat.
    pub const DEFAULT_RESILIENCE: u8 = 3;

    /// Create a combatant with default resilience and empty equipment.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        is_pc: bool,
        zone: ZoneId,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            is_pc,
            zone,
            attributes,
            conditions: FxHashSet::default(),
            morale: None,
            disposition: Disposition::default(),
            wounds: 0,
            resilience: Self::DEFAULT_RESILIENCE,
            prepared_defense: None,
            equipment: Equipment::default(),
        }
    }

    /// Set morale (builder pattern).
    #[must_use]
    pub fn with_morale(mut self, morale: i32) -> Self {
        self.morale = Some(morale);
        self
    }

    /// Set resilience (builder pattern).
    #[must_use]
    pub fn with_resilience(mut self, resilience: u8) -> Self {
        self.resilience = resilience;
        self
    }

    /// Equip a weapon (builder pattern).
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.equipment.weapon = Some(weapon);
        self
    }

    /// Equip a shield (builder pattern).
    #[must_use]
    pub fn with_shield(mut self) -> Self {
        self.equipment.shield = true;
        self
    }

    /// Set ammunition count (builder pattern).
    #[must_use]
    pub fn with_ammo(mut self, ammo: u8) -> Self {
        self.equipment.ammo = ammo;
        self
    }

    /// Set consumable count (builder pattern).
    #[must_use]
    pub fn with_consumables(mut self, count: u8) -> Self {
        self.equipment.consumables = count;
        self
    }

    /// Grant a companion (builder pattern).
    #[must_use]
    pub fn with_companion(mut self) -> Self {
        self.equipment.companion = true;
        self
    }

    // === Attributes ===

    /// Attribute score for a suit.
    #[must_use]
    pub fn attribute(&self, suit: Suit) -> i8 {
        self.attributes.for_suit(suit)
    }

    // === Conditions ===

    /// Check a condition.
    #[must_use]
    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Set a condition. Returns `true` if it was newly applied.
    pub fn set_condition(&mut self, condition: Condition) -> bool {
        self.conditions.insert(condition)
    }

    /// Clear a condition. Returns `true` if it was present.
    pub fn clear_condition(&mut self, condition: Condition) -> bool {
        self.conditions.remove(&condition)
    }

    /// Clear the first active condition in recover priority order.
    ///
    /// Returns the cleared condition, or `None` if none were active.
    pub fn recover_one(&mut self) -> Option<Condition> {
        for condition in Condition::RECOVER_PRIORITY {
            if self.conditions.remove(&condition) {
                return Some(condition);
            }
        }
        None
    }

    // === Wounds ===

    /// Wounds taken so far.
    #[must_use]
    pub fn wounds(&self) -> u8 {
        self.wounds
    }

    /// Check whether the combatant is still standing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.wounds < self.resilience
    }

    /// Inflict wounds. Returns `true` if this was the killing blow.
    pub fn take_wounds(&mut self, count: u8) -> bool {
        let was_alive = self.is_alive();
        self.wounds = self.wounds.saturating_add(count).min(self.resilience);
        was_alive && !self.is_alive()
    }

    /// Heal one wound.
    pub fn heal_wound(&mut self) {
        self.wounds = self.wounds.saturating_sub(1);
    }

    // === Morale ===

    /// Reduce morale, for combatants that track it. Floor of zero.
    pub fn take_morale_damage(&mut self, amount: i32) {
        if let Some(morale) = self.morale.as_mut() {
            *morale = (*morale - amount).max(0);
        }
    }

    // === Prepared defenses ===

    /// Arm a dodge or riposte. Fails if a defense is already armed.
    pub fn arm_defense(&mut self, kind: DefenseKind, card: Card) -> bool {
        if self.prepared_defense.is_some() {
            return false;
        }
        self.prepared_defense = Some(PreparedDefense { kind, card });
        true
    }

    /// Consume the armed defense, if any.
    pub fn consume_defense(&mut self) -> Option<PreparedDefense> {
        self.prepared_defense.take()
    }
}
