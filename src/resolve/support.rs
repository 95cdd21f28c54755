//! Round-scoped resolver bookkeeping.
//!
//! Banked aid bonuses and armed vigilance triggers are the only state the
//! resolver carries between calls. Both live in an explicit arena keyed
//! by combatant ID, cleared at the round boundary by the controller.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Card, CombatantId};

use super::action::{ActionKind, VigilanceTrigger};

/// Bonus aid-another grants a target's next action.
pub const AID_BONUS: i32 = 2;

/// An armed vigilance reaction: a same-suit follow-up that fires when its
/// trigger condition is met.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmedVigilance {
    pub trigger: VigilanceTrigger,
    pub kind: ActionKind,
    pub card: Card,
    pub target: Option<CombatantId>,
}

/// Arena for banked aid bonuses and armed vigilance triggers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundBank {
    /// Aid bonus keyed by the *beneficiary*. Overwritten, never stacked.
    aid: FxHashMap<CombatantId, i32>,
    /// Vigilance keyed by the watcher.
    vigilance: FxHashMap<CombatantId, ArmedVigilance>,
}

impl RoundBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Aid ===

    /// Bank an aid bonus for a beneficiary. A later aid overwrites.
    pub fn bank_aid(&mut self, beneficiary: CombatantId, bonus: i32) {
        self.aid.insert(beneficiary, bonus);
    }

    /// Consume the banked bonus for an actor's next action.
    ///
    /// Applied to at most one action, then gone.
    pub fn take_aid(&mut self, beneficiary: CombatantId) -> Option<i32> {
        self.aid.remove(&beneficiary)
    }

    /// Peek without consuming.
    #[must_use]
    pub fn aid_for(&self, beneficiary: CombatantId) -> Option<i32> {
        self.aid.get(&beneficiary).copied()
    }

    // === Vigilance ===

    /// Arm a vigilance reaction. Returns `false` if one is already armed.
    pub fn arm_vigilance(&mut self, watcher: CombatantId, armed: ArmedVigilance) -> bool {
        if self.vigilance.contains_key(&watcher) {
            return false;
        }
        self.vigilance.insert(watcher, armed);
        true
    }

    /// The armed vigilance for a watcher, if any.
    #[must_use]
    pub fn vigilance_of(&self, watcher: CombatantId) -> Option<&ArmedVigilance> {
        self.vigilance.get(&watcher)
    }

    /// Consume a watcher's armed vigilance when its trigger fires.
    pub fn take_vigilance(&mut self, watcher: CombatantId) -> Option<ArmedVigilance> {
        self.vigilance.remove(&watcher)
    }

    /// Watchers whose armed trigger matches, in ID order.
    #[must_use]
    pub fn watchers_for(&self, trigger: VigilanceTrigger) -> Vec<CombatantId> {
        let mut ids: Vec<CombatantId> = self
            .vigilance
            .iter()
            .filter(|(_, v)| v.trigger == trigger)
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    /// Drop a combatant's entries (defeat, flee).
    pub fn forget(&mut self, id: CombatantId) {
        self.aid.remove(&id);
        self.vigilance.remove(&id);
    }

    /// Clear everything at the round boundary.
    pub fn clear(&mut self) {
        self.aid.clear();
        self.vigilance.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;

    const A: CombatantId = CombatantId::new(1);
    const B: CombatantId = CombatantId::new(2);

    fn armed(trigger: VigilanceTrigger) -> ArmedVigilance {
        ArmedVigilance {
            trigger,
            kind: ActionKind::MeleeAttack,
            card: Card::minor(Suit::Swords, 6),
            target: None,
        }
    }

    #[test]
    fn test_aid_applied_once() {
        let mut bank = RoundBank::new();
        bank.bank_aid(A, AID_BONUS);

        assert_eq!(bank.take_aid(A), Some(AID_BONUS));
        assert_eq!(bank.take_aid(A), None); // absent thereafter
    }

    #[test]
    fn test_aid_overwrites_not_stacks() {
        let mut bank = RoundBank::new();
        bank.bank_aid(A, 2);
        bank.bank_aid(A, 3);

        assert_eq!(bank.take_aid(A), Some(3));
    }

    #[test]
    fn test_aid_keyed_by_beneficiary() {
        let mut bank = RoundBank::new();
        bank.bank_aid(A, 2);
        assert_eq!(bank.aid_for(B), None);
        assert_eq!(bank.aid_for(A), Some(2));
    }

    #[test]
    fn test_vigilance_single_slot() {
        let mut bank = RoundBank::new();
        assert!(bank.arm_vigilance(A, armed(VigilanceTrigger::EnemyEntersZone)));
        assert!(!bank.arm_vigilance(A, armed(VigilanceTrigger::EnemyLeavesZone)));

        let taken = bank.take_vigilance(A).unwrap();
        assert_eq!(taken.trigger, VigilanceTrigger::EnemyEntersZone);
        assert!(bank.take_vigilance(A).is_none());
    }

    #[test]
    fn test_watchers_for_matching_trigger() {
        let mut bank = RoundBank::new();
        bank.arm_vigilance(B, armed(VigilanceTrigger::EnemyEntersZone));
        bank.arm_vigilance(A, armed(VigilanceTrigger::EnemyEntersZone));

        assert_eq!(
            bank.watchers_for(VigilanceTrigger::EnemyEntersZone),
            vec![A, B]
        );
        assert!(bank.watchers_for(VigilanceTrigger::EnemyLeavesZone).is_empty());
    }

    #[test]
    fn test_clear_at_round_boundary() {
        let mut bank = RoundBank::new();
        bank.bank_aid(A, 2);
        bank.arm_vigilance(B, armed(VigilanceTrigger::EnemyEntersZone));

        bank.clear();
        assert_eq!(bank.aid_for(A), None);
        assert!(bank.vigilance_of(B).is_none());
    }
}
