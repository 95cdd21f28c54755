//! Per-round initiative bookkeeping and count-up ordering.
//!
//! Each living combatant holds exactly one [`InitiativeSlot`] per round,
//! created at round start and cleared at round end. Slots begin face-down;
//! guard and initiative-opposed targeting reveal them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Card, ChallengeError, CombatantId, Roster, COUNT_MAX};

/// Baseline difficulty when an opposed target has no current slot
/// (resolver invoked outside a running round).
pub const BASELINE_DIFFICULTY: i32 = 10;

/// One combatant's initiative for the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeSlot {
    /// The submitted card, kept face-down until revealed.
    pub card: Card,
    /// Count value the combatant acts on. Guard can overwrite this.
    pub value: u8,
    pub revealed: bool,
}

impl InitiativeSlot {
    /// Create a face-down slot from a submitted card.
    #[must_use]
    pub fn new(card: Card) -> Self {
        Self {
            card,
            value: card.initiative_value(),
            revealed: false,
        }
    }
}

/// Round-scoped initiative slots for every living combatant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InitiativeTracker {
    slots: FxHashMap<CombatantId, InitiativeSlot>,
}

impl InitiativeTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a face-down submission.
    ///
    /// At most one unresolved slot per combatant per round.
    pub fn submit(&mut self, id: CombatantId, card: Card) -> Result<(), ChallengeError> {
        if self.slots.contains_key(&id) {
            return Err(ChallengeError::AlreadySubmitted);
        }
        self.slots.insert(id, InitiativeSlot::new(card));
        Ok(())
    }

    /// Check whether a combatant has submitted this round.
    #[must_use]
    pub fn has_submitted(&self, id: CombatantId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Check whether every living roster member has submitted.
    #[must_use]
    pub fn all_submitted(&self, roster: &Roster) -> bool {
        roster.living().all(|c| self.slots.contains_key(&c.id))
    }

    /// The slot for a combatant, if any.
    #[must_use]
    pub fn slot(&self, id: CombatantId) -> Option<&InitiativeSlot> {
        self.slots.get(&id)
    }

    /// Current initiative value for a combatant.
    #[must_use]
    pub fn value_of(&self, id: CombatantId) -> Option<u8> {
        self.slots.get(&id).map(|s| s.value)
    }

    /// Difficulty an initiative-opposed action faces against `id`.
    #[must_use]
    pub fn opposed_difficulty(&self, id: CombatantId) -> i32 {
        self.value_of(id)
            .map_or(BASELINE_DIFFICULTY, |v| i32::from(v))
    }

    /// Turn a slot face-up. Returns `true` if it was newly revealed.
    pub fn reveal(&mut self, id: CombatantId) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) if !slot.revealed => {
                slot.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Overwrite a slot's value and reveal it (guard).
    ///
    /// Returns `false` if the combatant has no slot this round.
    pub fn overwrite_value(&mut self, id: CombatantId, value: u8) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.value = value.min(COUNT_MAX);
                slot.revealed = true;
                true
            }
            None => false,
        }
    }

    /// Remove a combatant's slot (flee mid-round).
    pub fn remove(&mut self, id: CombatantId) {
        self.slots.remove(&id);
    }

    /// Clear all slots at round end.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Living combatants acting at a count value.
    ///
    /// Player characters come before non-player combatants; within a side
    /// the roster's registration order is preserved. This is the chosen
    /// tie-break for same-side, same-count entities.
    #[must_use]
    pub fn actors_at_count(&self, count: u8, roster: &Roster) -> Vec<CombatantId> {
        let matching = |want_pc: bool| {
            roster
                .living()
                .filter(move |c| c.is_pc == want_pc)
                .filter(|c| self.value_of(c.id) == Some(count))
                .map(|c| c.id)
        };
        matching(true).chain(matching(false)).collect()
    }
}
