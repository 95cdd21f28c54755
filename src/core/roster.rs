//! The living-combatant roster.
//!
//! Registration order is load-bearing: the same-count tie-break preserves
//! it, so the roster keeps an explicit order vector alongside the lookup
//! map.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::combatant::{Combatant, CombatantId};
use crate::zones::ZoneId;

/// Ordered collection of the combatants in a challenge.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    order: Vec<CombatantId>,
    members: FxHashMap<CombatantId, Combatant>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a combatant.
    ///
    /// Panics if the ID is already registered.
    pub fn add(&mut self, combatant: Combatant) {
        let id = combatant.id;
        if self.members.insert(id, combatant).is_some() {
            panic!("{id} already registered in roster");
        }
        self.order.push(id);
    }

    /// Remove a combatant entirely (flee, banish).
    ///
    /// Returns the removed combatant, or `None` if not registered.
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let removed = self.members.remove(&id)?;
        self.order.retain(|&c| c != id);
        Some(removed)
    }

    /// Look up a combatant.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.members.get(&id)
    }

    /// Look up a combatant mutably.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.members.get_mut(&id)
    }

    /// Check registration.
    #[must_use]
    pub fn contains(&self, id: CombatantId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of registered combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// IDs in registration order.
    #[must_use]
    pub fn ids_in_order(&self) -> &[CombatantId] {
        &self.order
    }

    /// Living combatants, in registration order.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.order
            .iter()
            .filter_map(|id| self.members.get(id))
            .filter(|c| c.is_alive())
    }

    /// Living player characters, in registration order.
    pub fn living_pcs(&self) -> impl Iterator<Item = &Combatant> {
        self.living().filter(|c| c.is_pc)
    }

    /// Living non-player combatants, in registration order.
    pub fn living_npcs(&self) -> impl Iterator<Item = &Combatant> {
        self.living().filter(|c| !c.is_pc)
    }

    /// Living combatants currently in a zone, in registration order.
    pub fn living_in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.zone == zone)
    }

    /// Living allies of `of` (same side) sharing a zone, excluding `of`.
    pub fn allies_in_zone(&self, of: CombatantId, zone: ZoneId) -> impl Iterator<Item = &Combatant> {
        let side = self.get(of).map(|c| c.is_pc);
        self.living_in_zone(zone)
            .filter(move |c| c.id != of && Some(c.is_pc) == side)
    }
}
