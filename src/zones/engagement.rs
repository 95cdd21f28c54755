//! Pairwise engagement tracking.
//!
//! Engagement is a symmetric "locked in melee" relation between two
//! combatants sharing a zone. It restricts ranged actions and triggers
//! parting blows on disengagement. The registry owns the relation; the
//! resolver only queries and breaks it.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::CombatantId;

/// Symmetric engagement relation over combatant pairs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngagementRegistry {
    /// Pairs stored with the lower ID first.
    pairs: FxHashSet<(CombatantId, CombatantId)>,
}

fn ordered(a: CombatantId, b: CombatantId) -> (CombatantId, CombatantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl EngagementRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage two combatants. Returns `true` if the pair was new.
    ///
    /// Engaging a combatant with itself is a no-op.
    pub fn engage(&mut self, a: CombatantId, b: CombatantId) -> bool {
        if a == b {
            return false;
        }
        self.pairs.insert(ordered(a, b))
    }

    /// Break one engagement. Returns `true` if the pair existed.
    pub fn disengage(&mut self, a: CombatantId, b: CombatantId) -> bool {
        self.pairs.remove(&ordered(a, b))
    }

    /// Break every engagement involving a combatant.
    ///
    /// Returns the former partners, in ID order.
    pub fn disengage_all(&mut self, id: CombatantId) -> Vec<CombatantId> {
        let mut partners: Vec<CombatantId> = self
            .pairs
            .iter()
            .filter_map(|&(a, b)| {
                if a == id {
                    Some(b)
                } else if b == id {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        partners.sort();
        for &other in &partners {
            self.pairs.remove(&ordered(id, other));
        }
        partners
    }

    /// Check whether two combatants are engaged.
    #[must_use]
    pub fn is_engaged_with(&self, a: CombatantId, b: CombatantId) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Check whether a combatant has any active engagement.
    #[must_use]
    pub fn is_engaged(&self, id: CombatantId) -> bool {
        self.pairs.iter().any(|&(a, b)| a == id || b == id)
    }

    /// All combatants engaged with `id`, in ID order.
    #[must_use]
    pub fn partners_of(&self, id: CombatantId) -> Vec<CombatantId> {
        let mut partners: Vec<CombatantId> = self
            .pairs
            .iter()
            .filter_map(|&(a, b)| {
                if a == id {
                    Some(b)
                } else if b == id {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        partners.sort();
        partners
    }

    /// Number of engaged pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check whether no engagements exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Clear every engagement (challenge end).
    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}
