//! The NPC-facing decision surface.
//!
//! Non-player combatants never touch resolver internals: a decision
//! module implements [`NpcDecider`], listens for controller events, and
//! calls back through the controller's public operations with the card
//! and action it chose. [`ScriptedDecider`] replays a fixed script and is
//! what the integration tests drive challenges with.

use std::collections::VecDeque;

use crate::cards::CardSource;
use crate::core::{Card, Combatant, Doom, Roster};
use crate::resolve::ActionRequest;

/// Chooses cards and actions for a non-player combatant.
pub trait NpcDecider {
    /// Pick an initiative card for the round, usually by drawing.
    fn choose_initiative(&mut self, npc: &Combatant, deck: &mut dyn CardSource) -> Option<Card>;

    /// Pick the action for the combatant's turn.
    fn choose_action(
        &mut self,
        npc: &Combatant,
        roster: &Roster,
        deck: &mut dyn CardSource,
    ) -> Option<ActionRequest>;
}

/// Greater-Doom gate for non-player card plays.
///
/// Lesser Doom majors are always playable; Greater Doom majors only when
/// the gate is open. Minor cards and the Fool pass through untouched.
#[must_use]
pub fn doom_permits(card: Card, allow_greater: bool) -> bool {
    match card.doom() {
        Some(Doom::Greater) => allow_greater,
        Some(Doom::Lesser) | None => true,
    }
}

/// A decider that replays a fixed script. Deterministic by construction.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    initiative_script: VecDeque<Card>,
    action_script: VecDeque<ActionRequest>,
    /// Whether Greater Doom cards may be played at all.
    allow_greater_doom: bool,
}

impl ScriptedDecider {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an initiative card (builder pattern).
    #[must_use]
    pub fn with_initiative(mut self, card: Card) -> Self {
        self.initiative_script.push_back(card);
        self
    }

    /// Queue an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: ActionRequest) -> Self {
        self.action_script.push_back(action);
        self
    }

    /// Open the Greater Doom gate (builder pattern).
    #[must_use]
    pub fn with_greater_doom(mut self) -> Self {
        self.allow_greater_doom = true;
        self
    }
}

impl NpcDecider for ScriptedDecider {
    /// Scripted cards first; falls back to drawing from the deck. Cards
    /// blocked by the Doom gate are discarded and redrawn.
    fn choose_initiative(&mut self, _npc: &Combatant, deck: &mut dyn CardSource) -> Option<Card> {
        if let Some(card) = self.initiative_script.pop_front() {
            return Some(card);
        }
        loop {
            let card = deck.draw()?;
            if doom_permits(card, self.allow_greater_doom) {
                return Some(card);
            }
            deck.discard(card);
        }
    }

    fn choose_action(
        &mut self,
        _npc: &Combatant,
        _roster: &Roster,
        _deck: &mut dyn CardSource,
    ) -> Option<ActionRequest> {
        self.action_script.pop_front()
    }
}
