//! The minor-action declaration queue.
//!
//! Declarations live only inside the minor-action window, resolve in
//! strict FIFO order, and can be withdrawn any time before resolution.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{Card, ChallengeError, CombatantId};
use crate::resolve::ActionKind;

/// One queued minor-action declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinorDeclaration {
    pub entity: CombatantId,
    pub card: Card,
    pub kind: ActionKind,
    pub target: Option<CombatantId>,
}

/// FIFO queue of pending minor-action declarations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MinorQueue {
    declarations: VecDeque<MinorDeclaration>,
}

impl MinorQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a declaration after validating suit and category rules.
    ///
    /// Miscellaneous-category actions can never be minor actions, and the
    /// card must carry the suit governing the chosen action.
    pub fn declare(&mut self, declaration: MinorDeclaration) -> Result<(), ChallengeError> {
        if !declaration.kind.minor_eligible() {
            return Err(ChallengeError::MiscNotAllowed);
        }
        if let Some(required) = declaration.kind.required_minor_suit() {
            if declaration.card.suit != required {
                return Err(ChallengeError::SuitMismatch);
            }
        }
        self.declarations.push_back(declaration);
        Ok(())
    }

    /// Withdraw a declaration by queue index.
    pub fn undeclare(&mut self, index: usize) -> Result<MinorDeclaration, ChallengeError> {
        self.declarations
            .remove(index)
            .ok_or(ChallengeError::InvalidIndex)
    }

    /// Take the next declaration in FIFO order.
    pub fn pop_next(&mut self) -> Option<MinorDeclaration> {
        self.declarations.pop_front()
    }

    /// Queued declarations, in declaration order.
    #[must_use]
    pub fn pending(&self) -> impl Iterator<Item = &MinorDeclaration> {
        self.declarations.iter()
    }

    /// Number of queued declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Drop everything (window closed, challenge ended).
    pub fn clear(&mut self) {
        self.declarations.clear();
    }
}
