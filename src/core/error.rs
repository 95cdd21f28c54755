//! Reason-code taxonomy for controller operations.
//!
//! Every controller operation returns `Result<_, ChallengeError>`; the
//! variants are reason codes, not control flow. A missed attack or failed
//! social check is *not* an error: it is an ordinary `ActionResult` with
//! `success = false`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a controller operation was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ChallengeError {
    // === State-ordering violations ===
    #[error("a challenge is already active")]
    AlreadyActive,
    #[error("not in the pre-round initiative phase")]
    NotInPreRound,
    #[error("the count-up clock is not running")]
    NotInCountUp,
    #[error("not awaiting an action")]
    NotAwaitingAction,
    #[error("no resolution is awaiting acknowledgement")]
    NotInVisualSync,
    #[error("no entity is currently active")]
    NoActiveEntity,
    #[error("only the active entity may act")]
    NotYourTurn,
    #[error("not in the minor-action window")]
    NotInMinorWindow,
    #[error("a Fool interrupt cannot be played now")]
    CannotInterruptNow,

    // === Missing preconditions ===
    #[error("a combat challenge needs at least one player character")]
    NoPcs,
    #[error("a combat challenge needs at least one non-player combatant")]
    NoNpcs,
    #[error("no card was supplied")]
    NoCard,
    #[error("initiative was already submitted this round")]
    AlreadySubmitted,
    #[error("no declaration at that index")]
    InvalidIndex,
    #[error("combatant is not part of this challenge")]
    UnknownCombatant,

    // === Rule violations ===
    #[error("card suit does not match the minor action's required suit")]
    SuitMismatch,
    #[error("miscellaneous actions cannot be declared as minor actions")]
    MiscNotAllowed,
    #[error("only the zero-value wildcard can be played as an interrupt")]
    NotTheFool,
    #[error("the Fool follow-up bundle is malformed")]
    InvalidFoolInterrupt,

    // === Spatial violations ===
    #[error("zone is not part of this challenge")]
    ZoneNotFound,
    #[error("zones are not adjacent")]
    ZonesNotAdjacent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ChallengeError::AlreadyActive.to_string(),
            "a challenge is already active"
        );
        assert_eq!(
            ChallengeError::SuitMismatch.to_string(),
            "card suit does not match the minor action's required suit"
        );
    }

    #[test]
    fn test_serialization() {
        let err = ChallengeError::NotInPreRound;
        let json = serde_json::to_string(&err).unwrap();
        let back: ChallengeError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
