//! Challenge phases, outcomes, and challenge types.

use serde::{Deserialize, Serialize};

/// The controller's explicit state machine.
///
/// `Idle` is both the initial and the terminal state of a challenge
/// instance; `Ending` always returns there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengePhase {
    /// No challenge in progress.
    #[default]
    Idle,
    /// Roster construction during `start_challenge`.
    Starting,
    /// Collecting face-down initiative submissions.
    PreRound,
    /// The 1-14 count-up clock is running.
    CountUp,
    /// The active combatant must submit an action.
    AwaitingAction,
    /// An action is being resolved.
    Resolving,
    /// Caller-visible pause until the presentation layer acknowledges.
    VisualSync,
    /// Declare/undeclare minor actions; indefinite, no timer.
    MinorWindow,
    /// Tearing down after an outcome was decided.
    Ending,
}

/// How a challenge ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    /// All non-player combatants defeated.
    Victory,
    /// All player combatants defeated.
    Defeat,
    /// The player side fled the field.
    Fled,
    /// An external clock expired.
    TimeOut,
    /// Resolved socially rather than by force.
    Negotiated,
}

/// What kind of challenge is being run.
///
/// Only combat challenges require both rosters to be non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeType {
    Combat,
    Social,
}
