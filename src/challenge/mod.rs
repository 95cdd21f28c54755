//! The Challenge Controller and its phase machinery.

mod controller;
mod initiative;
mod minor;
mod state;

pub use controller::ChallengeController;
pub use initiative::{InitiativeSlot, InitiativeTracker, BASELINE_DIFFICULTY};
pub use minor::{MinorDeclaration, MinorQueue};
pub use state::{ChallengeOutcome, ChallengePhase, ChallengeType};
