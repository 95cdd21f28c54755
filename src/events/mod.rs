//! Event bus and notification vocabulary.
//!
//! The controller publishes [`ChallengeEvent`]s on an explicit,
//! constructor-injected [`EventBus`]; the UI, NPC decision module, and
//! other subsystems subscribe. Dispatch is synchronous, one-to-many, and
//! one-way: nothing flows back through the bus.

mod bus;
mod event;

pub use bus::{EventBus, EventLog};
pub use event::ChallengeEvent;
