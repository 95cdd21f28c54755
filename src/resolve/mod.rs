//! Action resolution: the vocabulary, the resolver, and its bookkeeping.
//!
//! The controller drives [`ActionResolver::resolve`] with an
//! [`ActionRequest`] and a [`ResolverContext`] view over the world it
//! owns; the result comes back as an [`ActionResult`] and its effects
//! have already been applied.

mod action;
mod cups;
mod misc;
mod pentacles;
mod resolver;
mod support;
mod swords;
mod wands;

pub use action::{
    ActionCategory, ActionKind, ActionRequest, ActionRequirements, ActionResult, EffectTag,
    FollowUp, Opposition, VigilanceTrigger,
};
pub use resolver::{
    ActionResolver, FateHook, ResolverContext, MAX_NESTING, UNDIRECTED_DIFFICULTY,
};
pub use support::{ArmedVigilance, RoundBank, AID_BONUS};
