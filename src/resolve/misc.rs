//! Miscellaneous handler: movement, guard, vigilance, and the freebies.
//!
//! None of these take a test; they succeed once their inputs are valid.
//! None may be declared in the minor-action window.

use crate::core::{Card, WeaponCategory};

use super::action::{ActionKind, ActionRequest, ActionResult, EffectTag};
use super::resolver::{ActionResolver, ResolverContext, TestOutcome};
use super::support::ArmedVigilance;

impl ActionResolver {
    pub(super) fn resolve_misc(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
        _outcome: &TestOutcome,
    ) -> ActionResult {
        match request.kind {
            ActionKind::Move => self.resolve_move(ctx, request),
            ActionKind::Guard => self.resolve_guard(ctx, request, card),
            ActionKind::Vigilance => self.resolve_vigilance(ctx, request),
            ActionKind::Reload => self.resolve_reload(ctx, request),
            ActionKind::Signal => ActionResult::auto("the signal goes up"),
            ActionKind::Wait => ActionResult::auto("holds position"),
            _ => ActionResult::failure("not a miscellaneous action"),
        }
    }

    /// Ordinary movement to an adjacent zone. Leaving an engagement this
    /// way always suffers the parting blow.
    fn resolve_move(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        let Some(destination) = request.destination else {
            return ActionResult::failure("move needs a destination zone");
        };
        let from = match ctx.roster.get(request.actor) {
            Some(a) => a.zone,
            None => return ActionResult::failure("actor is not part of the challenge"),
        };
        if let Err(err) = ctx.zones.validate_move(from, destination) {
            return ActionResult::failure(err.to_string());
        }

        let mut result = ActionResult::auto("moves to the next zone");
        if ctx.engagements.is_engaged(request.actor) {
            if self.parting_blows(ctx, request.actor) {
                result = result
                    .with_effect(EffectTag::EngagementBroken)
                    .with_effect(EffectTag::PartingBlowTaken);
            }
            if !ctx.roster.get(request.actor).is_some_and(|a| a.is_alive()) {
                result.success = false;
                return result.describe("cut down while breaking away");
            }
        }
        if self.relocate(ctx, request.actor, destination) {
            result = result.with_effect(EffectTag::VigilanceTriggered);
        }
        if !ctx.roster.get(request.actor).is_some_and(|a| a.is_alive()) {
            result.success = false;
            return result.describe("struck down crossing the threshold");
        }
        result.with_effect(EffectTag::MovedTo(destination))
    }

    /// Overwrite own initiative with the guard card's value, face-up.
    fn resolve_guard(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
    ) -> ActionResult {
        if !ctx.initiative.overwrite_value(request.actor, card.initiative_value()) {
            return ActionResult::failure("no initiative to overwrite this round");
        }
        ctx.bus.publish(crate::events::ChallengeEvent::InitiativeRevealed {
            entity: request.actor,
        });
        ActionResult::auto("raises the shield and watches")
            .with_effect(EffectTag::InitiativeOverwritten)
    }

    /// Arm a reactive follow-up held against a trigger condition.
    ///
    /// The follow-up must be minor-eligible and its card must carry the
    /// suit governing its kind.
    fn resolve_vigilance(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        let Some(trigger) = request.vigilance_trigger else {
            return ActionResult::failure("vigilance needs a trigger condition");
        };
        let Some(follow_up) = request.follow_up.as_deref() else {
            return ActionResult::failure("vigilance needs a held follow-up");
        };
        if !follow_up.kind.minor_eligible() {
            return ActionResult::failure("that action cannot be held in reserve");
        }
        if let Some(required) = follow_up.kind.required_minor_suit() {
            if follow_up.card.suit != required {
                return ActionResult::failure("held card does not match the action's suit");
            }
        }
        if !ctx.roster.contains(request.actor) {
            return ActionResult::failure("actor is not part of the challenge");
        }

        let armed = ArmedVigilance {
            trigger,
            kind: follow_up.kind,
            card: follow_up.card,
            target: follow_up.target,
        };
        if !self.bank_mut().arm_vigilance(request.actor, armed) {
            return ActionResult::failure("already holding a vigilance reaction");
        }
        ActionResult::auto("eyes fixed, reaction held").with_effect(EffectTag::VigilanceArmed)
    }

    fn resolve_reload(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        let Some(actor) = ctx.roster.get_mut(request.actor) else {
            return ActionResult::failure("actor is not part of the challenge");
        };
        let crossbow = actor
            .equipment
            .weapon
            .as_ref()
            .is_some_and(|w| w.category == WeaponCategory::Crossbow);
        if !crossbow {
            return ActionResult::failure("nothing that needs reloading");
        }
        if actor.equipment.loaded {
            return ActionResult::failure("already loaded");
        }
        actor.equipment.loaded = true;
        ActionResult::auto("cranks a bolt into place").with_effect(EffectTag::Reloaded)
    }
}
