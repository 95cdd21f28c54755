//! Pentacles handler: physical maneuvers.
//!
//! Trips, disarms, forced movement, grapples, and the two ways out of an
//! engagement: the clean escape and the dash that eats the parting blow.

use crate::core::{Card, Condition};

use super::action::{ActionKind, ActionRequest, ActionResult, EffectTag};
use super::resolver::{ActionResolver, ResolverContext, TestOutcome};

impl ActionResolver {
    /// Target and destination preconditions, checked before the test is
    /// rolled.
    pub(super) fn validate_pentacles(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        match request.kind {
            ActionKind::Trip | ActionKind::Disarm | ActionKind::Displace | ActionKind::Grapple => {
                let target = match self.maneuver_target(ctx, request) {
                    Ok(t) => t,
                    Err(failure) => return Some(failure),
                };
                if request.kind == ActionKind::Disarm
                    && ctx
                        .roster
                        .get(target)
                        .is_some_and(|t| t.equipment.weapon.is_none())
                {
                    return Some(ActionResult::failure("target holds nothing to disarm"));
                }
                if request.kind == ActionKind::Displace {
                    let Some(destination) = request.destination else {
                        return Some(ActionResult::failure("displace needs a destination zone"));
                    };
                    let from = ctx.roster.get(target)?.zone;
                    if let Err(err) = ctx.zones.validate_move(from, destination) {
                        return Some(ActionResult::failure(err.to_string()));
                    }
                }
                None
            }
            ActionKind::Dash => {
                let Some(destination) = request.destination else {
                    return Some(ActionResult::failure("dash needs a destination zone"));
                };
                let from = ctx.roster.get(request.actor)?.zone;
                if let Err(err) = ctx.zones.validate_move(from, destination) {
                    return Some(ActionResult::failure(err.to_string()));
                }
                None
            }
            _ => None,
        }
    }

    pub(super) fn resolve_pentacles(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        _card: Card,
        outcome: &TestOutcome,
    ) -> ActionResult {
        match request.kind {
            ActionKind::Trip => self.maneuver_condition(ctx, request, outcome, Condition::Prone),
            ActionKind::Disarm => self.resolve_disarm(ctx, request, outcome),
            ActionKind::Displace => self.resolve_displace(ctx, request, outcome),
            ActionKind::Grapple => self.resolve_grapple(ctx, request, outcome),
            ActionKind::Avoid => self.resolve_avoid(ctx, request, outcome),
            ActionKind::Dash => self.resolve_dash(ctx, request, outcome),
            _ => ActionResult::failure("not a pentacles action"),
        }
    }

    /// Shared precondition check for the directed maneuvers.
    fn maneuver_target(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Result<crate::core::CombatantId, ActionResult> {
        let Some(target) = request.target else {
            return Err(ActionResult::failure("the maneuver needs a target"));
        };
        let Some(target_state) = ctx.roster.get(target) else {
            return Err(ActionResult::failure("target is not part of the challenge"));
        };
        if !target_state.is_alive() {
            return Err(ActionResult::failure("target is already down"));
        }
        let same_zone = ctx
            .roster
            .get(request.actor)
            .map(|a| a.zone == target_state.zone)
            .unwrap_or(false);
        if !same_zone {
            return Err(ActionResult::failure("target is out of reach"));
        }
        Ok(target)
    }

    fn maneuver_condition(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
        condition: Condition,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("the maneuver needs a target");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            if let Some(t) = ctx.roster.get_mut(target) {
                t.set_condition(condition);
            }
            result = result
                .with_effect(EffectTag::ConditionSet(condition))
                .describe("the maneuver succeeds");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the maneuver fails");
        }
        result
    }

    fn resolve_disarm(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("the maneuver needs a target");
        };

        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            if let Some(t) = ctx.roster.get_mut(target) {
                t.equipment.weapon = None;
                t.set_condition(Condition::Disarmed);
            }
            result = result
                .with_effect(EffectTag::ConditionSet(Condition::Disarmed))
                .with_effect(EffectTag::ItemDropped)
                .describe("the weapon is torn free");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the grip holds");
        }
        result
    }

    fn resolve_displace(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("the maneuver needs a target");
        };
        let Some(destination) = request.destination else {
            return ActionResult::failure("displace needs a destination zone");
        };

        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            // Forced movement breaks engagements without a parting blow.
            if !ctx.engagements.disengage_all(target).is_empty() {
                result = result.with_effect(EffectTag::EngagementBroken);
            }
            if self.relocate(ctx, target, destination) {
                result = result.with_effect(EffectTag::VigilanceTriggered);
            }
            result = result
                .with_effect(EffectTag::MovedTo(destination))
                .describe("the target is shoved away");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the target holds ground");
        }
        result
    }

    fn resolve_grapple(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("the maneuver needs a target");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            if let Some(t) = ctx.roster.get_mut(target) {
                t.set_condition(Condition::Rooted);
            }
            if ctx.engagements.engage(request.actor, target) {
                result = result.with_effect(EffectTag::EngagementFormed);
            }
            result = result
                .with_effect(EffectTag::ConditionSet(Condition::Rooted))
                .describe("the hold locks in");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the target slips the hold");
        }
        result
    }

    /// Clean escape: success breaks every engagement with no parting blow.
    fn resolve_avoid(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        if !ctx.engagements.is_engaged(request.actor) {
            return ActionResult::auto("not engaged; nothing to slip away from");
        }
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            ctx.engagements.disengage_all(request.actor);
            result = result
                .with_effect(EffectTag::EngagementBroken)
                .describe("slips free untouched");
        } else {
            result = result.describe("still caught in the melee");
        }
        result
    }

    /// Fast reposition: moves regardless of the contest, but a failed
    /// escape from engagement eats the parting blow on the way out.
    fn resolve_dash(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(destination) = request.destination else {
            return ActionResult::failure("dash needs a destination zone");
        };

        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        let engaged = ctx.engagements.is_engaged(request.actor);

        if engaged {
            if outcome.success {
                ctx.engagements.disengage_all(request.actor);
                result = result.with_effect(EffectTag::EngagementBroken);
            } else {
                // Break through anyway and take the hit.
                if self.parting_blows(ctx, request.actor) {
                    result = result
                        .with_effect(EffectTag::EngagementBroken)
                        .with_effect(EffectTag::PartingBlowTaken);
                }
                result.success = true;
            }
        }

        if ctx.roster.get(request.actor).is_some_and(|a| a.is_alive()) {
            if self.relocate(ctx, request.actor, destination) {
                result = result.with_effect(EffectTag::VigilanceTriggered);
            }
            result = result
                .with_effect(EffectTag::MovedTo(destination))
                .describe("dashes to the next zone");
        } else {
            result = result.describe("cut down mid-stride");
            result.success = false;
        }
        result
    }
}
