//! Wands handler: social pressure, spellwork, and recovery.
//!
//! Social actions contest live morale and move the disposition ladder:
//! warmer on success, colder on failure. A target with no morale slot
//! cannot be swayed at all.

use crate::core::Card;

use super::action::{ActionKind, ActionRequest, ActionResult, EffectTag};
use super::resolver::{ActionResolver, ResolverContext, TestOutcome};

impl ActionResolver {
    /// Social and spellcast target preconditions, checked before the test
    /// is rolled.
    pub(super) fn validate_wands(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        match request.kind {
            ActionKind::Banter | ActionKind::Parley => {
                let Some(target) = request.target else {
                    return Some(ActionResult::failure("a social action needs a target"));
                };
                let Some(target_state) = ctx.roster.get(target) else {
                    return Some(ActionResult::failure("target is not part of the challenge"));
                };
                if target_state.morale.is_none() {
                    return Some(ActionResult::failure("the target cannot be swayed"));
                }
                None
            }
            ActionKind::Spellcast => {
                let Some(target) = request.target else {
                    return Some(ActionResult::failure("spellcast needs a target"));
                };
                if !ctx.roster.get(target).is_some_and(|t| t.is_alive()) {
                    return Some(ActionResult::failure("target is already down"));
                }
                None
            }
            _ => None,
        }
    }

    pub(super) fn resolve_wands(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        _card: Card,
        outcome: &TestOutcome,
    ) -> ActionResult {
        match request.kind {
            ActionKind::Banter | ActionKind::Parley => self.resolve_social(ctx, request, outcome),
            ActionKind::Spellcast => self.resolve_spellcast(ctx, request, outcome),
            ActionKind::Recover => self.resolve_recover(ctx, request, outcome),
            _ => ActionResult::failure("not a wands action"),
        }
    }

    fn resolve_social(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("a social action needs a target");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            let damage = if outcome.is_great { 2 } else { 1 };
            if let Some(t) = ctx.roster.get_mut(target) {
                t.take_morale_damage(damage);
                t.disposition = t.disposition.warmer();
            }
            result = result
                .with_effect(EffectTag::MoraleDamage(damage))
                .with_effect(EffectTag::DispositionShift { warmer: true })
                .describe("the words find their mark");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            if let Some(t) = ctx.roster.get_mut(target) {
                t.disposition = t.disposition.colder();
            }
            result = result
                .with_effect(EffectTag::DispositionShift { warmer: false })
                .describe("the words fall flat");
        }
        result
    }

    fn resolve_spellcast(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("spellcast needs a target");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            let wounds = if outcome.is_great { 2 } else { 1 };
            result = result
                .with_damage(wounds)
                .with_effect(EffectTag::WoundInflicted)
                .describe("the working strikes home");
            if outcome.is_great {
                result = result.great();
            }
            self.inflict_wounds(ctx, Some(request.actor), target, wounds);
        } else {
            result = result.describe("the working fizzles");
        }
        result
    }

    fn resolve_recover(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if !outcome.success {
            return result.describe("cannot shake it off");
        }
        match ctx.roster.get_mut(request.actor).and_then(|a| a.recover_one()) {
            Some(cleared) => result
                .with_effect(EffectTag::ConditionCleared(cleared))
                .describe("shakes the condition off"),
            None => {
                result.success = false;
                result.describe("nothing to recover from")
            }
        }
    }
}
