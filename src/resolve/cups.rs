//! Cups handler: support, defense preparation, and item play.

use crate::core::{Card, DefenseKind};

use super::action::{ActionKind, ActionRequest, ActionResult, EffectTag};
use super::resolver::{ActionResolver, ResolverContext, TestOutcome};
use super::support::AID_BONUS;

impl ActionResolver {
    /// Patient and beneficiary preconditions, checked before the test is
    /// rolled.
    pub(super) fn validate_cups(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        match request.kind {
            ActionKind::Heal => {
                let patient = request.target.unwrap_or(request.actor);
                if !ctx.roster.contains(patient) {
                    return Some(ActionResult::failure("patient is not part of the challenge"));
                }
                None
            }
            ActionKind::Command => {
                let Some(target) = request.target else {
                    return Some(ActionResult::failure("command needs a target"));
                };
                if !ctx.roster.contains(target) {
                    return Some(ActionResult::failure("target is not part of the challenge"));
                }
                None
            }
            ActionKind::AidAnother => {
                let Some(beneficiary) = request.target else {
                    return Some(ActionResult::failure("aid needs a beneficiary"));
                };
                if !ctx.roster.contains(beneficiary) {
                    return Some(ActionResult::failure(
                        "beneficiary is not part of the challenge",
                    ));
                }
                None
            }
            _ => None,
        }
    }

    pub(super) fn resolve_cups(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
        outcome: &TestOutcome,
    ) -> ActionResult {
        match request.kind {
            ActionKind::PrepareDodge => self.prepare_defense(ctx, request, card, DefenseKind::Dodge),
            ActionKind::PrepareRiposte => {
                self.prepare_defense(ctx, request, card, DefenseKind::Riposte)
            }
            ActionKind::Heal => self.resolve_heal(ctx, request, outcome),
            ActionKind::Command => self.resolve_command(ctx, request, outcome),
            ActionKind::AidAnother => self.resolve_aid(ctx, request, outcome),
            ActionKind::PullItem => self.resolve_pull_item(outcome),
            ActionKind::UseItem => self.resolve_use_item(ctx, request, outcome),
            _ => ActionResult::failure("not a cups action"),
        }
    }

    /// Arm a one-shot defense. Only one may be held at a time.
    fn prepare_defense(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
        kind: DefenseKind,
    ) -> ActionResult {
        let Some(actor) = ctx.roster.get_mut(request.actor) else {
            return ActionResult::failure("actor is not part of the challenge");
        };
        if !actor.arm_defense(kind, card) {
            return ActionResult::failure("a defense is already prepared");
        }
        ActionResult::auto("the defense is readied").with_effect(EffectTag::DefensePrepared(kind))
    }

    fn resolve_heal(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let patient = request.target.unwrap_or(request.actor);
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            if let Some(actor) = ctx.roster.get_mut(request.actor) {
                actor.equipment.consumables = actor.equipment.consumables.saturating_sub(1);
            }
            if let Some(p) = ctx.roster.get_mut(patient) {
                p.heal_wound();
                // A great success closes a second wound.
                if outcome.is_great {
                    p.heal_wound();
                }
            }
            result = result
                .with_effect(EffectTag::ItemUsed)
                .with_effect(EffectTag::Healed)
                .describe("the wound is bound");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the remedy takes no hold");
        }
        result
    }

    /// Direct a companion against a target. Contests the target's
    /// initiative, which the test has already revealed.
    fn resolve_command(
        &mut self,
        _ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(_target) = request.target else {
            return ActionResult::failure("command needs a target");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            result = result
                .with_effect(EffectTag::Commanded)
                .describe("the companion harries the target");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the companion balks");
        }
        result
    }

    /// Bank a bonus on an ally's next test this round.
    fn resolve_aid(
        &mut self,
        _ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(beneficiary) = request.target else {
            return ActionResult::failure("aid needs a beneficiary");
        };
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            self.bank_mut().bank_aid(beneficiary, AID_BONUS);
            result = result
                .with_effect(EffectTag::AidBanked)
                .describe("sets up the opening");
        } else {
            result = result.describe("the opening never comes");
        }
        result
    }

    fn resolve_pull_item(&self, outcome: &TestOutcome) -> ActionResult {
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        result = if outcome.success {
            result.describe("the item comes free, ready in hand")
        } else {
            result.describe("fumbles in the pack")
        };
        result
    }

    fn resolve_use_item(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if outcome.success {
            if let Some(actor) = ctx.roster.get_mut(request.actor) {
                actor.equipment.consumables = actor.equipment.consumables.saturating_sub(1);
            }
            result = result
                .with_effect(EffectTag::ItemUsed)
                .describe("the item does its work");
            if outcome.is_great {
                result = result.great();
            }
        } else {
            result = result.describe("the item is wasted");
        }
        result
    }
}
