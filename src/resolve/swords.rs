//! Swords handler: melee and missile attacks.
//!
//! Attacks are the only actions that interact with prepared ripostes,
//! weapon Great Success bonuses, and the axe cleave.

use crate::core::{Card, CombatantId, Condition, DefenseKind, WeaponCategory};

use super::action::{ActionKind, ActionRequest, ActionResult, EffectTag};
use super::resolver::{ActionResolver, ResolverContext, TestOutcome};

impl ActionResolver {
    /// Target, reach, and ammunition preconditions, checked before the
    /// test is rolled.
    pub(super) fn validate_swords(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        let Some(target) = request.target else {
            return Some(ActionResult::failure("an attack needs a target"));
        };
        let Some(target_state) = ctx.roster.get(target) else {
            return Some(ActionResult::failure("target is not part of the challenge"));
        };
        if !target_state.is_alive() {
            return Some(ActionResult::failure("target is already down"));
        }

        let actor = ctx.roster.get(request.actor)?;
        if request.kind == ActionKind::MeleeAttack {
            if actor.zone != target_state.zone {
                return Some(ActionResult::failure("target is out of melee reach"));
            }
        } else {
            match actor.equipment.weapon.as_ref().map(|w| w.category) {
                Some(WeaponCategory::Bow) if actor.equipment.ammo == 0 => {
                    return Some(ActionResult::failure("out of ammunition"));
                }
                Some(WeaponCategory::Crossbow) if !actor.equipment.loaded => {
                    return Some(ActionResult::failure("the crossbow is not loaded"));
                }
                _ => {}
            }
        }
        None
    }

    pub(super) fn resolve_swords(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
        outcome: &TestOutcome,
    ) -> ActionResult {
        let Some(target) = request.target else {
            return ActionResult::failure("an attack needs a target");
        };

        let is_melee = request.kind == ActionKind::MeleeAttack;
        let weapon = ctx
            .roster
            .get(request.actor)
            .and_then(|a| a.equipment.weapon.as_ref())
            .map(|w| w.category);

        // A shot is loosed whether or not it lands.
        if !is_melee {
            self.consume_ammunition(ctx, request.actor, weapon);
        }

        let mut result =
            ActionResult::contested(outcome.success, outcome.test_value, outcome.difficulty);
        if !is_melee {
            result = result.with_effect(EffectTag::AmmoSpent);
        }

        if !outcome.success {
            result = result.describe("the attack misses");
            return self.riposte_counter(ctx, request.actor, target, result);
        }

        // Melee hits lock the pair in engagement.
        if is_melee && ctx.engagements.engage(request.actor, target) {
            result = result.with_effect(EffectTag::EngagementFormed);
        }

        let mut wounds: u8 = 1;
        if outcome.is_great {
            result = result.great();
            match weapon {
                Some(WeaponCategory::Blade) => {
                    wounds += 1;
                    result = result.with_effect(EffectTag::ExtraWound);
                }
                Some(WeaponCategory::Blunt) => {
                    if let Some(t) = ctx.roster.get_mut(target) {
                        t.set_condition(Condition::Staggered);
                    }
                    result = result.with_effect(EffectTag::ConditionSet(Condition::Staggered));
                }
                Some(WeaponCategory::Piercing | WeaponCategory::Bow | WeaponCategory::Crossbow) => {
                    result = result.with_effect(EffectTag::ArmorPierce);
                }
                _ => {}
            }
        }

        result = result
            .with_damage(wounds)
            .with_effect(EffectTag::WoundInflicted)
            .describe("the attack lands");

        let killed = self.inflict_wounds(ctx, Some(request.actor), target, wounds);

        // An axe killing blow grants a free follow-up swing.
        if killed && weapon == Some(WeaponCategory::Axe) {
            if let Some(next) = self.cleave_target(ctx, request.actor, target) {
                result = result.with_effect(EffectTag::Cleave);
                let follow = ActionRequest::new(request.actor, ActionKind::MeleeAttack, card)
                    .with_target(next);
                let _ = self.resolve_nested(ctx, &follow);
            }
        }

        result
    }

    /// Bow shots spend an arrow; crossbow shots expend the loaded bolt.
    /// Availability was verified before the test.
    fn consume_ammunition(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        actor: CombatantId,
        weapon: Option<WeaponCategory>,
    ) {
        if let Some(state) = ctx.roster.get_mut(actor) {
            match weapon {
                Some(WeaponCategory::Bow) => {
                    state.equipment.ammo = state.equipment.ammo.saturating_sub(1);
                }
                Some(WeaponCategory::Crossbow) => {
                    state.equipment.loaded = false;
                }
                _ => {}
            }
        }
    }

    /// A missed attack lets a prepared riposte counter immediately.
    fn riposte_counter(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        attacker: CombatantId,
        defender: CombatantId,
        result: ActionResult,
    ) -> ActionResult {
        let riposte = ctx.roster.get_mut(defender).and_then(|d| {
            let armed = d
                .prepared_defense
                .is_some_and(|p| p.kind == DefenseKind::Riposte);
            if armed {
                d.consume_defense()
            } else {
                None
            }
        });
        let Some(prepared) = riposte else {
            return result;
        };

        let counter = ActionRequest::new(defender, ActionKind::MeleeAttack, prepared.card)
            .with_target(attacker)
            .as_minor();
        let _ = self.resolve_nested(ctx, &counter);
        result.with_effect(EffectTag::RiposteTriggered)
    }

    /// Next living enemy sharing the felled target's zone, if any.
    fn cleave_target(
        &self,
        ctx: &ResolverContext<'_>,
        actor: CombatantId,
        felled: CombatantId,
    ) -> Option<CombatantId> {
        let actor_is_pc = ctx.roster.get(actor)?.is_pc;
        let zone = ctx.roster.get(felled)?.zone;
        ctx.roster
            .living_in_zone(zone)
            .find(|c| c.is_pc != actor_is_pc && c.id != felled)
            .map(|c| c.id)
    }
}
