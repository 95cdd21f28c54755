//! The Action Resolver: computes the mechanical outcome of every action.
//!
//! `resolve` fails soft — invalid input yields an `ActionResult` with
//! `success = false` and a reason in the description, never an error.
//! The resolver is stateless per call apart from the round-scoped
//! [`RoundBank`] and an injected Test-of-Fate hook.
//!
//! ## Resolution pipeline
//!
//! 1. Validate input, prerequisites, and category preconditions
//!    (ranged-while-engaged, equipment, targets, reach, ammunition)
//! 2. Route the zero-value wildcard to the Fool handler
//! 3. Route fate-bound kinds to the Test-of-Fate collaborator
//! 4. Compute test value (card + attribute + banked aid + mob rule)
//! 5. Compute difficulty (baseline / initiative / morale, dodge adjusted)
//! 6. Compare with the tie rules (shield negates, flail overrides)
//! 7. Dispatch to the category handler for side effects

use smallvec::SmallVec;
use tracing::debug;

use crate::challenge::InitiativeTracker;
use crate::core::{
    Card, CombatantId, DefenseKind, Roster, Suit, WeaponCategory,
};
use crate::events::{ChallengeEvent, EventBus};
use crate::zones::{EngagementRegistry, ZoneId, ZoneMap};

use super::action::{
    ActionCategory, ActionKind, ActionRequest, ActionResult, EffectTag, Opposition,
};
use super::support::RoundBank;

/// Hard cap on nested resolution (riposte counters, cleaves, Fool and
/// vigilance follow-ups). Guarantees termination.
pub const MAX_NESTING: u8 = 3;

/// Fixed difficulty for undirected actions.
pub const UNDIRECTED_DIFFICULTY: i32 = 10;

/// External Test-of-Fate collaborator.
///
/// Fate-bound actions hand resolution off here and come back pending.
pub trait FateHook {
    /// Request an out-of-band test for the actor.
    fn request_test(&mut self, actor: CombatantId, suit: Option<Suit>, difficulty: i32);
}

/// Mutable world view the resolver works against.
///
/// The controller assembles one per call from the state it owns; tests
/// can assemble one directly.
pub struct ResolverContext<'a> {
    pub roster: &'a mut Roster,
    pub zones: &'a ZoneMap,
    pub engagements: &'a mut EngagementRegistry,
    pub initiative: &'a mut InitiativeTracker,
    pub bus: &'a mut EventBus,
    /// Gates the Test-of-Fate routing: only active challenges defer.
    pub challenge_active: bool,
}

/// Outcome of the generic test, handed to the category handlers.
pub(super) struct TestOutcome {
    pub success: bool,
    pub is_great: bool,
    pub test_value: i32,
    pub difficulty: i32,
    /// Effects accrued before dispatch (dodge consumed, aid spent, favor).
    pub pre_effects: SmallVec<[EffectTag; 4]>,
}

/// The stateless-per-call action resolution engine.
#[derive(Default)]
pub struct ActionResolver {
    bank: RoundBank,
    fate: Option<Box<dyn FateHook>>,
    depth: u8,
}

impl ActionResolver {
    /// Create a resolver with no fate hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the Test-of-Fate collaborator.
    pub fn set_fate_hook(&mut self, hook: Box<dyn FateHook>) {
        self.fate = Some(hook);
    }

    /// The round-scoped arena (banked aid, armed vigilance).
    #[must_use]
    pub fn bank(&self) -> &RoundBank {
        &self.bank
    }

    /// Mutable arena access, for the controller's round boundary.
    pub fn bank_mut(&mut self) -> &mut RoundBank {
        &mut self.bank
    }

    /// Clear round-scoped state. Called by the controller between rounds.
    pub fn end_round(&mut self) {
        self.bank.clear();
    }

    /// Resolve an action. Never fails hard.
    pub fn resolve(&mut self, ctx: &mut ResolverContext<'_>, request: &ActionRequest) -> ActionResult {
        self.depth = 0;
        self.resolve_inner(ctx, request)
    }

    /// Depth-bounded nested resolution (ripostes, cleaves, follow-ups).
    pub(super) fn resolve_nested(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        if self.depth >= MAX_NESTING {
            return ActionResult::failure("nested resolution limit reached");
        }
        self.depth += 1;
        let result = self.resolve_inner(ctx, request);
        self.depth -= 1;
        result
    }

    fn resolve_inner(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        // 1. Validate input.
        let Some(card) = request.card else {
            return ActionResult::failure("no card was played");
        };
        if !ctx.roster.contains(request.actor) {
            return ActionResult::failure("actor is not part of the challenge");
        }

        // 2. The zero-value wildcard routes to the Fool handler.
        if card.is_fool() {
            return self.resolve_fool(ctx, request);
        }

        if request.kind.is_ranged() && ctx.engagements.is_engaged(request.actor) {
            return ActionResult::failure("Cannot use ranged weapons while engaged");
        }
        if let Some(failure) = self.check_requirements(ctx, request) {
            return failure;
        }
        // Category preconditions run before the test: an invalid request
        // must not consume a prepared dodge, banked aid, or ammunition.
        if let Some(failure) = self.validate_category(ctx, request) {
            return failure;
        }

        // 3. Fate-bound kinds defer to the collaborator, when one is
        // installed and a challenge is active.
        if request.kind.is_fate_bound() && ctx.challenge_active && self.fate.is_some() {
            return self.defer_to_fate(ctx, request, card);
        }

        // 4-6. Generic test.
        let outcome = self.run_test(ctx, request, card);
        debug!(
            actor = %request.actor,
            kind = %request.kind,
            test = outcome.test_value,
            difficulty = outcome.difficulty,
            success = outcome.success,
            "action tested"
        );

        // 7. Category dispatch.
        let mut result = match request.kind.category() {
            ActionCategory::Swords => self.resolve_swords(ctx, request, card, &outcome),
            ActionCategory::Pentacles => self.resolve_pentacles(ctx, request, card, &outcome),
            ActionCategory::Cups => self.resolve_cups(ctx, request, card, &outcome),
            ActionCategory::Wands => self.resolve_wands(ctx, request, card, &outcome),
            ActionCategory::Misc => self.resolve_misc(ctx, request, card, &outcome),
        };

        // Pre-dispatch effects come first in the recorded order.
        let mut effects = outcome.pre_effects;
        effects.extend(result.effects.drain(..));
        result.effects = effects;
        result
    }

    // === Validation ===

    /// Per-category preconditions, checked before any state is consumed.
    fn validate_category(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        match request.kind.category() {
            ActionCategory::Swords => self.validate_swords(ctx, request),
            ActionCategory::Pentacles => self.validate_pentacles(ctx, request),
            ActionCategory::Cups => self.validate_cups(ctx, request),
            ActionCategory::Wands => self.validate_wands(ctx, request),
            ActionCategory::Misc => None,
        }
    }

    fn check_requirements(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<ActionResult> {
        let actor = ctx.roster.get(request.actor)?;
        let req = request.kind.requirements();

        if req.ranged_weapon {
            let ranged = actor
                .equipment
                .weapon
                .as_ref()
                .is_some_and(|w| w.category.is_ranged());
            if !ranged {
                return Some(ActionResult::failure("requires a ranged weapon"));
            }
        }
        if req.melee_weapon {
            let melee = actor
                .equipment
                .weapon
                .as_ref()
                .is_some_and(|w| !w.category.is_ranged());
            if !melee {
                return Some(ActionResult::failure("requires a melee weapon"));
            }
        }
        if req.shield && !actor.equipment.shield {
            return Some(ActionResult::failure("requires a shield"));
        }
        if req.companion && !actor.equipment.companion {
            return Some(ActionResult::failure("requires a companion"));
        }
        if req.consumable && actor.equipment.consumables == 0 {
            return Some(ActionResult::failure("requires a consumable"));
        }
        None
    }

    fn defer_to_fate(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
    ) -> ActionResult {
        let difficulty = match request.kind.opposition() {
            Opposition::Initiative => request
                .target
                .map_or(UNDIRECTED_DIFFICULTY, |t| ctx.initiative.opposed_difficulty(t)),
            _ => UNDIRECTED_DIFFICULTY,
        };
        if let Some(hook) = self.fate.as_mut() {
            hook.request_test(request.actor, Some(card.suit), difficulty);
        }
        ActionResult::failure("awaiting test of fate").with_effect(EffectTag::FatePending)
    }

    // === The generic test ===

    fn run_test(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
        card: Card,
    ) -> TestOutcome {
        let mut pre_effects: SmallVec<[EffectTag; 4]> = SmallVec::new();
        let opposition = request.kind.opposition();

        // Auto actions skip the test entirely.
        if matches!(opposition, Opposition::Auto) {
            return TestOutcome {
                success: true,
                is_great: false,
                test_value: 0,
                difficulty: 0,
                pre_effects,
            };
        }

        // Test value: card + attribute modifier + banked aid + mob rule.
        let modifier = if request.minor || request.kind.is_defense_only() {
            0
        } else {
            request
                .kind
                .governing_suit()
                .map_or(0, |suit| {
                    ctx.roster
                        .get(request.actor)
                        .map_or(0, |a| i32::from(a.attribute(suit)))
                })
        };
        let mut test_value = i32::from(card.value) + modifier;

        if let Some(bonus) = self.bank.take_aid(request.actor) {
            test_value += bonus;
            pre_effects.push(EffectTag::AidSpent);
        }

        let target = self.effective_target(ctx, request);
        let is_attack = matches!(request.kind.category(), ActionCategory::Swords);

        // The mob rule belongs to non-player combatants only.
        let npc_actor = ctx
            .roster
            .get(request.actor)
            .is_some_and(|a| !a.is_pc);
        if is_attack && npc_actor {
            if let Some(target_id) = target {
                let mob = self.mob_allies(ctx, request.actor, target_id);
                if mob >= 1 {
                    test_value += mob as i32;
                    pre_effects.push(EffectTag::Favor);
                }
                if mob >= 2 {
                    pre_effects.push(EffectTag::ArmorPierce);
                }
            }
        }

        // Difficulty.
        let mut difficulty = match opposition {
            Opposition::Undirected => UNDIRECTED_DIFFICULTY,
            Opposition::Initiative => match target {
                Some(target_id) => {
                    if ctx.initiative.reveal(target_id) {
                        ctx.bus
                            .publish(ChallengeEvent::InitiativeRevealed { entity: target_id });
                    }
                    ctx.initiative.opposed_difficulty(target_id)
                }
                // No opponent: fall back to the undirected baseline.
                None => UNDIRECTED_DIFFICULTY,
            },
            Opposition::Morale { hard } => {
                let base = target
                    .and_then(|t| ctx.roster.get(t))
                    .and_then(|t| t.morale.map(|m| m + t.disposition.modifier()));
                match base {
                    Some(morale) => morale + i32::from(hard),
                    // Validation already rejected morale-less targets.
                    None => i32::MAX,
                }
            }
            Opposition::Auto => unreachable!("handled above"),
        };

        // A consumed dodge raises the defender's initiative and may still
        // make the attack miss.
        if is_attack {
            if let Some(target_id) = target {
                if let Some(defender) = ctx.roster.get_mut(target_id) {
                    let dodging = defender
                        .prepared_defense
                        .is_some_and(|d| d.kind == DefenseKind::Dodge);
                    if dodging {
                        if let Some(dodge) = defender.consume_defense() {
                            difficulty += i32::from(dodge.card.value);
                            pre_effects.push(EffectTag::DodgeConsumed);
                        }
                    }
                }
            }
        }

        let success = self.compare(ctx, request, target, test_value, difficulty);

        // Great Success: face card and a matching attribute of 2+.
        let is_great = card.is_face()
            && ctx
                .roster
                .get(request.actor)
                .is_some_and(|a| a.attribute(card.suit) >= 2);

        TestOutcome {
            success,
            is_great,
            test_value,
            difficulty,
            pre_effects,
        }
    }

    /// Opposed comparison with the tie rules.
    ///
    /// A tie favors the actor unless the defender is shield-equipped; a
    /// flail overrides that losing tie back into a success.
    fn compare(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
        target: Option<CombatantId>,
        test_value: i32,
        difficulty: i32,
    ) -> bool {
        if test_value > difficulty {
            return true;
        }
        if test_value < difficulty {
            return false;
        }

        let defender_shield = target
            .and_then(|t| ctx.roster.get(t))
            .is_some_and(|t| t.equipment.shield);
        if !defender_shield {
            return true;
        }
        ctx.roster
            .get(request.actor)
            .and_then(|a| a.equipment.weapon.as_ref())
            .is_some_and(|w| w.category == WeaponCategory::Flail)
    }

    /// The declared target, defaulting to the first engagement partner
    /// for escape contests.
    fn effective_target(
        &self,
        ctx: &ResolverContext<'_>,
        request: &ActionRequest,
    ) -> Option<CombatantId> {
        if request.target.is_some() {
            return request.target;
        }
        if matches!(request.kind, ActionKind::Avoid | ActionKind::Dash) {
            return ctx.engagements.partners_of(request.actor).first().copied();
        }
        None
    }

    /// Living same-side allies of the actor in the target's zone.
    fn mob_allies(
        &self,
        ctx: &ResolverContext<'_>,
        actor: CombatantId,
        target: CombatantId,
    ) -> usize {
        let Some(target_zone) = ctx.roster.get(target).map(|t| t.zone) else {
            return 0;
        };
        ctx.roster.allies_in_zone(actor, target_zone).count()
    }

    // === The Fool ===

    fn resolve_fool(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        request: &ActionRequest,
    ) -> ActionResult {
        let awaiting = request.follow_up.is_none();
        ctx.bus.publish(ChallengeEvent::FoolInterrupt {
            entity: request.actor,
            awaiting_follow_up: awaiting,
        });

        let Some(follow_up) = request.follow_up.as_deref() else {
            return ActionResult::auto("the Fool hangs in the air, awaiting a follow-up")
                .with_effect(EffectTag::FoolPlayed)
                .with_effect(EffectTag::AwaitingFollowUp);
        };

        let mut bundled = ActionRequest::new(request.actor, follow_up.kind, follow_up.card);
        bundled.target = follow_up.target;
        bundled.destination = follow_up.destination;

        let mut inner = self.resolve_nested(ctx, &bundled);
        let mut effects: SmallVec<[EffectTag; 4]> = SmallVec::new();
        effects.push(EffectTag::FoolPlayed);
        effects.extend(inner.effects.drain(..));
        inner.effects = effects;
        inner.description = format!("the Fool: {}", inner.description);
        inner
    }

    // === Shared side-effect helpers (used by the category handlers) ===

    /// Inflict wounds, publishing `WoundTaken` and `EntityDefeated`.
    ///
    /// Returns `true` if this was the killing blow.
    pub(super) fn inflict_wounds(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        source: Option<CombatantId>,
        victim: CombatantId,
        wounds: u8,
    ) -> bool {
        let Some(target) = ctx.roster.get_mut(victim) else {
            return false;
        };
        let killed = target.take_wounds(wounds);
        ctx.bus.publish(ChallengeEvent::WoundTaken {
            entity: victim,
            wounds,
            source,
        });
        if killed {
            ctx.bus.publish(ChallengeEvent::EntityDefeated { entity: victim });
            ctx.engagements.disengage_all(victim);
            self.bank.forget(victim);
        }
        killed
    }

    /// Parting blows from every engaged partner, then break engagement.
    ///
    /// Returns `true` if at least one blow landed.
    pub(super) fn parting_blows(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        mover: CombatantId,
    ) -> bool {
        let partners = ctx.engagements.disengage_all(mover);
        let mut struck = false;
        for attacker in partners {
            if ctx.roster.get(attacker).is_some_and(|a| a.is_alive()) {
                ctx.bus.publish(ChallengeEvent::PartingBlow {
                    attacker,
                    victim: mover,
                });
                self.inflict_wounds(ctx, Some(attacker), mover, 1);
                struck = true;
            }
        }
        struck
    }

    /// Relocate a combatant and fire any matching vigilance reactions.
    ///
    /// Returns `true` if at least one held reaction fired.
    pub(super) fn relocate(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        mover: CombatantId,
        destination: ZoneId,
    ) -> bool {
        let Some(old_zone) = ctx.roster.get(mover).map(|c| c.zone) else {
            return false;
        };
        if let Some(combatant) = ctx.roster.get_mut(mover) {
            combatant.zone = destination;
        }
        self.fire_vigilance(ctx, mover, old_zone, destination)
    }

    /// Fire armed vigilance follow-ups triggered by a zone change.
    fn fire_vigilance(
        &mut self,
        ctx: &mut ResolverContext<'_>,
        mover: CombatantId,
        old_zone: ZoneId,
        new_zone: ZoneId,
    ) -> bool {
        use super::action::VigilanceTrigger;

        let mover_is_pc = match ctx.roster.get(mover) {
            Some(c) => c.is_pc,
            None => return false,
        };
        let mut fired = false;

        let candidates: Vec<(CombatantId, VigilanceTrigger)> = {
            let entered = self.bank.watchers_for(VigilanceTrigger::EnemyEntersZone);
            let left = self.bank.watchers_for(VigilanceTrigger::EnemyLeavesZone);
            entered
                .into_iter()
                .map(|w| (w, VigilanceTrigger::EnemyEntersZone))
                .chain(left.into_iter().map(|w| (w, VigilanceTrigger::EnemyLeavesZone)))
                .collect()
        };

        for (watcher, trigger) in candidates {
            let Some(watcher_state) = ctx.roster.get(watcher) else {
                continue;
            };
            if watcher_state.is_pc == mover_is_pc || !watcher_state.is_alive() {
                continue;
            }
            let zone_matches = match trigger {
                VigilanceTrigger::EnemyEntersZone => watcher_state.zone == new_zone,
                VigilanceTrigger::EnemyLeavesZone => watcher_state.zone == old_zone,
            };
            if !zone_matches {
                continue;
            }
            let Some(armed) = self.bank.take_vigilance(watcher) else {
                continue;
            };
            debug!(watcher = %watcher, mover = %mover, "vigilance fires");
            let mut reaction = ActionRequest::new(watcher, armed.kind, armed.card);
            reaction.target = Some(armed.target.unwrap_or(mover));
            let _ = self.resolve_nested(ctx, &reaction);
            fired = true;
        }
        fired
    }
}

impl std::fmt::Debug for ActionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionResolver")
            .field("bank", &self.bank)
            .field("fate", &self.fate.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}
