//! The Challenge Controller: the turn/phase state machine.
//!
//! Owns the roster, the initiative tracker, the engagement registry, and
//! the resolver, and sequences a challenge through its phases. Two
//! suspension points exist: `VisualSync`, entered after every resolved
//! action and cleared only by [`ChallengeController::on_visual_complete`],
//! and `MinorWindow`, an indefinite pause cleared only by
//! [`ChallengeController::resume_from_minor_window`].
//!
//! ## Driving loop
//!
//! ```text
//! start_challenge -> PreRound
//! submit_initiative xN -> CountUp
//! advance_count -> AwaitingAction (or next round / end)
//! submit_action -> Resolving -> VisualSync
//! on_visual_complete -> MinorWindow
//! declare_minor_action* / resume_from_minor_window
//!   -> per-minor VisualSync/on_visual_complete -> turn ends
//! advance_count -> ...
//! ```

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{
    Card, ChallengeError, Combatant, CombatantId, Roster, COUNT_MAX,
};
use crate::events::{ChallengeEvent, EventBus};
use crate::resolve::{
    ActionKind, ActionRequest, ActionResolver, ActionResult, FateHook, FollowUp, ResolverContext,
};
use crate::zones::{EngagementRegistry, ZoneMap};

use super::initiative::InitiativeTracker;
use super::minor::{MinorDeclaration, MinorQueue};
use super::state::{ChallengeOutcome, ChallengePhase, ChallengeType};

/// State captured when a Fool interrupt preempts the machine, restored
/// after the interrupt's acknowledgement.
#[derive(Clone, Copy, Debug)]
struct InterruptSnapshot {
    phase: ChallengePhase,
    active: Option<CombatantId>,
}

/// The challenge state machine.
pub struct ChallengeController {
    phase: ChallengePhase,
    challenge_type: ChallengeType,
    roster: Roster,
    zones: ZoneMap,
    engagements: EngagementRegistry,
    initiative: InitiativeTracker,
    resolver: ActionResolver,
    bus: EventBus,
    round: u32,
    count: u8,
    /// Combatants still to act at the current count, PCs first.
    turn_queue: VecDeque<CombatantId>,
    active: Option<CombatantId>,
    last_result: Option<ActionResult>,
    minor_queue: MinorQueue,
    /// Set while queued minor declarations resolve one at a time.
    resolving_minors: bool,
    interrupt_return: Option<InterruptSnapshot>,
}

impl ChallengeController {
    /// Create an idle controller over a battlefield and an event bus.
    #[must_use]
    pub fn new(zones: ZoneMap, bus: EventBus) -> Self {
        Self {
            phase: ChallengePhase::Idle,
            challenge_type: ChallengeType::Combat,
            roster: Roster::new(),
            zones,
            engagements: EngagementRegistry::new(),
            initiative: InitiativeTracker::new(),
            resolver: ActionResolver::new(),
            bus,
            round: 0,
            count: 0,
            turn_queue: VecDeque::new(),
            active: None,
            last_result: None,
            minor_queue: MinorQueue::new(),
            resolving_minors: false,
            interrupt_return: None,
        }
    }

    // === Accessors ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    /// Current round (1-based; 0 while idle).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Current count-up value (0 before the first tick).
    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// The combatant whose turn it is, if any.
    #[must_use]
    pub fn active(&self) -> Option<CombatantId> {
        self.active
    }

    /// The roster of combatants.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The engagement registry.
    #[must_use]
    pub fn engagements(&self) -> &EngagementRegistry {
        &self.engagements
    }

    /// The most recent resolution result.
    #[must_use]
    pub fn last_result(&self) -> Option<&ActionResult> {
        self.last_result.as_ref()
    }

    /// Queued minor declarations.
    #[must_use]
    pub fn minor_declarations(&self) -> Vec<&MinorDeclaration> {
        self.minor_queue.pending().collect()
    }

    /// Bus access for subscribing listeners.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Install the Test-of-Fate collaborator on the resolver.
    pub fn set_fate_hook(&mut self, hook: Box<dyn FateHook>) {
        self.resolver.set_fate_hook(hook);
    }

    // === Lifecycle ===

    /// Start a challenge. Builds the roster, emits `ChallengeStart`, and
    /// opens round 1's initiative phase.
    pub fn start_challenge(
        &mut self,
        pcs: Vec<Combatant>,
        npcs: Vec<Combatant>,
        challenge_type: ChallengeType,
    ) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::Idle {
            return Err(ChallengeError::AlreadyActive);
        }
        if challenge_type == ChallengeType::Combat {
            if pcs.is_empty() {
                return Err(ChallengeError::NoPcs);
            }
            if npcs.is_empty() {
                return Err(ChallengeError::NoNpcs);
            }
        }

        self.phase = ChallengePhase::Starting;
        self.challenge_type = challenge_type;

        let pc_ids: Vec<CombatantId> = pcs.iter().map(|c| c.id).collect();
        let npc_ids: Vec<CombatantId> = npcs.iter().map(|c| c.id).collect();
        for combatant in pcs.into_iter().chain(npcs) {
            self.roster.add(combatant);
        }

        debug!(pcs = pc_ids.len(), npcs = npc_ids.len(), "challenge starting");
        self.bus.publish(ChallengeEvent::ChallengeStart {
            pcs: pc_ids,
            npcs: npc_ids,
            zones: self.zones.zone_ids(),
        });

        self.round = 1;
        self.begin_pre_round();
        Ok(())
    }

    /// End the challenge with an outcome. Always legal; resets to `Idle`.
    pub fn end_challenge(&mut self, outcome: ChallengeOutcome) {
        debug!(?outcome, rounds = self.round, "challenge ending");
        self.phase = ChallengePhase::Ending;
        self.bus.publish(ChallengeEvent::ChallengeEnd {
            outcome,
            rounds: self.round,
        });

        self.engagements.clear();
        self.initiative.clear();
        self.minor_queue.clear();
        self.resolver.end_round();
        self.turn_queue.clear();
        self.active = None;
        self.last_result = None;
        self.interrupt_return = None;
        self.resolving_minors = false;
        self.roster = Roster::new();
        self.round = 0;
        self.count = 0;
        self.phase = ChallengePhase::Idle;
    }

    /// Remove a combatant from the field.
    ///
    /// If no player characters remain the challenge ends as `Fled`; if no
    /// opposing combatants remain it ends as `Victory`.
    pub fn attempt_flee(&mut self, entity: CombatantId) -> Result<(), ChallengeError> {
        if self.roster.remove(entity).is_none() {
            return Err(ChallengeError::UnknownCombatant);
        }
        self.engagements.disengage_all(entity);
        self.initiative.remove(entity);
        self.resolver.bank_mut().forget(entity);
        self.turn_queue.retain(|&id| id != entity);

        if self.active == Some(entity) {
            self.finish_turn();
        }

        if self.roster.living_pcs().next().is_none() {
            self.end_challenge(ChallengeOutcome::Fled);
        } else if self.challenge_type == ChallengeType::Combat
            && self.roster.living_npcs().next().is_none()
        {
            self.end_challenge(ChallengeOutcome::Victory);
        }
        Ok(())
    }

    // === Initiative ===

    /// Submit a face-down initiative card for a combatant.
    ///
    /// Once every living combatant has submitted, the count-up clock is
    /// armed automatically.
    pub fn submit_initiative(
        &mut self,
        entity: CombatantId,
        card: Option<Card>,
    ) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::PreRound {
            return Err(ChallengeError::NotInPreRound);
        }
        let Some(card) = card else {
            return Err(ChallengeError::NoCard);
        };
        if !self.roster.contains(entity) {
            return Err(ChallengeError::UnknownCombatant);
        }

        self.initiative.submit(entity, card)?;
        self.bus
            .publish(ChallengeEvent::InitiativeSubmitted { entity });

        if self.initiative.all_submitted(&self.roster) {
            debug!(round = self.round, "all initiative in, count-up armed");
            self.count = 0;
            self.phase = ChallengePhase::CountUp;
        }
        Ok(())
    }

    /// Run the count-up clock forward until a combatant's turn begins,
    /// the round ends, or the challenge ends.
    pub fn advance_count(&mut self) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::CountUp {
            return Err(ChallengeError::NotInCountUp);
        }
        loop {
            if self.check_end_conditions() {
                return Ok(());
            }
            if self.count >= COUNT_MAX {
                self.round += 1;
                self.begin_pre_round();
                return Ok(());
            }

            self.count += 1;
            self.bus.publish(ChallengeEvent::CountUpTick {
                count: self.count,
                round: self.round,
            });

            let actors = self.initiative.actors_at_count(self.count, &self.roster);
            if !actors.is_empty() {
                self.turn_queue = actors.into();
                self.begin_next_turn();
                return Ok(());
            }
        }
    }

    // === Turns ===

    /// Submit the active combatant's action for resolution.
    ///
    /// The request must come from the active combatant. The result is
    /// stored, published, and the machine suspends in `VisualSync` until
    /// acknowledged.
    pub fn submit_action(&mut self, request: ActionRequest) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::AwaitingAction {
            return Err(ChallengeError::NotAwaitingAction);
        }
        let Some(active) = self.active else {
            return Err(ChallengeError::NoActiveEntity);
        };
        if request.actor != active {
            return Err(ChallengeError::NotYourTurn);
        }
        self.resolve_and_suspend(request);
        Ok(())
    }

    /// Acknowledge the pending visual. The single hook that un-blocks
    /// `VisualSync`.
    pub fn on_visual_complete(&mut self) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::VisualSync {
            return Err(ChallengeError::NotInVisualSync);
        }

        // A completed Fool interrupt restores the preempted state.
        if let Some(snapshot) = self.interrupt_return.take() {
            debug!("interrupt complete, restoring state");
            self.phase = snapshot.phase;
            self.active = snapshot.active;
            return Ok(());
        }

        if self.resolving_minors {
            self.step_minor_resolution();
            return Ok(());
        }

        // Main action acknowledged: open the minor-action window.
        self.phase = ChallengePhase::MinorWindow;
        self.bus.publish(ChallengeEvent::MinorActionWindow {
            count: self.count,
            round: self.round,
            paused: true,
        });
        Ok(())
    }

    // === Minor actions ===

    /// Queue a minor-action declaration.
    pub fn declare_minor_action(
        &mut self,
        declaration: MinorDeclaration,
    ) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::MinorWindow {
            return Err(ChallengeError::NotInMinorWindow);
        }
        if !self.roster.contains(declaration.entity) {
            return Err(ChallengeError::UnknownCombatant);
        }
        self.minor_queue.declare(declaration)
    }

    /// Withdraw a queued minor declaration by index.
    pub fn undeclare_minor_action(
        &mut self,
        index: usize,
    ) -> Result<MinorDeclaration, ChallengeError> {
        if self.phase != ChallengePhase::MinorWindow {
            return Err(ChallengeError::NotInMinorWindow);
        }
        self.minor_queue.undeclare(index)
    }

    /// Close the window and resolve queued declarations in FIFO order,
    /// each passing through its own `VisualSync`.
    pub fn resume_from_minor_window(&mut self) -> Result<(), ChallengeError> {
        if self.phase != ChallengePhase::MinorWindow {
            return Err(ChallengeError::NotInMinorWindow);
        }
        self.resolving_minors = true;
        self.step_minor_resolution();
        Ok(())
    }

    // === Fool interrupts ===

    /// Play the zero-value wildcard out of turn.
    ///
    /// Legal while the clock runs, while an action is awaited, or inside
    /// the minor window. The current state is snapshotted and restored
    /// after the interrupt's acknowledgement. Nested interrupts are
    /// rejected.
    pub fn play_fool_interrupt(
        &mut self,
        entity: CombatantId,
        card: Card,
        follow_up: Option<FollowUp>,
    ) -> Result<(), ChallengeError> {
        let interruptible = matches!(
            self.phase,
            ChallengePhase::CountUp | ChallengePhase::AwaitingAction | ChallengePhase::MinorWindow
        );
        if !interruptible || self.interrupt_return.is_some() {
            return Err(ChallengeError::CannotInterruptNow);
        }
        if !card.is_fool() {
            return Err(ChallengeError::NotTheFool);
        }
        if !self.roster.contains(entity) {
            return Err(ChallengeError::UnknownCombatant);
        }
        if follow_up.as_ref().is_some_and(|f| f.card.is_fool()) {
            return Err(ChallengeError::InvalidFoolInterrupt);
        }

        debug!(%entity, "fool interrupt");
        self.interrupt_return = Some(InterruptSnapshot {
            phase: self.phase,
            active: self.active,
        });
        self.active = Some(entity);

        let kind = follow_up.as_ref().map_or(ActionKind::Wait, |f| f.kind);
        let mut request = ActionRequest::new(entity, kind, card);
        if let Some(follow_up) = follow_up {
            request = request.with_follow_up(follow_up);
        }
        self.resolve_and_suspend(request);
        Ok(())
    }

    // === Internals ===

    fn begin_pre_round(&mut self) {
        self.count = 0;
        self.turn_queue.clear();
        self.active = None;
        self.initiative.clear();
        self.resolver.end_round();
        self.phase = ChallengePhase::PreRound;

        debug!(round = self.round, "initiative phase opens");
        self.bus.publish(ChallengeEvent::InitiativePhaseStart {
            round: self.round,
            combatants: self.roster.living().map(|c| c.id).collect(),
        });
    }

    /// Victory/defeat check, run before every count advance and round.
    fn check_end_conditions(&mut self) -> bool {
        if self.challenge_type != ChallengeType::Combat {
            return false;
        }
        if self.roster.living_npcs().next().is_none() {
            self.end_challenge(ChallengeOutcome::Victory);
            return true;
        }
        if self.roster.living_pcs().next().is_none() {
            self.end_challenge(ChallengeOutcome::Defeat);
            return true;
        }
        false
    }

    /// Start the next living combatant's turn from the turn queue, or
    /// hand the clock back to `CountUp`.
    fn begin_next_turn(&mut self) {
        while let Some(entity) = self.turn_queue.pop_front() {
            let Some(combatant) = self.roster.get(entity) else {
                continue;
            };
            if !combatant.is_alive() {
                continue;
            }
            let Some(slot) = self.initiative.slot(entity) else {
                continue;
            };

            debug!(%entity, count = self.count, "turn begins");
            self.active = Some(entity);
            self.phase = ChallengePhase::AwaitingAction;
            self.bus.publish(ChallengeEvent::ChallengeTurnStart {
                count: self.count,
                round: self.round,
                entity,
                is_pc: combatant.is_pc,
                initiative_card: slot.card,
            });
            return;
        }
        self.phase = ChallengePhase::CountUp;
    }

    fn finish_turn(&mut self) {
        if let Some(entity) = self.active.take() {
            self.bus.publish(ChallengeEvent::ChallengeTurnEnd {
                count: self.count,
                round: self.round,
                entity,
            });
        }
        self.minor_queue.clear();
        self.resolving_minors = false;
        self.begin_next_turn();
    }

    /// Resolve the next queued minor declaration, or complete the turn.
    fn step_minor_resolution(&mut self) {
        match self.minor_queue.pop_next() {
            Some(declaration) => {
                let mut request =
                    ActionRequest::new(declaration.entity, declaration.kind, declaration.card)
                        .as_minor();
                request.target = declaration.target;
                self.resolve_and_suspend(request);
            }
            None => self.finish_turn(),
        }
    }

    /// Publish, resolve, store, publish, suspend.
    fn resolve_and_suspend(&mut self, request: ActionRequest) {
        self.phase = ChallengePhase::Resolving;
        self.bus.publish(ChallengeEvent::ChallengeAction {
            action: request.clone(),
        });

        let mut ctx = ResolverContext {
            roster: &mut self.roster,
            zones: &self.zones,
            engagements: &mut self.engagements,
            initiative: &mut self.initiative,
            bus: &mut self.bus,
            challenge_active: true,
        };
        let result = self.resolver.resolve(&mut ctx, &request);

        debug!(
            actor = %request.actor,
            kind = %request.kind,
            success = result.success,
            "action resolved"
        );
        self.last_result = Some(result.clone());
        self.bus.publish(ChallengeEvent::ChallengeResolution {
            action: request,
            result,
        });
        self.phase = ChallengePhase::VisualSync;
    }
}

impl std::fmt::Debug for ChallengeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeController")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("count", &self.count)
            .field("active", &self.active)
            .field("roster", &self.roster.len())
            .finish()
    }
}
