//! Action Resolver rules: tests, ties, defenses, maneuvers, and edge cases.

use std::cell::RefCell;
use std::rc::Rc;

use tarot_tactics::{
    ActionKind, ActionRequest, ActionResolver, ActionResult, Attributes, Card, Combatant,
    CombatantId, Condition, DefenseKind, Disposition, EffectTag, EngagementRegistry, EventBus,
    EventLog, FateHook, FollowUp, InitiativeTracker, ResolverContext, Roster, Suit,
    VigilanceTrigger, Weapon, WeaponCategory, ZoneId, ZoneMap, AID_BONUS,
};

const NEAR: ZoneId = ZoneId::new(0);
const FAR: ZoneId = ZoneId::new(1);

struct World {
    roster: Roster,
    zones: ZoneMap,
    engagements: EngagementRegistry,
    initiative: InitiativeTracker,
    bus: EventBus,
}

impl World {
    fn new() -> Self {
        Self {
            roster: Roster::new(),
            zones: ZoneMap::pair(),
            engagements: EngagementRegistry::new(),
            initiative: InitiativeTracker::new(),
            bus: EventBus::new(),
        }
    }

    fn ctx(&mut self) -> ResolverContext<'_> {
        ResolverContext {
            roster: &mut self.roster,
            zones: &self.zones,
            engagements: &mut self.engagements,
            initiative: &mut self.initiative,
            bus: &mut self.bus,
            challenge_active: true,
        }
    }

    fn resolve(&mut self, resolver: &mut ActionResolver, request: &ActionRequest) -> ActionResult {
        let mut ctx = self.ctx();
        resolver.resolve(&mut ctx, request)
    }
}

fn pc(id: u32, attributes: Attributes) -> Combatant {
    Combatant::new(CombatantId::new(id), format!("pc{id}"), true, NEAR, attributes)
}

fn npc(id: u32, attributes: Attributes) -> Combatant {
    Combatant::new(CombatantId::new(id), format!("npc{id}"), false, NEAR, attributes)
}

const A: CombatantId = CombatantId::new(1);
const B: CombatantId = CombatantId::new(2);
const C: CombatantId = CombatantId::new(3);

/// Captures every Test-of-Fate request for later assertions.
struct RecordingFate {
    calls: Rc<RefCell<Vec<(CombatantId, Option<Suit>, i32)>>>,
}

impl FateHook for RecordingFate {
    fn request_test(&mut self, actor: CombatantId, suit: Option<Suit>, difficulty: i32) {
        self.calls.borrow_mut().push((actor, suit, difficulty));
    }
}

/// Attacker with swords 2, defender NPC with a submitted initiative of 5.
fn duel() -> World {
    let mut world = World::new();
    world.roster.add(pc(1, Attributes::new(2, 0, 0, 0)));
    world.roster.add(npc(2, Attributes::default()));
    world
        .initiative
        .submit(B, Card::minor(Suit::Swords, 5))
        .unwrap();
    world
}

#[test]
fn test_melee_hit_engages_and_wounds() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert_eq!(result.test_value, 12); // card 10 + swords 2
    assert_eq!(result.difficulty, 5);
    assert_eq!(result.damage_dealt, 1);
    assert!(result.has_effect(&EffectTag::WoundInflicted));
    assert!(result.has_effect(&EffectTag::EngagementFormed));
    assert!(world.engagements.is_engaged_with(A, B));
    assert_eq!(world.roster.get(B).unwrap().wounds(), 1);
    // Being targeted turned the defender's slot face-up.
    assert!(world.initiative.slot(B).unwrap().revealed);
}

#[test]
fn test_melee_needs_same_zone() {
    let mut world = duel();
    world.roster.get_mut(B).unwrap().zone = FAR;
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("reach"));
    assert_eq!(world.roster.get(B).unwrap().wounds(), 0);
}

#[test]
fn test_out_of_reach_attack_consumes_nothing() {
    let mut world = duel();
    world.roster.get_mut(B).unwrap().zone = FAR;
    world
        .roster
        .get_mut(B)
        .unwrap()
        .arm_defense(DefenseKind::Dodge, Card::minor(Suit::Cups, 9));
    let mut resolver = ActionResolver::new();
    resolver.bank_mut().bank_aid(A, AID_BONUS);

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("reach"));
    // The doomed swing burned nothing: dodge held, aid banked, slot
    // still face-down.
    assert!(world.roster.get(B).unwrap().prepared_defense.is_some());
    assert_eq!(resolver.bank().aid_for(A), Some(AID_BONUS));
    assert!(!world.initiative.slot(B).unwrap().revealed);
    assert!(!result.has_effect(&EffectTag::DodgeConsumed));
    assert!(!result.has_effect(&EffectTag::AidSpent));
}

#[test]
fn test_empty_bow_keeps_the_defenders_dodge() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("bow", WeaponCategory::Bow));
    world
        .roster
        .get_mut(B)
        .unwrap()
        .arm_defense(DefenseKind::Dodge, Card::minor(Suit::Cups, 9));
    let mut resolver = ActionResolver::new();

    let shot = ActionRequest::new(A, ActionKind::MissileAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &shot);

    assert!(!result.success);
    assert!(result.description.contains("ammunition"));
    assert!(world.roster.get(B).unwrap().prepared_defense.is_some());
}

#[test]
fn test_ranged_while_engaged_fails() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("bow", WeaponCategory::Bow));
    world.roster.get_mut(A).unwrap().equipment.ammo = 3;
    world.engagements.engage(A, B);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MissileAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("engaged"));
}

#[test]
fn test_no_card_fails_soft() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let mut request =
        ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 5));
    request.card = None;
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("no card"));
}

#[test]
fn test_tie_favors_attacker_unless_shielded() {
    // Test value 12 against initiative 12.
    let tie_attack = || {
        ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
            .with_target(B)
    };
    let tied_world = || {
        let mut world = World::new();
        world.roster.add(pc(1, Attributes::new(2, 0, 0, 0)));
        world.roster.add(npc(2, Attributes::default()));
        world
            .initiative
            .submit(B, Card::minor(Suit::Swords, 12))
            .unwrap();
        world
    };

    let mut world = tied_world();
    let mut resolver = ActionResolver::new();
    assert!(world.resolve(&mut resolver, &tie_attack()).success);

    // Shield negates the attacker's tie advantage.
    let mut world = tied_world();
    world.roster.get_mut(B).unwrap().equipment.shield = true;
    let mut resolver = ActionResolver::new();
    assert!(!world.resolve(&mut resolver, &tie_attack()).success);

    // A flail turns the losing tie back into a success.
    let mut world = tied_world();
    world.roster.get_mut(B).unwrap().equipment.shield = true;
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("flail", WeaponCategory::Flail));
    let mut resolver = ActionResolver::new();
    assert!(world.resolve(&mut resolver, &tie_attack()).success);
}

#[test]
fn test_dodge_raises_difficulty_and_is_consumed() {
    let mut world = duel();
    world
        .roster
        .get_mut(B)
        .unwrap()
        .arm_defense(DefenseKind::Dodge, Card::minor(Suit::Cups, 9));
    let mut resolver = ActionResolver::new();

    // Test 12 vs initiative 5 + dodge 9 = 14: the attack now misses.
    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert_eq!(result.difficulty, 14);
    assert!(result.has_effect(&EffectTag::DodgeConsumed));
    assert!(world.roster.get(B).unwrap().prepared_defense.is_none());

    // The dodge is gone; the same attack now lands.
    let result = world.resolve(&mut resolver, &request);
    assert!(result.success);
}

#[test]
fn test_riposte_counters_a_miss() {
    let mut world = duel();
    world
        .roster
        .get_mut(B)
        .unwrap()
        .arm_defense(DefenseKind::Riposte, Card::minor(Suit::Swords, 10));
    // Attacker's own initiative, contested by the counter-attack.
    world
        .initiative
        .submit(A, Card::minor(Suit::Swords, 2))
        .unwrap();
    let mut resolver = ActionResolver::new();

    // Card 2 + swords 2 = 4 vs 5: a miss.
    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 2))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.has_effect(&EffectTag::RiposteTriggered));
    // Counter: riposte card 10 vs attacker initiative 2.
    assert_eq!(world.roster.get(A).unwrap().wounds(), 1);
    assert!(world.roster.get(B).unwrap().prepared_defense.is_none());
}

#[test]
fn test_defense_cannot_be_stacked() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let first = ActionRequest::new(A, ActionKind::PrepareDodge, Card::minor(Suit::Cups, 4));
    assert!(world.resolve(&mut resolver, &first).success);

    let second = ActionRequest::new(A, ActionKind::PrepareRiposte, Card::minor(Suit::Cups, 6));
    let result = world.resolve(&mut resolver, &second);
    assert!(!result.success);
    assert!(result.description.contains("already prepared"));
}

#[test]
fn test_aid_applies_to_exactly_one_action() {
    let mut world = duel();
    world.roster.add(pc(3, Attributes::new(0, 0, 2, 0)));
    let mut resolver = ActionResolver::new();

    // C aids A: cups 10 + 2 = 12 vs baseline 10.
    let aid = ActionRequest::new(C, ActionKind::AidAnother, Card::minor(Suit::Cups, 10))
        .with_target(A);
    let result = world.resolve(&mut resolver, &aid);
    assert!(result.success);
    assert!(result.has_effect(&EffectTag::AidBanked));

    // A's next attack gets +2.
    let attack = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 3))
        .with_target(B);
    let result = world.resolve(&mut resolver, &attack);
    assert_eq!(result.test_value, 7); // 3 + 2 attr + 2 aid
    assert!(result.has_effect(&EffectTag::AidSpent));

    // Absent thereafter.
    let result = world.resolve(&mut resolver, &attack);
    assert_eq!(result.test_value, 5);
    assert!(!result.has_effect(&EffectTag::AidSpent));
}

#[test]
fn test_great_success_needs_face_card_and_attribute() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("longsword", WeaponCategory::Blade));
    let mut resolver = ActionResolver::new();

    // Face card + swords 2: great, and a blade adds an extra wound.
    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 12))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);
    assert!(result.is_great);
    assert_eq!(result.damage_dealt, 2);
    assert!(result.has_effect(&EffectTag::ExtraWound));

    // Same card, attribute below 2: not great.
    world.roster.get_mut(A).unwrap().attributes = Attributes::new(1, 0, 0, 0);
    world.roster.get_mut(B).unwrap().heal_wound();
    world.roster.get_mut(B).unwrap().heal_wound();
    let result = world.resolve(&mut resolver, &request);
    assert!(result.success);
    assert!(!result.is_great);
    assert_eq!(result.damage_dealt, 1);
}

#[test]
fn test_blunt_great_staggers() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("maul", WeaponCategory::Blunt));
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 13))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.is_great);
    assert!(result.has_effect(&EffectTag::ConditionSet(Condition::Staggered)));
    assert!(world.roster.get(B).unwrap().has_condition(Condition::Staggered));
}

#[test]
fn test_axe_killing_blow_cleaves() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("axe", WeaponCategory::Axe));
    // One wound left on B; C stands in the same zone.
    let mut resolver = ActionResolver::new();
    world.roster.get_mut(B).unwrap().take_wounds(2);
    world.roster.add(npc(3, Attributes::default()));
    world
        .initiative
        .submit(C, Card::minor(Suit::Swords, 3))
        .unwrap();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::Cleave));
    assert!(!world.roster.get(B).unwrap().is_alive());
    // The free swing carried over to C: card 10 + 2 vs initiative 3.
    assert_eq!(world.roster.get(C).unwrap().wounds(), 1);
}

#[test]
fn test_mob_rule_bonuses() {
    let mut world = World::new();
    // NPC attacker with NPC allies piling onto a PC target.
    world.roster.add(npc(1, Attributes::default()));
    world.roster.add(pc(2, Attributes::default()));
    world.roster.add(npc(3, Attributes::default()));
    world
        .initiative
        .submit(B, Card::minor(Suit::Swords, 5))
        .unwrap();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 6))
        .with_target(B);

    // One ally in the target's zone: +1 and favor.
    let result = world.resolve(&mut resolver, &request);
    assert_eq!(result.test_value, 7);
    assert!(result.has_effect(&EffectTag::Favor));
    assert!(!result.has_effect(&EffectTag::ArmorPierce));

    // Two allies: +2 and armor-pierce unlocked.
    world.roster.add(npc(4, Attributes::default()));
    let result = world.resolve(&mut resolver, &request);
    assert_eq!(result.test_value, 8);
    assert!(result.has_effect(&EffectTag::ArmorPierce));
}

#[test]
fn test_mob_rule_never_applies_to_pcs() {
    let mut world = World::new();
    // PC attacker with a PC ally in the target's zone.
    world.roster.add(pc(1, Attributes::default()));
    world.roster.add(npc(2, Attributes::default()));
    world.roster.add(pc(3, Attributes::default()));
    world
        .initiative
        .submit(B, Card::minor(Suit::Swords, 5))
        .unwrap();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 6))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert_eq!(result.test_value, 6); // no mob bonus
    assert!(!result.has_effect(&EffectTag::Favor));
    assert!(!result.has_effect(&EffectTag::ArmorPierce));
}

#[test]
fn test_bow_ammo_and_crossbow_load() {
    let mut world = duel();
    world.roster.get_mut(B).unwrap().zone = FAR;
    let mut resolver = ActionResolver::new();

    let shot = ActionRequest::new(A, ActionKind::MissileAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);

    // Bow with no arrows.
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("bow", WeaponCategory::Bow));
    let result = world.resolve(&mut resolver, &shot);
    assert!(!result.success);
    assert!(result.description.contains("ammunition"));

    world.roster.get_mut(A).unwrap().equipment.ammo = 1;
    let result = world.resolve(&mut resolver, &shot);
    assert!(result.success);
    assert_eq!(world.roster.get(A).unwrap().equipment.ammo, 0);

    // Crossbow: unloaded, then reload, then shoot unloads again.
    world.roster.get_mut(A).unwrap().equipment.weapon =
        Some(Weapon::new("arbalest", WeaponCategory::Crossbow));
    let result = world.resolve(&mut resolver, &shot);
    assert!(!result.success);
    assert!(result.description.contains("loaded"));

    let reload = ActionRequest::new(A, ActionKind::Reload, Card::minor(Suit::Pentacles, 1));
    assert!(world.resolve(&mut resolver, &reload).success);
    assert!(world.roster.get(A).unwrap().equipment.loaded);

    let result = world.resolve(&mut resolver, &shot);
    assert!(result.success);
    assert!(!world.roster.get(A).unwrap().equipment.loaded);
}

#[test]
fn test_trip_disarm_grapple_conditions() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().attributes = Attributes::new(0, 2, 0, 0);
    world.roster.get_mut(B).unwrap().equipment.weapon =
        Some(Weapon::new("club", WeaponCategory::Blunt));
    let mut resolver = ActionResolver::new();
    let card = Card::minor(Suit::Pentacles, 9);

    let result = world.resolve(
        &mut resolver,
        &ActionRequest::new(A, ActionKind::Trip, card).with_target(B),
    );
    assert!(result.success);
    assert!(world.roster.get(B).unwrap().has_condition(Condition::Prone));

    let result = world.resolve(
        &mut resolver,
        &ActionRequest::new(A, ActionKind::Disarm, card).with_target(B),
    );
    assert!(result.has_effect(&EffectTag::ItemDropped));
    assert!(world.roster.get(B).unwrap().equipment.weapon.is_none());
    assert!(world.roster.get(B).unwrap().has_condition(Condition::Disarmed));

    let result = world.resolve(
        &mut resolver,
        &ActionRequest::new(A, ActionKind::Grapple, card).with_target(B),
    );
    assert!(result.has_effect(&EffectTag::EngagementFormed));
    assert!(world.roster.get(B).unwrap().has_condition(Condition::Rooted));
    assert!(world.engagements.is_engaged_with(A, B));
}

#[test]
fn test_avoid_escapes_without_parting_blow() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().attributes = Attributes::new(0, 2, 0, 0);
    world.engagements.engage(A, B);
    let mut resolver = ActionResolver::new();

    // Opposed by the engagement partner's initiative (5).
    let request = ActionRequest::new(A, ActionKind::Avoid, Card::minor(Suit::Pentacles, 8));
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::EngagementBroken));
    assert!(!result.has_effect(&EffectTag::PartingBlowTaken));
    assert!(!world.engagements.is_engaged(A));
    assert_eq!(world.roster.get(A).unwrap().wounds(), 0);
}

#[test]
fn test_move_while_engaged_suffers_parting_blow() {
    let mut world = duel();
    world.engagements.engage(A, B);
    let log = EventLog::new();
    log.attach(&mut world.bus);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Move, Card::minor(Suit::Pentacles, 1))
        .with_destination(FAR);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::PartingBlowTaken));
    assert_eq!(world.roster.get(A).unwrap().wounds(), 1);
    assert_eq!(world.roster.get(A).unwrap().zone, FAR);
    assert!(!world.engagements.is_engaged(A));
    assert_eq!(log.count_of("PartingBlow"), 1);
    assert_eq!(log.count_of("WoundTaken"), 1);
}

#[test]
fn test_move_needs_adjacency() {
    let mut world = World::new();
    world.zones = {
        let mut map = ZoneMap::new();
        map.add_zone(NEAR, "near");
        map.add_zone(FAR, "far");
        // Not connected.
        map
    };
    world.roster.add(pc(1, Attributes::default()));
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Move, Card::minor(Suit::Pentacles, 1))
        .with_destination(FAR);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("adjacent"));
    assert_eq!(world.roster.get(A).unwrap().zone, NEAR);
}

#[test]
fn test_move_to_unregistered_zone_is_rejected() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Move, Card::minor(Suit::Pentacles, 1))
        .with_destination(ZoneId::new(9));
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("not part of this challenge"));
    assert_eq!(world.roster.get(A).unwrap().zone, NEAR);
}

#[test]
fn test_guard_overwrites_initiative_face_up() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.shield = true;
    world
        .initiative
        .submit(A, Card::minor(Suit::Swords, 3))
        .unwrap();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Guard, Card::minor(Suit::Pentacles, 11));
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::InitiativeOverwritten));
    let slot = world.initiative.slot(A).unwrap();
    assert_eq!(slot.value, 11);
    assert!(slot.revealed);
}

#[test]
fn test_guard_requires_shield() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Guard, Card::minor(Suit::Pentacles, 11));
    let result = world.resolve(&mut resolver, &request);
    assert!(!result.success);
    assert!(result.description.contains("shield"));
}

#[test]
fn test_vigilance_fires_when_enemy_enters() {
    let mut world = duel();
    // B watches its own zone from FAR; A will move in.
    world.roster.get_mut(B).unwrap().zone = FAR;
    world
        .initiative
        .submit(A, Card::minor(Suit::Swords, 4))
        .unwrap();
    let mut resolver = ActionResolver::new();

    let arm = ActionRequest::new(B, ActionKind::Vigilance, Card::minor(Suit::Pentacles, 1))
        .with_vigilance_trigger(VigilanceTrigger::EnemyEntersZone)
        .with_follow_up(FollowUp {
            kind: ActionKind::MeleeAttack,
            card: Card::minor(Suit::Swords, 10),
            target: None,
            destination: None,
        });
    let result = world.resolve(&mut resolver, &arm);
    assert!(result.success);
    assert!(result.has_effect(&EffectTag::VigilanceArmed));

    let step = ActionRequest::new(A, ActionKind::Move, Card::minor(Suit::Pentacles, 1))
        .with_destination(FAR);
    let result = world.resolve(&mut resolver, &step);

    assert!(result.has_effect(&EffectTag::VigilanceTriggered));
    // The held attack resolved against the mover: card 10 vs initiative 4.
    assert_eq!(world.roster.get(A).unwrap().wounds(), 1);
}

#[test]
fn test_vigilance_rejects_mismatched_suit() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let arm = ActionRequest::new(B, ActionKind::Vigilance, Card::minor(Suit::Pentacles, 1))
        .with_vigilance_trigger(VigilanceTrigger::EnemyEntersZone)
        .with_follow_up(FollowUp {
            kind: ActionKind::MeleeAttack,
            card: Card::minor(Suit::Cups, 10), // swords action, cups card
            target: None,
            destination: None,
        });
    let result = world.resolve(&mut resolver, &arm);
    assert!(!result.success);
    assert!(result.description.contains("suit"));
}

#[test]
fn test_banter_shifts_morale_and_disposition() {
    let mut world = World::new();
    world.roster.add(pc(1, Attributes::new(0, 0, 0, 1)));
    world.roster.add(npc(2, Attributes::default()).with_morale(5));
    let mut resolver = ActionResolver::new();

    // Wands 8 + 1 vs morale 5 + neutral 0.
    let request = ActionRequest::new(A, ActionKind::Banter, Card::minor(Suit::Wands, 8))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::MoraleDamage(1)));
    let target = world.roster.get(B).unwrap();
    assert_eq!(target.morale, Some(4));
    assert_eq!(target.disposition, Disposition::Open);

    // A failure swings the disposition the other way.
    let request = ActionRequest::new(A, ActionKind::Banter, Card::minor(Suit::Wands, 1))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);
    assert!(!result.success);
    assert_eq!(
        world.roster.get(B).unwrap().disposition,
        Disposition::Neutral
    );
}

#[test]
fn test_parley_is_harder_and_disposition_modifies() {
    let mut world = World::new();
    world.roster.add(pc(1, Attributes::default()));
    let mut target = npc(2, Attributes::default()).with_morale(5);
    target.disposition = Disposition::Hostile;
    world.roster.add(target);
    let mut resolver = ActionResolver::new();

    // Difficulty: morale 5 + hostile 2 + hard 1 = 8.
    let request = ActionRequest::new(A, ActionKind::Parley, Card::minor(Suit::Wands, 7))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);
    assert_eq!(result.difficulty, 8);
    assert!(!result.success);
}

#[test]
fn test_social_fails_against_no_morale() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Banter, Card::minor(Suit::Wands, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(!result.success);
    assert!(result.description.contains("swayed"));
}

#[test]
fn test_spellcast_defers_to_the_fate_collaborator() {
    let mut world = duel();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut resolver = ActionResolver::new();
    resolver.set_fate_hook(Box::new(RecordingFate {
        calls: Rc::clone(&calls),
    }));

    let request = ActionRequest::new(A, ActionKind::Spellcast, Card::minor(Suit::Wands, 9))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    // Pending: no immediate success, no wounds dealt.
    assert!(!result.success);
    assert!(result.has_effect(&EffectTag::FatePending));
    assert_eq!(world.roster.get(B).unwrap().wounds(), 0);
    // The collaborator saw the actor, the card's suit, and the target's
    // initiative as the difficulty.
    assert_eq!(calls.borrow().as_slice(), &[(A, Some(Suit::Wands), 5)]);
}

#[test]
fn test_spellcast_resolves_locally_without_a_collaborator() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().attributes = Attributes::new(0, 0, 0, 2);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Spellcast, Card::minor(Suit::Wands, 9))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success); // 9 + wands 2 vs initiative 5
    assert!(!result.has_effect(&EffectTag::FatePending));
    assert_eq!(world.roster.get(B).unwrap().wounds(), 1);
}

#[test]
fn test_recover_clears_in_priority_order() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().set_condition(Condition::Prone);
    world.roster.get_mut(A).unwrap().set_condition(Condition::Rooted);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Recover, Card::minor(Suit::Wands, 10));
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::ConditionCleared(Condition::Rooted)));
    assert!(world.roster.get(A).unwrap().has_condition(Condition::Prone));
}

#[test]
fn test_heal_consumes_and_heals() {
    let mut world = duel();
    world.roster.get_mut(A).unwrap().equipment.consumables = 1;
    world.roster.get_mut(A).unwrap().attributes = Attributes::new(0, 0, 2, 0);
    world.roster.get_mut(A).unwrap().take_wounds(2);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Heal, Card::minor(Suit::Cups, 10));
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::Healed));
    let actor = world.roster.get(A).unwrap();
    assert_eq!(actor.wounds(), 1);
    assert_eq!(actor.equipment.consumables, 0);

    // No consumable left.
    let result = world.resolve(&mut resolver, &request);
    assert!(!result.success);
    assert!(result.description.contains("consumable"));
}

#[test]
fn test_minor_actions_take_no_attribute_modifier() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B)
        .as_minor();
    let result = world.resolve(&mut resolver, &request);

    assert_eq!(result.test_value, 10); // swords 2 not applied
}

#[test]
fn test_fool_without_follow_up_awaits_decision() {
    let mut world = duel();
    let log = EventLog::new();
    log.attach(&mut world.bus);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::Wait, Card::fool());
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::FoolPlayed));
    assert!(result.has_effect(&EffectTag::AwaitingFollowUp));
    assert_eq!(log.count_of("FoolInterrupt"), 1);
}

#[test]
fn test_fool_with_follow_up_resolves_bundle() {
    let mut world = duel();
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::fool()).with_follow_up(
        FollowUp {
            kind: ActionKind::MeleeAttack,
            card: Card::minor(Suit::Swords, 10),
            target: Some(B),
            destination: None,
        },
    );
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(result.has_effect(&EffectTag::FoolPlayed));
    assert!(!result.has_effect(&EffectTag::AwaitingFollowUp));
    assert!(result.description.contains("the Fool"));
    assert_eq!(world.roster.get(B).unwrap().wounds(), 1);
}

#[test]
fn test_defeat_publishes_and_cleans_up() {
    let mut world = duel();
    world.roster.get_mut(B).unwrap().take_wounds(2);
    world.engagements.engage(A, B);
    let log = EventLog::new();
    log.attach(&mut world.bus);
    let mut resolver = ActionResolver::new();

    let request = ActionRequest::new(A, ActionKind::MeleeAttack, Card::minor(Suit::Swords, 10))
        .with_target(B);
    let result = world.resolve(&mut resolver, &request);

    assert!(result.success);
    assert!(!world.roster.get(B).unwrap().is_alive());
    assert!(!world.engagements.is_engaged(A));
    assert_eq!(log.count_of("EntityDefeated"), 1);
}
