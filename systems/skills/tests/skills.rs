use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Attributes, Command, Element, Event, GoldRange, HeroBuff, HeroClass, HeroId,
    HeroTemplate, MonsterId, MonsterRank, MonsterTemplate, Position, Resistances, SkillKind,
    TemplateId,
};
use ember_keepers_system_skills::{SkillDecisionEngine, SkillEffects};
use ember_keepers_world::{self as world, query, World};

const BASE: Position = Position::new(-40.0, 0.0);

fn template(skill: SkillKind, class: HeroClass, strength: u32) -> HeroTemplate {
    HeroTemplate {
        id: TemplateId::new(skill.id()),
        name: skill.id().to_owned(),
        element: skill.element(),
        class,
        attributes: Attributes {
            strength,
            ..Attributes::default()
        },
        skill,
        skill_cooldown: Duration::from_secs(10),
        skill_energy_cost: 50.0,
        resistances: Resistances::NONE,
    }
}

fn whisper() -> MonsterTemplate {
    MonsterTemplate {
        id: TemplateId::new("whisper"),
        name: "Whisper".to_owned(),
        affinity: Element::None,
        rank: MonsterRank::Normal,
        base_health: 500.0,
        base_attack: 5.0,
        attack_interval: Duration::from_secs(1),
        move_speed: 3.0,
        resistances: Resistances::NONE,
        ability: None,
        gold_drop: GoldRange::new(5, 15),
    }
}

struct Harness {
    world: World,
    engine: SkillDecisionEngine,
    effects: SkillEffects,
    log: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            engine: SkillDecisionEngine::new(),
            effects: SkillEffects::default(),
            log: Vec::new(),
        }
    }

    fn deploy(&mut self, template: HeroTemplate, position: Position) -> HeroId {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::RecruitHero { template }, &mut events);
        let hero = events
            .iter()
            .find_map(|event| match event {
                Event::HeroRecruited { hero, .. } => Some(*hero),
                _ => None,
            })
            .expect("recruited");
        world::apply(&mut self.world, Command::DeployHero { hero, position }, &mut events);
        hero
    }

    fn spawn(&mut self, position: Position) -> MonsterId {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SpawnMonster {
                template: whisper(),
                level: 1,
                position,
            },
            &mut events,
        );
        events
            .iter()
            .find_map(|event| match event {
                Event::MonsterSpawned { monster, .. } => Some(*monster),
                _ => None,
            })
            .expect("spawned")
    }

    fn tick(&mut self, ticks: usize) {
        for _ in 0..ticks {
            let mut events = Vec::new();
            world::apply(
                &mut self.world,
                Command::Tick {
                    dt: Duration::from_secs(1),
                },
                &mut events,
            );
            self.pump(events);
        }
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        for _ in 0..8 {
            self.log.extend(events.iter().cloned());
            let heroes = query::hero_view(&self.world);
            let monsters = query::monster_view(&self.world);
            let mut commands = Vec::new();
            self.engine.handle(&events, &heroes, &monsters, BASE, &mut commands);
            self.effects.handle(&events, &heroes, &monsters, BASE, &mut commands);
            if commands.is_empty() {
                return;
            }
            events = Vec::new();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }
}

#[test]
fn barrage_fires_once_energy_and_cooldown_allow() {
    let mut harness = Harness::new();
    let hero = harness.deploy(
        template(SkillKind::BurningSoulBarrage, HeroClass::Dps, 0),
        Position::ORIGIN,
    );
    let _ = harness.spawn(Position::new(6.0, 0.0));

    harness.tick(9);
    assert_eq!(harness.count(|event| matches!(event, Event::SkillUsed { .. })), 0);

    harness.tick(1);
    assert_eq!(harness.count(|event| matches!(event, Event::SkillUsed { .. })), 1);
    assert!(harness.log.contains(&Event::BuffGranted {
        hero,
        buff: HeroBuff::AttackSpeed { bonus: 0.5 },
    }));

    harness.tick(10);
    assert_eq!(harness.count(|event| matches!(event, Event::SkillUsed { .. })), 2);
    assert_eq!(harness.count(|event| matches!(event, Event::SkillRejected { .. })), 0);
}

#[test]
fn petrified_skin_taunts_nearby_monsters() {
    let mut harness = Harness::new();
    let hero = harness.deploy(
        template(SkillKind::PetrifiedSkin, HeroClass::Guardian, 5),
        Position::ORIGIN,
    );
    let near = harness.spawn(Position::new(4.0, 0.0));
    let far = harness.spawn(Position::new(9.0, 0.0));

    let mut events = Vec::new();
    world::apply(
        &mut harness.world,
        Command::DealDamage {
            target: AgentRef::Hero(hero),
            amount: 80.0,
            element: Element::None,
        },
        &mut events,
    );

    harness.tick(10);
    let near = query::monster(&harness.world, near).expect("near");
    let far = query::monster(&harness.world, far).expect("far");
    assert_eq!(near.taunted_by, Some(hero));
    assert_eq!(far.taunted_by, None);

    let defended = query::hero(&harness.world, hero).expect("hero");
    assert_eq!(defended.physical_defense, 2.5 + 30.0);
}

#[test]
fn charge_overload_pulses_thunder_around_the_hero() {
    let mut harness = Harness::new();
    let hero = harness.deploy(
        template(SkillKind::ChargeOverload, HeroClass::Guardian, 0),
        Position::ORIGIN,
    );
    let target = harness.spawn(Position::new(3.0, 0.0));

    let mut events = Vec::new();
    world::apply(
        &mut harness.world,
        Command::DealDamage {
            target: AgentRef::Hero(hero),
            amount: 40.0,
            element: Element::None,
        },
        &mut events,
    );

    harness.tick(10);
    assert_eq!(harness.count(|event| matches!(event, Event::SkillUsed { .. })), 1);
    harness.tick(4);
    let pulses = harness.count(|event| matches!(event, Event::ShockPulse { .. }));
    assert_eq!(pulses, 4);
    let monster = query::monster(&harness.world, target).expect("monster");
    assert!((monster.health - (500.0 - 4.0 * 15.0)).abs() < 1e-3);
}
