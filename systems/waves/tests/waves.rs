use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Command, Element, Event, GoldRange, HeroTemplate, MonsterRank, MonsterTemplate,
    PhaseSink, Position, Resistances, SpawnGroup, TemplateError, TemplateId, TemplateSource,
    WaveManifest, WaveMode, WaveNumber,
};
use ember_keepers_system_spawning::{Config as SpawnConfig, SpawnCoordinator};
use ember_keepers_system_wave_config::{Config as TableConfig, WaveTables};
use ember_keepers_system_waves::{Config, WaveScheduler};
use ember_keepers_world::{self as world, query, World};

#[derive(Debug, Default)]
struct PhaseLog {
    entries: Vec<String>,
}

impl PhaseSink for PhaseLog {
    fn enter_strategy_phase(&mut self) {
        self.entries.push("strategy".to_owned());
    }

    fn combat_phase_started(&mut self, wave: WaveNumber) {
        self.entries.push(format!("combat {wave}"));
    }
}

struct Whispers;

impl TemplateSource for Whispers {
    fn monster_template(&self, id: &TemplateId) -> Result<MonsterTemplate, TemplateError> {
        if id.as_str() != "whisper" {
            return Err(TemplateError::UnknownMonster(id.clone()));
        }
        Ok(MonsterTemplate {
            id: id.clone(),
            name: "Whisper".to_owned(),
            affinity: Element::None,
            rank: MonsterRank::Normal,
            base_health: 50.0,
            base_attack: 5.0,
            attack_interval: Duration::from_secs(1),
            move_speed: 3.0,
            resistances: Resistances::NONE,
            ability: None,
            gold_drop: GoldRange::new(5, 15),
        })
    }

    fn hero_template(&self, id: &TemplateId) -> Result<HeroTemplate, TemplateError> {
        Err(TemplateError::UnknownHero(id.clone()))
    }
}

fn scheduler() -> WaveScheduler {
    WaveScheduler::new(
        Config::default(),
        WaveTables::generate(&TableConfig::new(99)),
    )
}

fn coordinator() -> SpawnCoordinator {
    SpawnCoordinator::new(SpawnConfig::default())
}

#[test]
fn starting_twice_without_a_clear_is_a_no_op() {
    let mut scheduler = scheduler();
    let mut coordinator = coordinator();
    let mut phase = PhaseLog::default();
    let mut events = Vec::new();

    assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut events));
    let before = scheduler.state();
    assert!(!scheduler.start_wave(&mut coordinator, &mut phase, &mut events));

    assert_eq!(scheduler.state(), before);
    assert_eq!(scheduler.current_wave(), WaveNumber::new(1));
    assert!(scheduler.is_wave_in_progress());
    assert_eq!(phase.entries, vec!["combat 1".to_owned()]);
    assert_eq!(
        events,
        vec![Event::WaveStarted {
            wave: WaveNumber::new(1),
            mode: WaveMode::Main,
        }]
    );
}

#[test]
fn clears_for_other_waves_are_ignored() {
    let mut scheduler = scheduler();
    let mut coordinator = coordinator();
    let mut phase = PhaseLog::default();
    let mut events = Vec::new();

    assert!(!scheduler.on_wave_cleared(WaveNumber::new(1), &mut phase, &mut events));
    assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut events));
    assert!(!scheduler.on_wave_cleared(WaveNumber::new(2), &mut phase, &mut events));
    assert!(scheduler.is_wave_in_progress());

    assert!(scheduler.on_wave_cleared(WaveNumber::new(1), &mut phase, &mut events));
    assert!(!scheduler.is_wave_in_progress());
    assert!(!scheduler.on_wave_cleared(WaveNumber::new(1), &mut phase, &mut events));
    assert_eq!(
        phase.entries,
        vec!["combat 1".to_owned(), "strategy".to_owned()]
    );
}

#[test]
fn mode_flips_to_endless_after_the_main_sequence() {
    let mut scheduler = scheduler();
    let mut coordinator = coordinator();
    let mut phase = PhaseLog::default();
    let mut events = Vec::new();

    for wave in 1..=21 {
        assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut events));
        assert_eq!(scheduler.is_endless_mode(), wave > 20, "wave {wave}");
        assert!(scheduler.on_wave_cleared(WaveNumber::new(wave), &mut phase, &mut events));
    }
    assert!(events.contains(&Event::WaveStarted {
        wave: WaveNumber::new(21),
        mode: WaveMode::Endless,
    }));
}

#[test]
fn endless_manifests_are_renumbered_and_scaled_per_loop() {
    let scheduler = scheduler();
    let first = scheduler
        .manifest_for(WaveNumber::new(21))
        .expect("first endless wave");
    let second_loop = scheduler
        .manifest_for(WaveNumber::new(31))
        .expect("second loop");

    assert_eq!(first.wave, WaveNumber::new(21));
    assert_eq!(second_loop.wave, WaveNumber::new(31));
    assert_eq!(first.groups.len(), second_loop.groups.len());
    for (base, scaled) in first.groups.iter().zip(&second_loop.groups) {
        assert_eq!(base.monster, scaled.monster);
        assert_eq!(scaled.count, 10);
        assert_eq!(scaled.level, 8);
        assert_eq!(base.initial_delay, scaled.initial_delay);
    }
    assert!(scheduler.manifest_for(WaveNumber::new(0)).is_none());
    assert!(scheduler.manifest_for(WaveNumber::new(1_000)).is_some());
}

#[test]
fn missing_manifest_clears_the_wave_immediately() {
    let tables = WaveTables::from_manifests(Vec::new(), Vec::new());
    let mut scheduler = WaveScheduler::new(Config::new(20, 10), tables);
    let mut coordinator = coordinator();
    let mut phase = PhaseLog::default();
    let mut events = Vec::new();

    assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut events));
    assert!(!scheduler.is_wave_in_progress());
    assert_eq!(coordinator.current_wave(), None);
    assert_eq!(
        events,
        vec![
            Event::WaveStarted {
                wave: WaveNumber::new(1),
                mode: WaveMode::Main,
            },
            Event::WaveCleared {
                wave: WaveNumber::new(1),
            },
        ]
    );
    assert_eq!(
        phase.entries,
        vec!["combat 1".to_owned(), "strategy".to_owned()]
    );

    assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut events));
    assert_eq!(scheduler.current_wave(), WaveNumber::new(2));
}

#[test]
fn coordinator_clear_closes_the_wave() {
    let main = vec![WaveManifest {
        wave: WaveNumber::new(1),
        difficulty: 1.0,
        boss: None,
        groups: vec![SpawnGroup::new(
            "whisper",
            3,
            1,
            Duration::ZERO,
            Duration::from_millis(500),
        )],
    }];
    let mut scheduler = WaveScheduler::new(
        Config::new(1, 10),
        WaveTables::from_manifests(main, Vec::new()),
    );
    let mut coordinator = coordinator();
    let mut phase = PhaseLog::default();
    let mut wave_events = Vec::new();
    let mut world = World::new();

    assert!(scheduler.start_wave(&mut coordinator, &mut phase, &mut wave_events));

    let mut cleared = None;
    for _ in 0..20 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        for monster in query::monster_view(&world).iter() {
            world::apply(
                &mut world,
                Command::DealDamage {
                    target: AgentRef::Monster(monster.id),
                    amount: 1_000.0,
                    element: Element::Fire,
                },
                &mut events,
            );
        }
        loop {
            let mut commands = Vec::new();
            if let Some(wave) =
                coordinator.handle(&events, &Whispers, Position::ORIGIN, &mut commands)
            {
                cleared = Some(wave);
            }
            if commands.is_empty() {
                break;
            }
            events.clear();
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }
        }
        if let Some(wave) = cleared {
            assert!(scheduler.on_wave_cleared(wave, &mut phase, &mut wave_events));
            break;
        }
    }

    assert_eq!(cleared, Some(WaveNumber::new(1)));
    assert!(!scheduler.is_wave_in_progress());
    assert!(wave_events.contains(&Event::WaveCleared {
        wave: WaveNumber::new(1)
    }));
}
