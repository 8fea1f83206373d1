#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drives hero auto-attacks.
//!
//! Every deployed, living hero acquires the nearest monster within its
//! detection range. Targets beyond attack range are chased at the hero's move
//! speed; targets inside it are struck whenever the hero's attack timer
//! allows, with damage resolved against the target's affinity and resistances.

use std::time::Duration;

use ember_keepers_core::{Command, Event, HeroView, MonsterView};
use ember_keepers_system_elemental::{final_damage, DefenderProfile};
use ember_keepers_system_targeting::nearest;

/// Configuration parameters required to construct the hero combat system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    approach_margin: f32,
}

impl Config {
    /// Creates a configuration; chasing heroes stop `approach_margin` inside their attack range.
    #[must_use]
    pub const fn new(approach_margin: f32) -> Self {
        Self { approach_margin }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0.25)
    }
}

/// Hero combat system that queues chase and strike commands.
#[derive(Debug)]
pub struct HeroCombat {
    config: Config,
    scratch: Vec<Command>,
}

impl HeroCombat {
    /// Creates a new hero combat system with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Emits `MoveHero` and `HeroStrike` commands once per elapsed tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        heroes: &HeroView,
        monsters: &MonsterView,
        out: &mut Vec<Command>,
    ) {
        let Some(dt) = elapsed(events) else {
            return;
        };
        if monsters.is_empty() {
            return;
        }

        self.scratch.clear();

        for hero in heroes.iter().filter(|hero| hero.is_fighting()) {
            let Some(target) = nearest(hero.position, hero.detection_range, monsters.iter()) else {
                continue;
            };

            let distance = hero.position.distance(target.position);
            if distance > hero.attack_range {
                let gap = distance - hero.attack_range + self.config.approach_margin;
                let step = (hero.move_speed * dt.as_secs_f32()).min(gap);
                if step > 0.0 {
                    self.scratch.push(Command::MoveHero {
                        hero: hero.id,
                        to: hero.position.step_toward(target.position, step),
                    });
                }
                continue;
            }

            if hero.attack_ready {
                let amount = final_damage(
                    hero.attack_damage,
                    hero.element,
                    &DefenderProfile::from(target),
                );
                self.scratch.push(Command::HeroStrike {
                    hero: hero.id,
                    monster: target.id,
                    amount,
                    element: hero.element,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

impl Default for HeroCombat {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn elapsed(events: &[Event]) -> Option<Duration> {
    events.iter().fold(None, |total, event| match event {
        Event::TimeAdvanced { dt } => Some(total.unwrap_or(Duration::ZERO).saturating_add(*dt)),
        _ => total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_keepers_core::{
        Element, HeroClass, HeroId, HeroSnapshot, MonsterId, MonsterRank, MonsterSnapshot,
        Position, Resistances, SkillKind, TemplateId,
    };

    fn hero(id: u32, x: f32, element: Element) -> HeroSnapshot {
        HeroSnapshot {
            id: HeroId::new(id),
            template: TemplateId::new("ignis"),
            element,
            class: HeroClass::Dps,
            position: Position::new(x, 0.0),
            health: 100.0,
            max_health: 100.0,
            energy: 0.0,
            max_energy: 100.0,
            skill: SkillKind::BurningSoulBarrage,
            skill_cooldown_remaining: Duration::ZERO,
            skill_energy_cost: 50.0,
            deployed: true,
            attack_ready: true,
            attack_damage: 10.0,
            attack_range: 5.0,
            detection_range: 10.0,
            move_speed: 5.0,
            physical_defense: 0.0,
            resistances: Resistances::NONE,
            fallen_at_tick: None,
            statuses: Vec::new(),
        }
    }

    fn monster(id: u32, x: f32, affinity: Element) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            template: TemplateId::new("ice_aberration"),
            rank: MonsterRank::Normal,
            level: 1,
            position: Position::new(x, 0.0),
            health: 80.0,
            max_health: 80.0,
            affinity,
            resistances: Resistances::NONE,
            attack_damage: 10.0,
            attack_ready: true,
            move_speed: 3.0,
            taunted_by: None,
            statuses: Vec::new(),
        }
    }

    fn tick() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(100),
        }]
    }

    #[test]
    fn silent_without_elapsed_time() {
        let mut system = HeroCombat::default();
        let heroes = HeroView::from_snapshots(vec![hero(0, 0.0, Element::Fire)]);
        let monsters = MonsterView::from_snapshots(vec![monster(1, 1.0, Element::Ice)]);
        let mut out = Vec::new();
        system.handle(&[], &heroes, &monsters, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn strikes_in_range_with_elemental_advantage() {
        let mut system = HeroCombat::default();
        let heroes = HeroView::from_snapshots(vec![hero(0, 0.0, Element::Fire)]);
        let monsters = MonsterView::from_snapshots(vec![monster(1, 4.0, Element::Ice)]);
        let mut out = Vec::new();
        system.handle(&tick(), &heroes, &monsters, &mut out);
        assert_eq!(
            out,
            vec![Command::HeroStrike {
                hero: HeroId::new(0),
                monster: MonsterId::new(1),
                amount: 15.0,
                element: Element::Fire,
            }]
        );
    }

    #[test]
    fn chases_targets_beyond_attack_range() {
        let mut system = HeroCombat::default();
        let heroes = HeroView::from_snapshots(vec![hero(0, 0.0, Element::Ice)]);
        let monsters = MonsterView::from_snapshots(vec![monster(1, 8.0, Element::Fire)]);
        let mut out = Vec::new();
        system.handle(&tick(), &heroes, &monsters, &mut out);
        match out.as_slice() {
            [Command::MoveHero { hero, to }] => {
                assert_eq!(*hero, HeroId::new(0));
                assert!((to.x() - 0.5).abs() < 1e-5);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn ignores_monsters_beyond_detection_and_idle_heroes() {
        let mut system = HeroCombat::default();
        let mut benched = hero(1, 0.0, Element::Fire);
        benched.deployed = false;
        let mut cooling = hero(2, 0.0, Element::Fire);
        cooling.attack_ready = false;
        let heroes =
            HeroView::from_snapshots(vec![hero(0, -30.0, Element::Fire), benched, cooling]);
        let monsters = MonsterView::from_snapshots(vec![monster(1, 2.0, Element::None)]);
        let mut out = Vec::new();
        system.handle(&tick(), &heroes, &monsters, &mut out);
        assert!(out.is_empty());
    }
}
