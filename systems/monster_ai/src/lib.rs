#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that advances monsters and resolves their area effects.
//!
//! Monsters walk toward the base, or toward the hero taunting them, and strike
//! whatever stands within melee range on their own attack timer. Heroes in
//! melee range take priority over the base. Area effects announced by the
//! world (death bursts, rally pulses, chill pulses) are turned into damage and
//! status commands here.

use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Command, Event, HeroSnapshot, HeroView, MonsterSnapshot, MonsterView, Position,
    StatusEffect, StrikeTarget,
};
use ember_keepers_system_elemental::hero_intake;
use ember_keepers_system_targeting::{in_range, nearest};

/// Configuration parameters required to construct the monster AI.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    melee_range: f32,
    approach_margin: f32,
}

impl Config {
    /// Creates a configuration where monsters strike within `melee_range`.
    #[must_use]
    pub const fn new(melee_range: f32) -> Self {
        Self {
            melee_range,
            approach_margin: 0.1,
        }
    }

    /// Distance at which monsters strike.
    #[must_use]
    pub const fn melee_range(&self) -> f32 {
        self.melee_range
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Monster behaviour system.
#[derive(Debug)]
pub struct MonsterAi {
    config: Config,
    scratch: Vec<Command>,
}

impl MonsterAi {
    /// Creates a new monster AI with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Consumes world events and views to emit movement, strike and effect commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        heroes: &HeroView,
        monsters: &MonsterView,
        base: Position,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        let mut elapsed: Option<Duration> = None;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    elapsed = Some(elapsed.unwrap_or(Duration::ZERO).saturating_add(*dt));
                }
                Event::DeathBurst {
                    origin,
                    radius,
                    damage,
                    element,
                    ..
                } => {
                    for hero in in_range(*origin, *radius, heroes.iter()) {
                        self.scratch.push(Command::DealDamage {
                            target: AgentRef::Hero(hero.id),
                            amount: hero_intake(*damage, *element, hero),
                            element: *element,
                        });
                    }
                }
                Event::RallyPulse {
                    monster,
                    origin,
                    radius,
                    bonus,
                    duration,
                } => {
                    for ally in in_range(*origin, *radius, monsters.iter()) {
                        if ally.id == *monster {
                            continue;
                        }
                        self.scratch.push(Command::ApplyStatus {
                            target: AgentRef::Monster(ally.id),
                            effect: StatusEffect::Empowered { bonus: *bonus },
                            duration: *duration,
                        });
                    }
                }
                Event::ChillPulse {
                    origin,
                    radius,
                    fraction,
                    duration,
                    ..
                } => {
                    for hero in in_range(*origin, *radius, heroes.iter()) {
                        self.scratch.push(Command::ApplyStatus {
                            target: AgentRef::Hero(hero.id),
                            effect: StatusEffect::Slow {
                                fraction: *fraction,
                            },
                            duration: *duration,
                        });
                    }
                }
                _ => {}
            }
        }

        if let Some(dt) = elapsed {
            for monster in monsters.iter().filter(|monster| monster.is_alive()) {
                self.act(monster, heroes, base, dt);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn act(&mut self, monster: &MonsterSnapshot, heroes: &HeroView, base: Position, dt: Duration) {
        let melee = self.config.melee_range;

        let taunter = monster
            .taunted_by
            .and_then(|hero| heroes.get(hero))
            .filter(|hero| hero.is_fighting());

        let (target, destination) = match taunter {
            Some(hero) => (StrikeTarget::Hero(hero.id), hero.position),
            None => match nearest(monster.position, melee, heroes.iter()) {
                Some(hero) => (StrikeTarget::Hero(hero.id), hero.position),
                None => (StrikeTarget::Base, base),
            },
        };

        let distance = monster.position.distance(destination);
        if distance <= melee {
            if monster.attack_ready {
                self.scratch.push(Command::MonsterStrike {
                    monster: monster.id,
                    target,
                    amount: strike_amount(monster, target, heroes),
                });
            }
            return;
        }

        let gap = distance - melee + self.config.approach_margin;
        let step = (monster.move_speed * dt.as_secs_f32()).min(gap);
        if step > 0.0 {
            self.scratch.push(Command::MoveMonster {
                monster: monster.id,
                to: monster.position.step_toward(destination, step),
            });
        }
    }
}

impl Default for MonsterAi {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn strike_amount(monster: &MonsterSnapshot, target: StrikeTarget, heroes: &HeroView) -> f32 {
    match target {
        StrikeTarget::Hero(id) => heroes
            .get(id)
            .map(|hero: &HeroSnapshot| hero_intake(monster.attack_damage, monster.affinity, hero))
            .unwrap_or(monster.attack_damage),
        StrikeTarget::Base => monster.attack_damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_keepers_core::{
        Element, HeroClass, HeroId, MonsterId, MonsterRank, Resistances, SkillKind, TemplateId,
    };

    fn hero(id: u32, x: f32) -> HeroSnapshot {
        HeroSnapshot {
            id: HeroId::new(id),
            template: TemplateId::new("terra"),
            element: Element::Earth,
            class: HeroClass::Guardian,
            position: Position::new(x, 0.0),
            health: 150.0,
            max_health: 150.0,
            energy: 0.0,
            max_energy: 100.0,
            skill: SkillKind::PetrifiedSkin,
            skill_cooldown_remaining: Duration::ZERO,
            skill_energy_cost: 50.0,
            deployed: true,
            attack_ready: true,
            attack_damage: 10.0,
            attack_range: 5.0,
            detection_range: 10.0,
            move_speed: 5.0,
            physical_defense: 2.5,
            resistances: Resistances::NONE,
            fallen_at_tick: None,
            statuses: Vec::new(),
        }
    }

    fn monster(id: u32, x: f32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            template: TemplateId::new("whisper"),
            rank: MonsterRank::Normal,
            level: 1,
            position: Position::new(x, 0.0),
            health: 50.0,
            max_health: 50.0,
            affinity: Element::None,
            resistances: Resistances::NONE,
            attack_damage: 5.0,
            attack_ready: true,
            move_speed: 3.0,
            taunted_by: None,
            statuses: Vec::new(),
        }
    }

    fn tick() -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }
    }

    #[test]
    fn advances_toward_the_base() {
        let mut ai = MonsterAi::default();
        let monsters = MonsterView::from_snapshots(vec![monster(0, 20.0)]);
        let mut out = Vec::new();
        ai.handle(&[tick()], &HeroView::default(), &monsters, Position::ORIGIN, &mut out);
        match out.as_slice() {
            [Command::MoveMonster { monster, to }] => {
                assert_eq!(*monster, MonsterId::new(0));
                assert!((to.x() - 18.5).abs() < 1e-5);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn strikes_base_in_melee_range() {
        let mut ai = MonsterAi::default();
        let monsters = MonsterView::from_snapshots(vec![monster(0, 1.5)]);
        let mut out = Vec::new();
        ai.handle(&[tick()], &HeroView::default(), &monsters, Position::ORIGIN, &mut out);
        assert_eq!(
            out,
            vec![Command::MonsterStrike {
                monster: MonsterId::new(0),
                target: StrikeTarget::Base,
                amount: 5.0,
            }]
        );
    }

    #[test]
    fn heroes_in_melee_range_are_struck_before_the_base() {
        let mut ai = MonsterAi::default();
        let heroes = HeroView::from_snapshots(vec![hero(3, 2.5)]);
        let monsters = MonsterView::from_snapshots(vec![monster(0, 1.0)]);
        let mut out = Vec::new();
        ai.handle(&[tick()], &heroes, &monsters, Position::ORIGIN, &mut out);
        assert_eq!(
            out,
            vec![Command::MonsterStrike {
                monster: MonsterId::new(0),
                target: StrikeTarget::Hero(HeroId::new(3)),
                amount: 2.5,
            }]
        );
    }

    #[test]
    fn taunted_monsters_pursue_the_taunter() {
        let mut ai = MonsterAi::default();
        let heroes = HeroView::from_snapshots(vec![hero(3, 10.0)]);
        let mut taunted = monster(0, 1.0);
        taunted.taunted_by = Some(HeroId::new(3));
        let monsters = MonsterView::from_snapshots(vec![taunted]);
        let mut out = Vec::new();
        ai.handle(&[tick()], &heroes, &monsters, Position::ORIGIN, &mut out);
        match out.as_slice() {
            [Command::MoveMonster { to, .. }] => assert!(to.x() > 1.0),
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn cooling_monsters_in_range_wait() {
        let mut ai = MonsterAi::default();
        let mut cooling = monster(0, 1.0);
        cooling.attack_ready = false;
        let monsters = MonsterView::from_snapshots(vec![cooling]);
        let mut out = Vec::new();
        ai.handle(&[tick()], &HeroView::default(), &monsters, Position::ORIGIN, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn rally_empowers_neighbours_but_not_the_rallier() {
        let mut ai = MonsterAi::default();
        let monsters =
            MonsterView::from_snapshots(vec![monster(0, 0.0), monster(1, 5.0), monster(2, 9.0)]);
        let rally = Event::RallyPulse {
            monster: MonsterId::new(0),
            origin: Position::ORIGIN,
            radius: 8.0,
            bonus: 0.3,
            duration: Duration::from_secs(5),
        };
        let mut out = Vec::new();
        ai.handle(&[rally], &HeroView::default(), &monsters, Position::new(50.0, 0.0), &mut out);
        assert_eq!(
            out,
            vec![Command::ApplyStatus {
                target: AgentRef::Monster(MonsterId::new(1)),
                effect: StatusEffect::Empowered { bonus: 0.3 },
                duration: Duration::from_secs(5),
            }]
        );
    }

    #[test]
    fn death_burst_hurts_heroes_in_radius() {
        let mut ai = MonsterAi::default();
        let heroes = HeroView::from_snapshots(vec![hero(0, 3.0), hero(1, 7.0)]);
        let burst = Event::DeathBurst {
            monster: MonsterId::new(9),
            origin: Position::ORIGIN,
            radius: 6.0,
            damage: 100.0,
            element: Element::Thunder,
        };
        let mut out = Vec::new();
        ai.handle(&[burst], &heroes, &MonsterView::default(), Position::ORIGIN, &mut out);
        assert_eq!(
            out,
            vec![Command::DealDamage {
                target: AgentRef::Hero(HeroId::new(0)),
                amount: 147.5,
                element: Element::Thunder,
            }]
        );
    }
}
