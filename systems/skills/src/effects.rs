//! Resolution of skill activations into world commands.

use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Command, Element, Event, HeroBuff, HeroId, HeroView, MonsterSnapshot, MonsterView,
    Position, SkillKind, StatusEffect, StatusKind,
};
use ember_keepers_system_elemental::{final_damage, DefenderProfile};
use ember_keepers_system_targeting::{first_in_band, in_range, nearest};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const BARRAGE_ATTACK_SPEED: f32 = 0.5;
const BARRAGE_DURATION: Duration = Duration::from_secs(5);

const MOLTEN_RADIUS: f32 = 3.0;
const MOLTEN_DAMAGE: f32 = 30.0;
const MOLTEN_SHIELD: f32 = 50.0;
const MOLTEN_SHIELD_DURATION: Duration = Duration::from_secs(5);

const PURIFY_SEARCH: f32 = 15.0;
const PURIFY_RADIUS: f32 = 8.0;
const PURIFY_DAMAGE: f32 = 40.0;

const PIERCE_SEARCH: f32 = 15.0;
const PIERCE_LENGTH: f32 = 15.0;
const PIERCE_HALF_WIDTH: f32 = 1.0;
const PIERCE_DAMAGE: f32 = 35.0;
const PIERCE_SLOW: f32 = 0.5;
const PIERCE_SLOW_DURATION: Duration = Duration::from_secs(3);

const ZERO_RADIUS: f32 = 5.0;
const ZERO_DAMAGE: f32 = 30.0;
const ZERO_FREEZE: Duration = Duration::from_secs(2);

const BARRIER_SEARCH: f32 = 10.0;
const BARRIER_RADIUS: f32 = 4.0;
const BARRIER_SLOW: f32 = 0.7;
const BARRIER_DURATION: Duration = Duration::from_secs(8);

const CHAIN_SEARCH: f32 = 12.0;
const CHAIN_BAND: (f32, f32) = (3.0, 8.4);
const CHAIN_BOUNCE: f32 = 5.0;
const CHAIN_HITS: usize = 5;
const CHAIN_DAMAGE: f32 = 25.0;

const OVERLOAD_DEFENSE: f32 = 20.0;
const OVERLOAD_DURATION: Duration = Duration::from_secs(8);
const OVERLOAD_PULSE: Duration = Duration::from_secs(1);
const OVERLOAD_RADIUS: f32 = 4.0;
const OVERLOAD_DAMAGE: f32 = 15.0;

const SURGE_RADIUS: f32 = 8.0;
const SURGE_HEAL: f32 = 30.0;
const SURGE_ENERGY: f32 = 20.0;

const SEISMIC_SEARCH: f32 = 15.0;
const SEISMIC_RADIUS: f32 = 3.0;
const SEISMIC_DAMAGE: f32 = 40.0;
const KNOCKBACK_DURATION: Duration = Duration::from_millis(500);

const PETRIFIED_DEFENSE: f32 = 30.0;
const PETRIFIED_DURATION: Duration = Duration::from_secs(10);
const PETRIFIED_TAUNT_RADIUS: f32 = 6.0;

const MIRE_SEARCH: f32 = 24.0;
const MIRE_MIN_DISTANCE: f32 = 5.0;
const MIRE_RADIUS: f32 = 4.0;
const MIRE_SLOW: f32 = 0.8;
const MIRE_DURATION: Duration = Duration::from_secs(10);

/// Configuration parameters required to construct the skill effect resolver.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    knockback_chance: f64,
}

impl Config {
    /// Creates a configuration; `knockback_chance` is clamped into `[0, 1]` on use.
    #[must_use]
    pub const fn new(rng_seed: u64, knockback_chance: f64) -> Self {
        Self {
            rng_seed,
            knockback_chance,
        }
    }

    /// Seed of the effect roll generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0x5ca1_ab1e, 0.7)
    }
}

/// Turns `SkillUsed` and `ShockPulse` events into commands.
#[derive(Debug)]
pub struct SkillEffects {
    knockback_chance: f64,
    rng: ChaCha8Rng,
    scratch: Vec<Command>,
}

impl SkillEffects {
    /// Creates a resolver whose probability rolls are seeded from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let knockback_chance = if config.knockback_chance.is_finite() {
            config.knockback_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            knockback_chance,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            scratch: Vec::new(),
        }
    }

    /// Resolves every skill activation and aura pulse in `events`.
    pub fn handle(
        &mut self,
        events: &[Event],
        heroes: &HeroView,
        monsters: &MonsterView,
        base: Position,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        for event in events {
            match event {
                Event::SkillUsed {
                    hero,
                    skill,
                    position,
                } => self.resolve(*hero, *skill, *position, heroes, monsters, base),
                Event::ShockPulse {
                    origin,
                    radius,
                    damage,
                    ..
                } => {
                    for monster in in_range(*origin, *radius, monsters.iter()) {
                        self.strike(monster, *damage, Element::Thunder);
                    }
                }
                _ => {}
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn resolve(
        &mut self,
        hero: HeroId,
        skill: SkillKind,
        position: Position,
        heroes: &HeroView,
        monsters: &MonsterView,
        base: Position,
    ) {
        let element = skill.element();
        match skill {
            SkillKind::BurningSoulBarrage => self.buff(
                hero,
                HeroBuff::AttackSpeed {
                    bonus: BARRAGE_ATTACK_SPEED,
                },
                BARRAGE_DURATION,
            ),
            SkillKind::MoltenArmor => {
                self.blast(position, MOLTEN_RADIUS, MOLTEN_DAMAGE, element, monsters);
                self.status(
                    AgentRef::Hero(hero),
                    StatusEffect::Shield {
                        amount: MOLTEN_SHIELD,
                    },
                    MOLTEN_SHIELD_DURATION,
                );
            }
            SkillKind::PurifyingFlame => {
                let Some(centre) = Position::centroid(
                    in_range(position, PURIFY_SEARCH, monsters.iter())
                        .into_iter()
                        .map(|monster| monster.position),
                ) else {
                    return self.no_target(hero, skill);
                };
                for monster in in_range(centre, PURIFY_RADIUS, monsters.iter()) {
                    self.strike(monster, PURIFY_DAMAGE, element);
                    if monster.has_status(StatusKind::Empowered) {
                        self.scratch.push(Command::ClearStatus {
                            target: AgentRef::Monster(monster.id),
                            kind: StatusKind::Empowered,
                        });
                    }
                }
            }
            SkillKind::FrostPierce => {
                let Some(aim) = nearest(position, PIERCE_SEARCH, monsters.iter()) else {
                    return self.no_target(hero, skill);
                };
                let aim = aim.position;
                for monster in monsters.iter().filter(|monster| monster.is_alive()) {
                    if on_segment(position, aim, monster.position) {
                        self.strike(monster, PIERCE_DAMAGE, element);
                        self.status(
                            AgentRef::Monster(monster.id),
                            StatusEffect::Slow {
                                fraction: PIERCE_SLOW,
                            },
                            PIERCE_SLOW_DURATION,
                        );
                    }
                }
            }
            SkillKind::AbsoluteZero => {
                for monster in in_range(position, ZERO_RADIUS, monsters.iter()) {
                    self.strike(monster, ZERO_DAMAGE, element);
                    self.status(AgentRef::Monster(monster.id), StatusEffect::Freeze, ZERO_FREEZE);
                }
            }
            SkillKind::IceBarrier => {
                let Some(front) = nearest(base, BARRIER_SEARCH, monsters.iter()) else {
                    return self.no_target(hero, skill);
                };
                self.slow_around(
                    front.position,
                    BARRIER_RADIUS,
                    BARRIER_SLOW,
                    BARRIER_DURATION,
                    monsters,
                );
            }
            SkillKind::ChainLightning => self.chain(hero, position, monsters),
            SkillKind::ChargeOverload => {
                self.buff(
                    hero,
                    HeroBuff::Defense {
                        bonus: OVERLOAD_DEFENSE,
                    },
                    OVERLOAD_DURATION,
                );
                self.buff(
                    hero,
                    HeroBuff::ShockAura {
                        interval: OVERLOAD_PULSE,
                        radius: OVERLOAD_RADIUS,
                        damage: OVERLOAD_DAMAGE,
                    },
                    OVERLOAD_DURATION,
                );
            }
            SkillKind::EnergySurge => {
                for ally in in_range(position, SURGE_RADIUS, heroes.iter()) {
                    if ally.id == hero {
                        continue;
                    }
                    self.scratch.push(Command::HealHero {
                        hero: ally.id,
                        amount: SURGE_HEAL,
                    });
                    self.scratch.push(Command::RestoreEnergy {
                        hero: ally.id,
                        amount: SURGE_ENERGY,
                    });
                }
            }
            SkillKind::SeismicShot => {
                let Some(front) = nearest(base, SEISMIC_SEARCH, monsters.iter()) else {
                    return self.no_target(hero, skill);
                };
                for monster in in_range(front.position, SEISMIC_RADIUS, monsters.iter()) {
                    self.strike(monster, SEISMIC_DAMAGE, element);
                    if self.rng.gen_bool(self.knockback_chance) {
                        self.status(
                            AgentRef::Monster(monster.id),
                            StatusEffect::Knockback,
                            KNOCKBACK_DURATION,
                        );
                    }
                }
            }
            SkillKind::PetrifiedSkin => {
                self.buff(
                    hero,
                    HeroBuff::Defense {
                        bonus: PETRIFIED_DEFENSE,
                    },
                    PETRIFIED_DURATION,
                );
                for monster in in_range(position, PETRIFIED_TAUNT_RADIUS, monsters.iter()) {
                    self.status(
                        AgentRef::Monster(monster.id),
                        StatusEffect::Taunt { hero },
                        PETRIFIED_DURATION,
                    );
                }
            }
            SkillKind::MireTrap => {
                let far = in_range(position, MIRE_SEARCH, monsters.iter())
                    .into_iter()
                    .map(|monster| monster.position)
                    .filter(|spot| spot.distance(position) > MIRE_MIN_DISTANCE);
                let Some(centre) = Position::centroid(far) else {
                    return self.no_target(hero, skill);
                };
                self.slow_around(centre, MIRE_RADIUS, MIRE_SLOW, MIRE_DURATION, monsters);
            }
        }
    }

    fn chain(&mut self, hero: HeroId, position: Position, monsters: &MonsterView) {
        let candidates = in_range(position, CHAIN_SEARCH, monsters.iter());
        let (min, max) = CHAIN_BAND;
        let first = first_in_band(position, min, max, candidates.iter().copied())
            .or_else(|| candidates.first().copied());
        let Some(mut current) = first else {
            return self.no_target(hero, SkillKind::ChainLightning);
        };

        let mut struck = Vec::with_capacity(CHAIN_HITS);
        loop {
            self.strike(current, CHAIN_DAMAGE, Element::Thunder);
            struck.push(current.id);
            if struck.len() == CHAIN_HITS {
                break;
            }
            let next = in_range(current.position, CHAIN_BOUNCE, monsters.iter())
                .into_iter()
                .find(|monster| !struck.contains(&monster.id));
            match next {
                Some(monster) => current = monster,
                None => break,
            }
        }
    }

    fn blast(
        &mut self,
        centre: Position,
        radius: f32,
        damage: f32,
        element: Element,
        monsters: &MonsterView,
    ) {
        for monster in in_range(centre, radius, monsters.iter()) {
            self.strike(monster, damage, element);
        }
    }

    fn slow_around(
        &mut self,
        centre: Position,
        radius: f32,
        fraction: f32,
        duration: Duration,
        monsters: &MonsterView,
    ) {
        for monster in in_range(centre, radius, monsters.iter()) {
            self.status(
                AgentRef::Monster(monster.id),
                StatusEffect::Slow { fraction },
                duration,
            );
        }
    }

    fn strike(&mut self, monster: &MonsterSnapshot, base: f32, element: Element) {
        self.scratch.push(Command::DealDamage {
            target: AgentRef::Monster(monster.id),
            amount: final_damage(base, element, &DefenderProfile::from(monster)),
            element,
        });
    }

    fn status(&mut self, target: AgentRef, effect: StatusEffect, duration: Duration) {
        self.scratch.push(Command::ApplyStatus {
            target,
            effect,
            duration,
        });
    }

    fn buff(&mut self, hero: HeroId, buff: HeroBuff, duration: Duration) {
        self.scratch.push(Command::GrantBuff {
            hero,
            buff,
            duration,
        });
    }

    fn no_target(&self, hero: HeroId, skill: SkillKind) {
        debug!(hero = hero.get(), skill = skill.id(), "skill found no target");
    }
}

impl Default for SkillEffects {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Whether `point` lies on the pierce line cast from `from` toward `aim`.
fn on_segment(from: Position, aim: Position, point: Position) -> bool {
    let (dx, dz) = (aim.x() - from.x(), aim.z() - from.z());
    let length = (dx * dx + dz * dz).sqrt();
    let (ux, uz) = if length <= f32::EPSILON {
        (1.0, 0.0)
    } else {
        (dx / length, dz / length)
    };
    let (px, pz) = (point.x() - from.x(), point.z() - from.z());
    let along = px * ux + pz * uz;
    let across = (px * uz - pz * ux).abs();
    (0.0..=PIERCE_LENGTH).contains(&along) && across <= PIERCE_HALF_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{hero, monster};
    use ember_keepers_core::{HeroSnapshot, MonsterId};

    fn at(x: f32, z: f32) -> Position {
        Position::new(x, z)
    }

    fn used(skill: SkillKind, position: Position) -> Event {
        Event::SkillUsed {
            hero: HeroId::new(0),
            skill,
            position,
        }
    }

    fn resolve(
        effects: &mut SkillEffects,
        event: Event,
        heroes: Vec<HeroSnapshot>,
        monsters: Vec<MonsterSnapshot>,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        effects.handle(
            &[event],
            &HeroView::from_snapshots(heroes),
            &MonsterView::from_snapshots(monsters),
            Position::ORIGIN,
            &mut out,
        );
        out
    }

    fn damaged(commands: &[Command]) -> Vec<(u32, f32)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::DealDamage {
                    target: AgentRef::Monster(monster),
                    amount,
                    ..
                } => Some((monster.get(), *amount)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn molten_armor_burns_adjacent_monsters_and_shields_the_owner() {
        let mut effects = SkillEffects::default();
        let out = resolve(
            &mut effects,
            used(SkillKind::MoltenArmor, at(0.0, 0.0)),
            Vec::new(),
            vec![monster(0, at(2.0, 0.0)), monster(1, at(4.0, 0.0))],
        );
        assert_eq!(damaged(&out), vec![(0, 30.0)]);
        assert!(out.contains(&Command::ApplyStatus {
            target: AgentRef::Hero(HeroId::new(0)),
            effect: StatusEffect::Shield { amount: 50.0 },
            duration: Duration::from_secs(5),
        }));
    }

    #[test]
    fn chain_lightning_starts_in_band_and_stops_after_five_hits() {
        let mut effects = SkillEffects::default();
        let monsters = (0..6)
            .map(|id| monster(id, at(5.0 + 4.0 * id as f32, 0.0)))
            .collect();
        let out = resolve(
            &mut effects,
            used(SkillKind::ChainLightning, at(0.0, 0.0)),
            Vec::new(),
            monsters,
        );
        assert_eq!(
            damaged(&out),
            vec![(0, 25.0), (1, 25.0), (2, 25.0), (3, 25.0), (4, 25.0)]
        );
    }

    #[test]
    fn chain_lightning_falls_back_to_the_first_monster_in_range() {
        let mut effects = SkillEffects::default();
        let out = resolve(
            &mut effects,
            used(SkillKind::ChainLightning, at(0.0, 0.0)),
            Vec::new(),
            vec![monster(0, at(1.0, 0.0)), monster(1, at(0.0, 11.0))],
        );
        assert_eq!(damaged(&out), vec![(0, 25.0)]);
    }

    #[test]
    fn frost_pierce_hits_only_the_line() {
        let mut effects = SkillEffects::default();
        let out = resolve(
            &mut effects,
            used(SkillKind::FrostPierce, at(0.0, 0.0)),
            Vec::new(),
            vec![
                monster(0, at(6.0, 0.0)),
                monster(1, at(12.0, 0.5)),
                monster(2, at(12.0, 2.0)),
                monster(3, at(-3.0, 0.0)),
                monster(4, at(16.0, 0.0)),
            ],
        );
        assert_eq!(damaged(&out), vec![(0, 35.0), (1, 35.0)]);
        let slowed = out
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    Command::ApplyStatus {
                        effect: StatusEffect::Slow { .. },
                        ..
                    }
                )
            })
            .count();
        assert_eq!(slowed, 2);
    }

    #[test]
    fn purifying_flame_strips_empowerment() {
        let mut effects = SkillEffects::default();
        let mut empowered = monster(1, at(6.0, 0.0));
        empowered.statuses.push(StatusKind::Empowered);
        let out = resolve(
            &mut effects,
            used(SkillKind::PurifyingFlame, at(0.0, 0.0)),
            Vec::new(),
            vec![monster(0, at(4.0, 0.0)), empowered, monster(2, at(8.0, 0.0))],
        );
        assert_eq!(damaged(&out).len(), 3);
        assert!(out.contains(&Command::ClearStatus {
            target: AgentRef::Monster(MonsterId::new(1)),
            kind: StatusKind::Empowered,
        }));
    }

    #[test]
    fn knockback_rolls_follow_the_configured_chance() {
        let pack: Vec<MonsterSnapshot> = (0..8).map(|id| monster(id, at(2.0, 0.0))).collect();
        let knockbacks = |chance: f64, seed: u64| {
            let mut effects = SkillEffects::new(Config::new(seed, chance));
            resolve(
                &mut effects,
                used(SkillKind::SeismicShot, at(0.0, 0.0)),
                Vec::new(),
                pack.clone(),
            )
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    Command::ApplyStatus {
                        effect: StatusEffect::Knockback,
                        ..
                    }
                )
            })
            .count()
        };
        assert_eq!(knockbacks(0.0, 1), 0);
        assert_eq!(knockbacks(1.0, 1), 8);
        assert_eq!(knockbacks(0.7, 99), knockbacks(0.7, 99));
    }

    #[test]
    fn energy_surge_skips_the_caster() {
        let mut effects = SkillEffects::default();
        let out = resolve(
            &mut effects,
            used(SkillKind::EnergySurge, at(0.0, 0.0)),
            vec![
                hero(0, SkillKind::EnergySurge, at(0.0, 0.0)),
                hero(1, SkillKind::FrostPierce, at(3.0, 0.0)),
                hero(2, SkillKind::MireTrap, at(30.0, 0.0)),
            ],
            Vec::new(),
        );
        assert_eq!(
            out,
            vec![
                Command::HealHero {
                    hero: HeroId::new(1),
                    amount: 30.0,
                },
                Command::RestoreEnergy {
                    hero: HeroId::new(1),
                    amount: 20.0,
                },
            ]
        );
    }

    #[test]
    fn shock_pulses_resolve_thunder_against_affinity() {
        let mut effects = SkillEffects::default();
        let mut earthen = monster(0, at(3.0, 0.0));
        earthen.affinity = Element::Earth;
        let pulse = Event::ShockPulse {
            hero: HeroId::new(0),
            origin: at(0.0, 0.0),
            radius: 4.0,
            damage: 15.0,
        };
        let out = resolve(
            &mut effects,
            pulse,
            Vec::new(),
            vec![earthen, monster(1, at(5.0, 0.0))],
        );
        assert_eq!(damaged(&out), vec![(0, 22.5)]);
    }

    #[test]
    fn targetless_skills_emit_nothing() {
        let mut effects = SkillEffects::default();
        for skill in [
            SkillKind::FrostPierce,
            SkillKind::IceBarrier,
            SkillKind::ChainLightning,
            SkillKind::SeismicShot,
            SkillKind::MireTrap,
            SkillKind::PurifyingFlame,
        ] {
            let out = resolve(&mut effects, used(skill, at(0.0, 0.0)), Vec::new(), Vec::new());
            assert!(out.is_empty(), "{skill:?}");
        }
    }
}
