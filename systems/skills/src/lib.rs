#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous hero skill usage.
//!
//! [`SkillDecisionEngine`] decides *when* a ready skill is worth casting. Each
//! skill owns a fixed list of [`Trigger`] predicates over the current views
//! and fires only when all of them hold. Readiness itself (cooldown and
//! energy) is owned by the world, which rejects early activations with
//! `Event::SkillRejected`. [`SkillEffects`] turns the resulting
//! `Event::SkillUsed` into damage, status and buff commands.

mod effects;

pub use effects::{Config as EffectsConfig, SkillEffects};

use ember_keepers_core::{Command, Event, HeroSnapshot, HeroView, MonsterView, Position, SkillKind};
use ember_keepers_system_targeting::{count_in_range, in_range};
use tracing::debug;

/// Declarative condition evaluated against the battlefield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// The caster's health fraction is strictly below the threshold.
    OwnerHealthBelow(f32),
    /// At least `at_least` living monsters stand within `radius` of the caster.
    EnemiesWithin {
        /// Search radius around the caster.
        radius: f32,
        /// Minimum number of monsters.
        at_least: usize,
    },
    /// A living non-boss monster stands within the radius of the caster.
    NonBossEnemyWithin(f32),
    /// A living monster stands within the radius of the base.
    EnemyNearBase(f32),
    /// A living monster stands farther than `min` but within `max` of the caster.
    EnemyBetween {
        /// Exclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },
    /// Another fighting hero within `radius` is wounded and short on energy.
    AllyNeedsSupport {
        /// Search radius around the caster.
        radius: f32,
        /// Health fraction the ally must be below.
        health_below: f32,
        /// Energy fraction the ally must be below.
        energy_below: f32,
    },
}

impl Trigger {
    /// Evaluates the predicate for `owner`.
    #[must_use]
    pub fn holds(
        &self,
        owner: &HeroSnapshot,
        heroes: &HeroView,
        monsters: &MonsterView,
        base: Position,
    ) -> bool {
        match *self {
            Trigger::OwnerHealthBelow(threshold) => owner.health_fraction() < threshold,
            Trigger::EnemiesWithin { radius, at_least } => {
                count_in_range(owner.position, radius, monsters.iter()) >= at_least
            }
            Trigger::NonBossEnemyWithin(radius) => in_range(owner.position, radius, monsters.iter())
                .iter()
                .any(|monster| !monster.is_boss()),
            Trigger::EnemyNearBase(radius) => count_in_range(base, radius, monsters.iter()) > 0,
            Trigger::EnemyBetween { min, max } => in_range(owner.position, max, monsters.iter())
                .iter()
                .any(|monster| owner.position.distance(monster.position) > min),
            Trigger::AllyNeedsSupport {
                radius,
                health_below,
                energy_below,
            } => in_range(owner.position, radius, heroes.iter())
                .iter()
                .filter(|ally| ally.id != owner.id)
                .any(|ally| {
                    ally.health_fraction() < health_below
                        && ally.energy < ally.max_energy * energy_below
                }),
        }
    }
}

/// Conditions under which each skill is cast.
#[must_use]
pub const fn triggers(skill: SkillKind) -> &'static [Trigger] {
    match skill {
        SkillKind::BurningSoulBarrage => &[Trigger::NonBossEnemyWithin(10.0)],
        SkillKind::MoltenArmor => &[Trigger::OwnerHealthBelow(0.5)],
        SkillKind::PurifyingFlame => &[Trigger::EnemiesWithin {
            radius: 15.0,
            at_least: 3,
        }],
        SkillKind::FrostPierce => &[Trigger::EnemiesWithin {
            radius: 15.0,
            at_least: 2,
        }],
        SkillKind::AbsoluteZero => &[Trigger::EnemiesWithin {
            radius: 5.0,
            at_least: 6,
        }],
        SkillKind::IceBarrier => &[Trigger::EnemyNearBase(10.0)],
        SkillKind::ChainLightning => &[Trigger::EnemiesWithin {
            radius: 12.0,
            at_least: 2,
        }],
        SkillKind::ChargeOverload => &[Trigger::OwnerHealthBelow(0.7)],
        SkillKind::EnergySurge => &[Trigger::AllyNeedsSupport {
            radius: 8.0,
            health_below: 0.8,
            energy_below: 0.5,
        }],
        SkillKind::SeismicShot => &[Trigger::EnemyNearBase(15.0)],
        SkillKind::PetrifiedSkin => &[
            Trigger::OwnerHealthBelow(0.6),
            Trigger::EnemiesWithin {
                radius: 6.0,
                at_least: 1,
            },
        ],
        SkillKind::MireTrap => &[
            Trigger::EnemiesWithin {
                radius: 24.0,
                at_least: 3,
            },
            Trigger::EnemyBetween {
                min: 5.0,
                max: 24.0,
            },
        ],
    }
}

/// Reports whether every trigger of the owner's skill holds.
#[must_use]
pub fn should_use(
    owner: &HeroSnapshot,
    heroes: &HeroView,
    monsters: &MonsterView,
    base: Position,
) -> bool {
    triggers(owner.skill)
        .iter()
        .all(|trigger| trigger.holds(owner, heroes, monsters, base))
}

/// Issues `UseSkill` for fighting heroes whose ready skill is worth casting.
#[derive(Debug, Default)]
pub struct SkillDecisionEngine {
    scratch: Vec<Command>,
}

impl SkillDecisionEngine {
    /// Creates an engine with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates heuristics once per observed tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        heroes: &HeroView,
        monsters: &MonsterView,
        base: Position,
        out: &mut Vec<Command>,
    ) {
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked {
            return;
        }

        self.scratch.clear();
        for hero in heroes.iter() {
            if !hero.is_fighting() || !hero.skill_ready() {
                continue;
            }
            if should_use(hero, heroes, monsters, base) {
                debug!(hero = hero.id.get(), skill = hero.skill.id(), "casting skill");
                self.scratch.push(Command::UseSkill { hero: hero.id });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
