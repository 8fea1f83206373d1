//! Immutable captures of agent state handed to systems.

use std::time::Duration;

use crate::{
    Element, HeroClass, HeroId, MonsterId, MonsterRank, Position, Resistances, SkillKind,
    StatusKind, TemplateId,
};

/// Read-only snapshot describing a hero.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Identifier allocated at recruitment.
    pub id: HeroId,
    /// Template the hero was built from.
    pub template: TemplateId,
    /// Element of the hero's attacks.
    pub element: Element,
    /// Combat role.
    pub class: HeroClass,
    /// Current location.
    pub position: Position,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Current energy.
    pub energy: f32,
    /// Energy capacity.
    pub max_energy: f32,
    /// Skill in the active slot.
    pub skill: SkillKind,
    /// Time until the skill leaves cooldown.
    pub skill_cooldown_remaining: Duration,
    /// Energy consumed by the skill.
    pub skill_energy_cost: f32,
    /// Whether the hero is on the battlefield.
    pub deployed: bool,
    /// Whether the auto-attack timer has elapsed.
    pub attack_ready: bool,
    /// Damage of an auto-attack.
    pub attack_damage: f32,
    /// Distance at which auto-attacks connect.
    pub attack_range: f32,
    /// Distance at which targets are acquired.
    pub detection_range: f32,
    /// Movement speed.
    pub move_speed: f32,
    /// Flat reduction applied to incoming hits.
    pub physical_defense: f32,
    /// Damage reduction per element.
    pub resistances: Resistances,
    /// Tick index at which the hero last fell, while dead.
    pub fallen_at_tick: Option<u64>,
    /// Statuses currently applied.
    pub statuses: Vec<StatusKind>,
}

impl HeroSnapshot {
    /// `health > 0`.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health as a fraction of maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    /// Cooldown elapsed and enough energy banked.
    #[must_use]
    pub fn skill_ready(&self) -> bool {
        self.skill_cooldown_remaining.is_zero() && self.energy >= self.skill_energy_cost
    }

    /// Alive and on the battlefield.
    #[must_use]
    pub fn is_fighting(&self) -> bool {
        self.deployed && self.is_alive()
    }
}

/// Collection of hero snapshots in ascending id order.
#[derive(Clone, Debug, Default)]
pub struct HeroView {
    snapshots: Vec<HeroSnapshot>,
}

impl HeroView {
    /// Creates a new hero view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HeroSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured hero snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &HeroSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a hero by identifier.
    #[must_use]
    pub fn get(&self, id: HeroId) -> Option<&HeroSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HeroSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing a monster.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Identifier allocated at spawn.
    pub id: MonsterId,
    /// Template the monster was built from.
    pub template: TemplateId,
    /// Rank of the monster.
    pub rank: MonsterRank,
    /// Level of the monster.
    pub level: u32,
    /// Current location.
    pub position: Position,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Element of the monster's attacks.
    pub affinity: Element,
    /// Damage reduction per element.
    pub resistances: Resistances,
    /// Attack damage including any empowerment.
    pub attack_damage: f32,
    /// Whether the melee timer has elapsed.
    pub attack_ready: bool,
    /// Movement speed.
    pub move_speed: f32,
    /// Hero the monster is forced to pursue.
    pub taunted_by: Option<HeroId>,
    /// Statuses currently applied.
    pub statuses: Vec<StatusKind>,
}

impl MonsterSnapshot {
    /// `health > 0`.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether the monster is a boss.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        matches!(self.rank, MonsterRank::Boss)
    }

    /// Reports whether a status of the provided kind is applied.
    #[must_use]
    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.contains(&kind)
    }
}

/// Collection of monster snapshots in ascending id order.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured monster snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a monster by identifier.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&MonsterSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured monsters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no monsters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}
