#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for Ember Keepers.
//!
//! Every hero and monster lives here. Systems never mutate agents directly;
//! they submit [`Command`] values to [`apply`] and observe the resulting
//! [`Event`] stream.

mod abilities;
mod heroes;
mod monsters;
mod status;
mod vitals;

use std::{collections::BTreeMap, mem, time::Duration};

use ember_keepers_core::{
    AgentRef, Command, Element, Event, HeroId, MonsterId, StatusEffect, StatusKind, StrikeTarget,
};
use tracing::debug;

use crate::{
    abilities::AbilityEffect,
    heroes::HeroState,
    monsters::{MonsterState, TriggeredEffect},
};

/// Skill cooldowns are multiplied by this factor while a suppression is active.
const SUPPRESSED_COOLDOWN_SCALE: u32 = 2;

/// Represents the authoritative Ember Keepers world state.
#[derive(Debug, Default)]
pub struct World {
    heroes: BTreeMap<HeroId, HeroState>,
    monsters: BTreeMap<MonsterId, MonsterState>,
    next_hero_id: u32,
    next_monster_id: u32,
    suppression: Option<Duration>,
    tick_index: u64,
    triggered: Vec<TriggeredEffect>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        if let Some(remaining) = self.suppression {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.suppression = None;
                out_events.push(Event::SuppressionEnded);
            } else {
                self.suppression = Some(remaining);
            }
        }

        for hero in self.heroes.values_mut() {
            hero.advance(dt, out_events);
        }

        let mut triggered = mem::take(&mut self.triggered);
        for monster in self.monsters.values_mut() {
            monster.advance(dt, out_events, &mut triggered);
        }
        self.resolve_effects(&mut triggered, out_events);
        self.triggered = triggered;
    }

    fn resolve_effects(
        &mut self,
        triggered: &mut Vec<TriggeredEffect>,
        out_events: &mut Vec<Event>,
    ) {
        for TriggeredEffect {
            monster,
            origin,
            effect,
        } in triggered.drain(..)
        {
            match effect {
                AbilityEffect::Summon {
                    template,
                    count,
                    level,
                } => out_events.push(Event::SummonRequested {
                    summoner: monster,
                    template,
                    count,
                    level,
                    origin,
                }),
                AbilityEffect::ShiftWeakness {
                    previous,
                    previous_resistance,
                    next,
                    next_resistance,
                } => {
                    if let Some(state) = self.monsters.get_mut(&monster) {
                        state.resistances.set(previous, previous_resistance);
                        state.resistances.set(next, next_resistance);
                        out_events.push(Event::WeaknessShifted {
                            monster,
                            weakness: next,
                        });
                    }
                }
                AbilityEffect::Suppress { duration } => {
                    self.suppression = Some(duration);
                    out_events.push(Event::SuppressionStarted { monster, duration });
                }
                AbilityEffect::Rally {
                    radius,
                    bonus,
                    duration,
                } => out_events.push(Event::RallyPulse {
                    monster,
                    origin,
                    radius,
                    bonus,
                    duration,
                }),
                AbilityEffect::Chill {
                    radius,
                    fraction,
                    duration,
                } => out_events.push(Event::ChillPulse {
                    monster,
                    origin,
                    radius,
                    fraction,
                    duration,
                }),
                AbilityEffect::Burst {
                    radius,
                    damage,
                    element,
                } => out_events.push(Event::DeathBurst {
                    monster,
                    origin,
                    radius,
                    damage,
                    element,
                }),
            }
        }
    }

    fn damage_monster(
        &mut self,
        monster: MonsterId,
        amount: f32,
        element: Element,
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.monsters.get_mut(&monster) else {
            return;
        };
        let hit = state.vitals.damage(amount);
        if hit.dealt > 0.0 {
            out_events.push(Event::MonsterDamaged {
                monster,
                amount: hit.dealt,
                element,
            });
        }
        if !hit.killed {
            return;
        }
        let Some(mut fallen) = self.monsters.remove(&monster) else {
            return;
        };
        let mut triggered = mem::take(&mut self.triggered);
        fallen.died(&mut triggered);
        self.resolve_effects(&mut triggered, out_events);
        self.triggered = triggered;
        out_events.push(Event::MonsterDied {
            monster,
            template: fallen.template,
            rank: fallen.rank,
            position: fallen.position,
            gold_drop: fallen.gold_drop,
        });
    }

    fn damage_hero(&mut self, hero: HeroId, amount: f32, out_events: &mut Vec<Event>) {
        let tick_index = self.tick_index;
        let Some(state) = self.heroes.get_mut(&hero) else {
            return;
        };
        let hit = state.take_damage(amount, tick_index);
        if hit.dealt > 0.0 {
            out_events.push(Event::HeroDamaged {
                hero,
                amount: hit.dealt,
            });
        }
        if hit.killed {
            out_events.push(Event::HeroDied { hero });
        }
    }

    fn resolve_hero_strike(
        &mut self,
        hero: HeroId,
        monster: MonsterId,
        amount: f32,
        element: Element,
        out_events: &mut Vec<Event>,
    ) {
        let target_alive = self.monsters.contains_key(&monster);
        let Some(attacker) = self.heroes.get_mut(&hero) else {
            return;
        };
        if !target_alive || !attacker.is_fighting() || !attacker.attack_ready() {
            debug!(hero = hero.get(), monster = monster.get(), "hero strike rejected");
            return;
        }
        attacker.start_attack_cooldown();
        self.damage_monster(monster, amount, element, out_events);
    }

    fn resolve_monster_strike(
        &mut self,
        monster: MonsterId,
        target: StrikeTarget,
        amount: f32,
        out_events: &mut Vec<Event>,
    ) {
        if let StrikeTarget::Hero(hero) = target {
            if !self.heroes.get(&hero).is_some_and(HeroState::is_fighting) {
                debug!(
                    monster = monster.get(),
                    hero = hero.get(),
                    "monster strike lost its target"
                );
                return;
            }
        }
        let mut triggered = mem::take(&mut self.triggered);
        match self.monsters.get_mut(&monster) {
            Some(attacker) if attacker.attack_ready() => {
                attacker.start_attack_cooldown();
                attacker.landed_strike(&mut triggered);
            }
            _ => {
                self.triggered = triggered;
                return;
            }
        }
        match target {
            StrikeTarget::Hero(hero) => self.damage_hero(hero, amount, out_events),
            StrikeTarget::Base => out_events.push(Event::BaseStruck { monster, amount }),
        }
        self.resolve_effects(&mut triggered, out_events);
        self.triggered = triggered;
    }

    fn use_skill(&mut self, hero: HeroId, out_events: &mut Vec<Event>) {
        let scale = if self.suppression.is_some() {
            SUPPRESSED_COOLDOWN_SCALE
        } else {
            1
        };
        let Some(state) = self.heroes.get_mut(&hero) else {
            debug!(hero = hero.get(), "skill requested for unknown hero");
            return;
        };
        let skill = state.skill.kind();
        if state.is_fighting() && state.try_use_skill(scale) {
            out_events.push(Event::SkillUsed {
                hero,
                skill,
                position: state.position,
            });
        } else {
            out_events.push(Event::SkillRejected { hero, skill });
        }
    }

    fn apply_status(&mut self, target: AgentRef, effect: StatusEffect, duration: Duration) -> bool {
        match target {
            AgentRef::Hero(id) => match self.heroes.get_mut(&id) {
                Some(hero) if hero.vitals.is_alive() => {
                    hero.statuses.apply(effect, duration);
                    true
                }
                _ => false,
            },
            AgentRef::Monster(id) => match self.monsters.get_mut(&id) {
                Some(monster) => {
                    monster.statuses.apply(effect, duration);
                    true
                }
                None => false,
            },
        }
    }

    fn clear_status(&mut self, target: AgentRef, kind: StatusKind) -> bool {
        match target {
            AgentRef::Hero(id) => self
                .heroes
                .get_mut(&id)
                .is_some_and(|hero| hero.statuses.clear(kind)),
            AgentRef::Monster(id) => self
                .monsters
                .get_mut(&id)
                .is_some_and(|monster| monster.statuses.clear(kind)),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::ResetWorld => {
            *world = World::new();
            out_events.push(Event::WorldReset);
        }
        Command::RecruitHero { template } => {
            let hero = HeroId::new(world.next_hero_id);
            world.next_hero_id = world.next_hero_id.saturating_add(1);
            let template_id = template.id.clone();
            let _ = world.heroes.insert(hero, HeroState::recruit(hero, template));
            out_events.push(Event::HeroRecruited {
                hero,
                template: template_id,
            });
        }
        Command::DeployHero { hero, position } => match world.heroes.get_mut(&hero) {
            Some(state) if state.vitals.is_alive() => {
                state.deploy(position);
                out_events.push(Event::HeroDeployed { hero, position });
            }
            _ => debug!(hero = hero.get(), "deploy rejected"),
        },
        Command::BenchHero { hero } => {
            if let Some(state) = world.heroes.get_mut(&hero) {
                if state.is_deployed() {
                    state.bench();
                    out_events.push(Event::HeroBenched { hero });
                }
            }
        }
        Command::EquipItem { hero, slot, item } => {
            let item_id = item.id.clone();
            let equipped = world
                .heroes
                .get_mut(&hero)
                .is_some_and(|state| state.equip(slot, item));
            if equipped {
                out_events.push(Event::EquipmentChanged {
                    hero,
                    slot,
                    item: Some(item_id),
                });
            } else {
                out_events.push(Event::EquipmentRejected { hero, slot });
            }
        }
        Command::UnequipItem { hero, slot } => {
            let removed = world
                .heroes
                .get_mut(&hero)
                .is_some_and(|state| state.unequip(slot));
            if removed {
                out_events.push(Event::EquipmentChanged {
                    hero,
                    slot,
                    item: None,
                });
            } else {
                out_events.push(Event::EquipmentRejected { hero, slot });
            }
        }
        Command::SpawnMonster {
            template,
            level,
            position,
        } => {
            let monster = MonsterId::new(world.next_monster_id);
            world.next_monster_id = world.next_monster_id.saturating_add(1);
            let state = MonsterState::spawn(monster, &template, level, position);
            out_events.push(Event::MonsterSpawned {
                monster,
                template: template.id,
                rank: template.rank,
                level: level.max(1),
                position,
            });
            let _ = world.monsters.insert(monster, state);
        }
        Command::MoveMonster { monster, to } => {
            if let Some(state) = world.monsters.get_mut(&monster) {
                state.position = to;
            }
        }
        Command::MoveHero { hero, to } => {
            if let Some(state) = world.heroes.get_mut(&hero) {
                if state.is_fighting() {
                    state.position = to;
                }
            }
        }
        Command::HeroStrike {
            hero,
            monster,
            amount,
            element,
        } => world.resolve_hero_strike(hero, monster, amount, element, out_events),
        Command::MonsterStrike {
            monster,
            target,
            amount,
        } => world.resolve_monster_strike(monster, target, amount, out_events),
        Command::DealDamage {
            target,
            amount,
            element,
        } => match target {
            AgentRef::Monster(monster) => {
                world.damage_monster(monster, amount, element, out_events)
            }
            AgentRef::Hero(hero) => world.damage_hero(hero, amount, out_events),
        },
        Command::UseSkill { hero } => world.use_skill(hero, out_events),
        Command::GrantBuff {
            hero,
            buff,
            duration,
        } => {
            if let Some(state) = world.heroes.get_mut(&hero) {
                if state.vitals.is_alive() {
                    state.grant_buff(buff, duration);
                    out_events.push(Event::BuffGranted { hero, buff });
                }
            }
        }
        Command::ApplyStatus {
            target,
            effect,
            duration,
        } => {
            if world.apply_status(target, effect, duration) {
                out_events.push(Event::StatusApplied {
                    target,
                    effect,
                    duration,
                });
            }
        }
        Command::ClearStatus { target, kind } => {
            if world.clear_status(target, kind) {
                out_events.push(Event::StatusExpired { target, kind });
            }
        }
        Command::HealHero { hero, amount } => {
            if let Some(state) = world.heroes.get_mut(&hero) {
                let healed = state.vitals.heal(amount);
                if healed > 0.0 {
                    out_events.push(Event::HeroHealed {
                        hero,
                        amount: healed,
                    });
                }
            }
        }
        Command::RestoreEnergy { hero, amount } => {
            if let Some(state) = world.heroes.get_mut(&hero) {
                let _ = state.restore_energy(amount);
            }
        }
        Command::ReviveHero {
            hero,
            health_fraction,
            paid,
        } => {
            let revived = world
                .heroes
                .get_mut(&hero)
                .is_some_and(|state| state.revive(health_fraction));
            if revived {
                out_events.push(Event::HeroRevived { hero, paid });
            } else {
                debug!(hero = hero.get(), "revive ignored");
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ember_keepers_core::{
        HeroId, HeroSnapshot, HeroView, MonsterId, MonsterSnapshot, MonsterView,
    };

    use super::World;

    /// Captures a read-only view of every recruited hero.
    #[must_use]
    pub fn hero_view(world: &World) -> HeroView {
        HeroView::from_snapshots(world.heroes.values().map(|hero| hero.snapshot()).collect())
    }

    /// Captures a read-only view of every living monster.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(
            world
                .monsters
                .values()
                .map(|monster| monster.snapshot())
                .collect(),
        )
    }

    /// Snapshot of a single hero.
    #[must_use]
    pub fn hero(world: &World, hero: HeroId) -> Option<HeroSnapshot> {
        world.heroes.get(&hero).map(|state| state.snapshot())
    }

    /// Snapshot of a single monster.
    #[must_use]
    pub fn monster(world: &World, monster: MonsterId) -> Option<MonsterSnapshot> {
        world.monsters.get(&monster).map(|state| state.snapshot())
    }

    /// Number of living monsters.
    #[must_use]
    pub fn monster_count(world: &World) -> usize {
        world.monsters.len()
    }

    /// Reports whether skill cooldowns are currently doubled.
    #[must_use]
    pub fn suppression_active(world: &World) -> bool {
        world.suppression.is_some()
    }

    /// Number of ticks processed since the world was created or reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
