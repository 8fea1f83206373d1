#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn coordinator that turns wave manifests into monster spawn commands.
//!
//! Each spawn group of a manifest owns an independent timer driven by the
//! `TimeAdvanced` events of the tick loop: wait the initial delay, spawn, wait
//! the interval, spawn again until the group's count is exhausted. Groups never
//! block one another. The coordinator tracks the monsters it created and
//! reports the wave as cleared once every group has drained and none of them
//! remain alive.

use std::{collections::BTreeSet, f32::consts::TAU, time::Duration};

use ember_keepers_core::{
    Command, Event, MonsterId, Position, SpawnGroup, TemplateId, TemplateSource, WaveManifest,
    WaveNumber,
};
use tracing::{debug, warn};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const BOSS_LEVEL: u32 = 1;

/// Configuration parameters required to construct the spawn coordinator.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    ring_radius: f32,
    ring_points: u32,
    boss_offset: f32,
    summon_spread: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with `ring_points` spawn points on a circle of
    /// `ring_radius` around the base and the boss staged `boss_offset` beyond it.
    #[must_use]
    pub const fn new(ring_radius: f32, ring_points: u32, boss_offset: f32, rng_seed: u64) -> Self {
        Self {
            ring_radius,
            ring_points,
            boss_offset,
            summon_spread: 2.0,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(20.0, 8, 4.0, 0x5eed_0f_e1de_12)
    }
}

#[derive(Clone, Debug)]
struct GroupTimer {
    monster: TemplateId,
    level: u32,
    remaining: u32,
    interval: Duration,
    next_in: Duration,
}

impl GroupTimer {
    fn new(group: &SpawnGroup) -> Self {
        Self {
            monster: group.monster.clone(),
            level: group.level.max(1),
            remaining: group.count,
            interval: group.interval,
            next_in: group.initial_delay,
        }
    }

    fn drained(&self) -> bool {
        self.remaining == 0
    }

    /// Number of spawns that fall due within `elapsed`.
    fn advance(&mut self, elapsed: Duration) -> u32 {
        let mut budget = elapsed;
        let mut due = 0;
        while self.remaining > 0 {
            if self.next_in > budget {
                self.next_in -= budget;
                break;
            }
            budget -= self.next_in;
            self.remaining -= 1;
            due += 1;
            self.next_in = self.interval;
        }
        due
    }
}

/// Pure system that runs the spawn groups of the active wave.
#[derive(Debug)]
pub struct SpawnCoordinator {
    config: Config,
    wave: Option<WaveNumber>,
    groups: Vec<GroupTimer>,
    pending_boss: Option<TemplateId>,
    awaiting_confirmation: u32,
    active: BTreeSet<MonsterId>,
    spawned: u32,
    rng_state: u64,
}

impl SpawnCoordinator {
    /// Creates a new coordinator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            wave: None,
            groups: Vec::new(),
            pending_boss: None,
            awaiting_confirmation: 0,
            active: BTreeSet::new(),
            spawned: 0,
            rng_state: config.rng_seed,
        }
    }

    /// Arms the timers of every spawn group in `manifest`.
    ///
    /// Any wave still running is abandoned.
    pub fn spawn_wave(&mut self, manifest: &WaveManifest) {
        if let Some(previous) = self.wave {
            warn!(wave = previous.get(), "abandoning unfinished wave");
        }
        self.reset();
        self.wave = Some(manifest.wave);
        self.groups = manifest.groups.iter().map(GroupTimer::new).collect();
        self.pending_boss = manifest.boss.clone();
    }

    /// Drops every timer and forgets tracked monsters.
    pub fn reset(&mut self) {
        self.wave = None;
        self.groups.clear();
        self.pending_boss = None;
        self.awaiting_confirmation = 0;
        self.active.clear();
        self.spawned = 0;
    }

    /// Forgets spawn requests among `dropped` that never reached the world.
    ///
    /// The wave then clears once its remaining monsters are gone instead of
    /// waiting for confirmations that will never arrive. Returns how many
    /// requests were withdrawn.
    pub fn abandon_unapplied(&mut self, dropped: &[Command]) -> u32 {
        let requests = dropped
            .iter()
            .filter(|command| matches!(command, Command::SpawnMonster { .. }))
            .count();
        let withdrawn = u32::try_from(requests)
            .unwrap_or(u32::MAX)
            .min(self.awaiting_confirmation);
        self.awaiting_confirmation -= withdrawn;
        self.spawned = self.spawned.saturating_sub(withdrawn);
        if withdrawn > 0 {
            warn!(withdrawn, "spawn requests were never applied");
        }
        withdrawn
    }

    /// Number of living monsters that belong to the running wave.
    #[must_use]
    pub fn active_monster_count(&self) -> usize {
        self.active.len()
    }

    /// Wave whose groups are running, if any.
    #[must_use]
    pub fn current_wave(&self) -> Option<WaveNumber> {
        self.wave
    }

    /// Reports whether any group still has spawns scheduled.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        self.pending_boss.is_some() || self.groups.iter().any(|group| !group.drained())
    }

    /// Consumes world events, emits spawn commands and reports a cleared wave.
    ///
    /// Returns the wave number exactly once: on the call where every group has
    /// drained and the last monster of the wave is gone.
    pub fn handle(
        &mut self,
        events: &[Event],
        templates: &dyn TemplateSource,
        base: Position,
        out: &mut Vec<Command>,
    ) -> Option<WaveNumber> {
        let wave = self.wave?;

        let mut elapsed: Option<Duration> = None;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    elapsed = Some(elapsed.unwrap_or(Duration::ZERO).saturating_add(*dt));
                }
                Event::MonsterSpawned { monster, .. } => {
                    if self.awaiting_confirmation > 0 {
                        self.awaiting_confirmation -= 1;
                        let _ = self.active.insert(*monster);
                    }
                }
                Event::MonsterDied { monster, .. } => {
                    let _ = self.active.remove(monster);
                }
                Event::SummonRequested {
                    template,
                    count,
                    level,
                    origin,
                    ..
                } => self.spawn_summons(template, *count, *level, *origin, templates, out),
                _ => {}
            }
        }

        if let Some(elapsed) = elapsed {
            if let Some(boss) = self.pending_boss.take() {
                let staging = base.offset(0.0, self.config.ring_radius + self.config.boss_offset);
                let _ = self.emit_spawn(&boss, BOSS_LEVEL, staging, templates, out);
            }

            let mut due = Vec::new();
            for group in &mut self.groups {
                let count = group.advance(elapsed);
                if count > 0 {
                    due.push((group.monster.clone(), group.level, count));
                }
            }
            for (monster, level, count) in due {
                for _ in 0..count {
                    let position = self.select_spawn_point(base);
                    let _ = self.emit_spawn(&monster, level, position, templates, out);
                }
            }
        }

        self.check_cleared(wave)
    }

    fn check_cleared(&mut self, wave: WaveNumber) -> Option<WaveNumber> {
        if self.is_spawning() || self.awaiting_confirmation > 0 || !self.active.is_empty() {
            return None;
        }
        if self.spawned == 0 {
            warn!(wave = wave.get(), "wave produced no monsters; treating it as cleared");
        }
        debug!(wave = wave.get(), spawned = self.spawned, "wave cleared");
        self.reset();
        Some(wave)
    }

    fn spawn_summons(
        &mut self,
        template: &TemplateId,
        count: u32,
        level: u32,
        origin: Position,
        templates: &dyn TemplateSource,
        out: &mut Vec<Command>,
    ) {
        for index in 0..count {
            let angle = TAU * index as f32 / count as f32;
            let position = origin.offset(
                self.config.summon_spread * angle.cos(),
                self.config.summon_spread * angle.sin(),
            );
            let _ = self.emit_spawn(template, level, position, templates, out);
        }
    }

    fn emit_spawn(
        &mut self,
        template: &TemplateId,
        level: u32,
        position: Position,
        templates: &dyn TemplateSource,
        out: &mut Vec<Command>,
    ) -> bool {
        match templates.monster_template(template) {
            Ok(template) => {
                out.push(Command::SpawnMonster {
                    template,
                    level,
                    position,
                });
                self.awaiting_confirmation += 1;
                self.spawned += 1;
                true
            }
            Err(error) => {
                warn!(%error, "skipping spawn");
                false
            }
        }
    }

    fn select_spawn_point(&mut self, base: Position) -> Position {
        if self.config.ring_points == 0 {
            return base.offset(0.0, self.config.ring_radius);
        }
        let value = self.advance_rng();
        let index = (value % u64::from(self.config.ring_points)) as f32;
        let angle = TAU * index / self.config.ring_points as f32;
        base.offset(
            self.config.ring_radius * angle.cos(),
            self.config.ring_radius * angle.sin(),
        )
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
