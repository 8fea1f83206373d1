//! Tunable parameters of a session, loadable from TOML.

use ember_keepers_core::{ENDLESS_LOOP_LENGTH, MAIN_WAVE_COUNT};
use ember_keepers_system_monster_ai::Config as MonsterAiConfig;
use ember_keepers_system_revive::Config as ReviveConfig;
use ember_keepers_system_skills::EffectsConfig;
use ember_keepers_system_spawning::Config as SpawnConfig;
use ember_keepers_system_wave_config::Config as TableConfig;
use ember_keepers_system_waves::Config as WaveConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tuning value that cannot drive a session.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A value is NaN, infinite or below its lower bound.
    #[error("`{field}` must be a finite number of at least {minimum}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Smallest accepted value.
        minimum: f64,
        /// Rejected value.
        value: f64,
    },
    /// A wave count falls outside the authored tables.
    #[error("`{field}` must be between 1 and {maximum}, got {value}")]
    WaveCount {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Largest accepted value.
        maximum: u32,
        /// Rejected value.
        value: u32,
    },
}

/// Wave sequencing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    /// Waves before endless mode.
    pub main_wave_count: u32,
    /// Manifests in the endless rotation.
    pub endless_loop_length: u32,
    /// Seed of the endless start offsets.
    pub table_seed: u64,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            main_wave_count: MAIN_WAVE_COUNT,
            endless_loop_length: ENDLESS_LOOP_LENGTH,
            table_seed: 0x00e4_b3e5,
        }
    }
}

/// Spawn placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Radius of the spawn ring around the base.
    pub ring_radius: f32,
    /// Evenly spaced points on the ring.
    pub ring_points: u32,
    /// Distance of the boss staging point beyond the ring.
    pub boss_offset: f32,
    /// Seed of the spawn point selection.
    pub seed: u64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            ring_radius: 20.0,
            ring_points: 8,
            boss_offset: 4.0,
            seed: 0x5eed_0f_e1de_12,
        }
    }
}

/// Hero revival pricing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviveSettings {
    /// Price of the first paid revive.
    pub base_cost: u32,
    /// Growth of the price with every paid revive of the same hero.
    pub cost_multiplier: f64,
    /// Waves a fallen hero waits for its free revive.
    pub free_revive_delay: f64,
}

impl Default for ReviveSettings {
    fn default() -> Self {
        Self {
            base_cost: 100,
            cost_multiplier: 1.5,
            free_revive_delay: 2.0,
        }
    }
}

/// Skill effect resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    /// Chance that a seismic shot knocks a monster back.
    pub knockback_chance: f64,
    /// Seed of the knockback rolls.
    pub seed: u64,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            knockback_chance: 0.7,
            seed: 0x5ca1_ab1e,
        }
    }
}

/// Every tunable of a session.
///
/// Absent TOML keys keep their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gold granted when a new game starts.
    pub starting_gold: u32,
    /// Health of the built-in base.
    pub base_health: f32,
    /// Distance at which monsters strike.
    pub melee_range: f32,
    /// Rounds of command resolution allowed within one tick.
    pub max_pump_depth: usize,
    /// Seed of the loot rolls.
    pub loot_seed: u64,
    /// Wave sequencing.
    pub waves: WaveSettings,
    /// Spawn placement.
    pub spawn: SpawnSettings,
    /// Hero revival pricing.
    pub revive: ReviveSettings,
    /// Skill effect resolution.
    pub skills: SkillSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_gold: 100,
            base_health: 1_000.0,
            melee_range: 2.0,
            max_pump_depth: 16,
            loot_seed: 0x10_07,
            waves: WaveSettings::default(),
            spawn: SpawnSettings::default(),
            revive: ReviveSettings::default(),
            skills: SkillSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Replaces every seed with one derived from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.loot_seed = seed;
        self.waves.table_seed = seed.rotate_left(16);
        self.spawn.seed = seed.rotate_left(32);
        self.skills.seed = seed.rotate_left(48);
        self
    }

    /// Rejects values that would leave the session in an invalid state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("base_health", f64::from(self.base_health), f64::MIN_POSITIVE)?;
        at_least("melee_range", f64::from(self.melee_range), 0.0)?;
        at_least("spawn.ring_radius", f64::from(self.spawn.ring_radius), 0.0)?;
        at_least("spawn.boss_offset", f64::from(self.spawn.boss_offset), 0.0)?;
        at_least("revive.cost_multiplier", self.revive.cost_multiplier, 0.0)?;
        at_least("revive.free_revive_delay", self.revive.free_revive_delay, 0.0)?;
        at_least("skills.knockback_chance", self.skills.knockback_chance, 0.0)?;
        at_least("max_pump_depth", self.max_pump_depth as f64, 1.0)?;
        wave_count(
            "waves.main_wave_count",
            self.waves.main_wave_count,
            MAIN_WAVE_COUNT,
        )?;
        wave_count(
            "waves.endless_loop_length",
            self.waves.endless_loop_length,
            ENDLESS_LOOP_LENGTH,
        )?;
        Ok(())
    }

    pub(crate) fn wave_config(&self) -> WaveConfig {
        WaveConfig::new(self.waves.main_wave_count, self.waves.endless_loop_length)
    }

    pub(crate) fn table_config(&self) -> TableConfig {
        TableConfig::new(self.waves.table_seed)
    }

    pub(crate) fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig::new(
            self.spawn.ring_radius,
            self.spawn.ring_points,
            self.spawn.boss_offset,
            self.spawn.seed,
        )
    }

    pub(crate) fn revive_config(&self) -> ReviveConfig {
        ReviveConfig::new(
            self.revive.base_cost,
            self.revive.cost_multiplier,
            self.revive.free_revive_delay,
        )
    }

    pub(crate) fn effects_config(&self) -> EffectsConfig {
        EffectsConfig::new(self.skills.seed, self.skills.knockback_chance)
    }

    pub(crate) fn monster_ai_config(&self) -> MonsterAiConfig {
        MonsterAiConfig::new(self.melee_range)
    }
}

fn at_least(field: &'static str, value: f64, minimum: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= minimum {
        return Ok(());
    }
    Err(ConfigError::OutOfRange {
        field,
        minimum,
        value,
    })
}

fn wave_count(field: &'static str, value: u32, maximum: u32) -> Result<(), ConfigError> {
    if (1..=maximum).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::WaveCount {
        field,
        maximum,
        value,
    })
}
