#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic generator for the main wave sequence and the endless rotation.
//!
//! The output is plain data: twenty authored manifests that escalate from
//! basic whispers to the final boss, followed by a ten-slot endless table.
//! Endless manifests are scaled per loop with [`scaled_for_loop`] when the
//! scheduler looks them up.

use std::time::Duration;

use ember_keepers_core::{SpawnGroup, TemplateId, WaveManifest, WaveNumber};
use sha2::{Digest, Sha256};

/// Count of every endless group before loop scaling.
pub const ENDLESS_BASE_COUNT: u32 = 8;

/// Level of every endless group before loop scaling.
pub const ENDLESS_BASE_LEVEL: u32 = 6;

/// Growth of count and level per completed endless loop.
pub const ENDLESS_SCALE_PER_LOOP: f32 = 0.25;

const ENDLESS_INTERVAL: Duration = Duration::from_millis(500);
const ENDLESS_MAX_OFFSET_MS: f64 = 3_000.0;
const FIRST_ENDLESS_WAVE: u32 = 21;

/// Named monster mix used by one slot of the endless rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndlessTheme {
    /// Short label used in logs.
    pub name: &'static str,
    /// Monster templates spawned as concurrent groups.
    pub monsters: &'static [&'static str],
}

/// The ten endless slots in rotation order.
pub const ENDLESS_THEMES: [EndlessTheme; 10] = [
    EndlessTheme {
        name: "sweep",
        monsters: &["whisper", "cluster"],
    },
    EndlessTheme {
        name: "sweep",
        monsters: &["whisper", "cluster"],
    },
    EndlessTheme {
        name: "haste",
        monsters: &["corroder", "bonewall"],
    },
    EndlessTheme {
        name: "haste",
        monsters: &["corroder", "bonewall"],
    },
    EndlessTheme {
        name: "elemental tide",
        monsters: &["fire_aberration", "ice_aberration", "chaos_mage"],
    },
    EndlessTheme {
        name: "elite tide",
        monsters: &["flame_commander", "earth_devourer"],
    },
    EndlessTheme {
        name: "elite tide",
        monsters: &["flame_commander", "earth_devourer"],
    },
    EndlessTheme {
        name: "fusion and fission",
        monsters: &["cluster", "electric_fission"],
    },
    EndlessTheme {
        name: "frozen shadows",
        monsters: &["frost_golem", "shadow_assassin"],
    },
    EndlessTheme {
        name: "final trial",
        monsters: &["void_aggregate"],
    },
];

/// Configuration parameters required to construct the wave tables.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    seed: u64,
}

impl Config {
    /// Creates a configuration whose endless start offsets derive from `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0x0e3b_e12c_ee9e_25)
    }
}

/// Main sequence followed by the endless rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveTables {
    main: Vec<WaveManifest>,
    endless: Vec<WaveManifest>,
}

impl WaveTables {
    /// Builds both tables.
    #[must_use]
    pub fn generate(config: &Config) -> Self {
        Self {
            main: main_waves(),
            endless: endless_waves(config.seed),
        }
    }

    /// Creates tables from explicit manifests.
    #[must_use]
    pub fn from_manifests(main: Vec<WaveManifest>, endless: Vec<WaveManifest>) -> Self {
        Self { main, endless }
    }

    /// Authored manifests, wave 1 first.
    #[must_use]
    pub fn main(&self) -> &[WaveManifest] {
        &self.main
    }

    /// Unscaled endless manifests in rotation order.
    #[must_use]
    pub fn endless(&self) -> &[WaveManifest] {
        &self.endless
    }
}

/// Authored twenty-wave sequence.
#[must_use]
pub fn main_waves() -> Vec<WaveManifest> {
    let mut waves = Vec::with_capacity(20);
    waves.extend((1..=4).map(basic_wave));
    waves.extend((5..=9).map(elemental_wave));
    waves.push(boss_wave(
        10,
        2.5,
        "boss_desolate_lord",
        vec![group("corroder", 10, 3, 5_000, 300)],
    ));
    waves.extend((11..=14).map(elite_wave));
    waves.push(boss_wave(
        15,
        3.5,
        "boss_eternal_frost",
        vec![group("cluster", 8, 4, 5_000, 1_000)],
    ));
    waves.extend((16..=19).map(advanced_wave));
    waves.push(boss_wave(
        20,
        5.0,
        "boss_rift_heart",
        vec![
            group("flame_commander", 1, 1, 3_000, 0),
            group("frost_golem", 1, 1, 6_000, 0),
            group("earth_devourer", 1, 1, 9_000, 0),
        ],
    ));
    waves
}

/// Unscaled endless rotation; group start offsets derive from `seed`.
#[must_use]
pub fn endless_waves(seed: u64) -> Vec<WaveManifest> {
    ENDLESS_THEMES
        .iter()
        .zip(FIRST_ENDLESS_WAVE..)
        .map(|(theme, wave)| WaveManifest {
            wave: WaveNumber::new(wave),
            difficulty: ENDLESS_BASE_LEVEL as f32 * 0.2,
            boss: None,
            groups: theme
                .monsters
                .iter()
                .map(|monster| SpawnGroup {
                    monster: TemplateId::new(*monster),
                    count: ENDLESS_BASE_COUNT,
                    level: ENDLESS_BASE_LEVEL,
                    initial_delay: start_offset(seed, wave, monster),
                    interval: ENDLESS_INTERVAL,
                })
                .collect(),
        })
        .collect()
}

/// Copy of `base` renumbered to `wave` with count and level grown for `loop_iteration`.
///
/// Both are multiplied by `1 + 0.25 · loop_iteration`, rounded, and kept at
/// one or more.
#[must_use]
pub fn scaled_for_loop(base: &WaveManifest, loop_iteration: u32, wave: WaveNumber) -> WaveManifest {
    let factor = 1.0 + ENDLESS_SCALE_PER_LOOP * loop_iteration as f32;
    WaveManifest {
        wave,
        difficulty: base.difficulty * factor,
        boss: base.boss.clone(),
        groups: base
            .groups
            .iter()
            .map(|group| SpawnGroup {
                count: scale(group.count, factor),
                level: scale(group.level, factor),
                ..group.clone()
            })
            .collect(),
    }
}

fn scale(value: u32, factor: f32) -> u32 {
    let scaled = (value as f32 * factor).round();
    if scaled < 1.0 {
        1
    } else {
        scaled as u32
    }
}

fn difficulty_for(wave: u32) -> f32 {
    1.0 + (wave - 1) as f32 * 0.15
}

fn group(monster: &str, count: u32, level: u32, delay_ms: u64, interval_ms: u64) -> SpawnGroup {
    SpawnGroup::new(
        monster,
        count,
        level,
        Duration::from_millis(delay_ms),
        Duration::from_millis(interval_ms),
    )
}

fn regular_wave(wave: u32, groups: Vec<SpawnGroup>) -> WaveManifest {
    WaveManifest {
        wave: WaveNumber::new(wave),
        difficulty: difficulty_for(wave),
        boss: None,
        groups,
    }
}

fn boss_wave(wave: u32, difficulty: f32, boss: &str, groups: Vec<SpawnGroup>) -> WaveManifest {
    WaveManifest {
        wave: WaveNumber::new(wave),
        difficulty,
        boss: Some(TemplateId::new(boss)),
        groups,
    }
}

fn basic_wave(wave: u32) -> WaveManifest {
    regular_wave(
        wave,
        vec![
            group("whisper", 5 + wave * 2, wave.min(2), 0, 500),
            group("corroder", 2 + wave, 1, 3_000, 1_000),
        ],
    )
}

fn elemental_wave(wave: u32) -> WaveManifest {
    regular_wave(
        wave,
        vec![
            group("bonewall", 3, 2, 0, 2_000),
            group("fire_aberration", 4, wave - 3, 2_000, 1_000),
            group("ice_aberration", 4, wave - 3, 5_000, 1_000),
        ],
    )
}

fn elite_wave(wave: u32) -> WaveManifest {
    regular_wave(
        wave,
        vec![
            group("thunder_aberration", 6, 3, 0, 1_000),
            group("chaos_mage", 3, 2, 3_000, 2_000),
            group("electric_fission", 1, 1, 8_000, 0),
        ],
    )
}

fn advanced_wave(wave: u32) -> WaveManifest {
    regular_wave(
        wave,
        vec![
            group("whisper", 12, 5, 0, 300),
            group("shadow_assassin", 1, 1, 5_000, 0),
            group("void_aggregate", 1, 1, 10_000, 0),
        ],
    )
}

fn start_offset(seed: u64, wave: u32, monster: &str) -> Duration {
    let mut rng = SplitMix64::new(derive_group_seed(seed, wave, monster));
    let millis = (rng.next_unit() * ENDLESS_MAX_OFFSET_MS).floor();
    Duration::from_millis(millis as u64)
}

fn derive_group_seed(seed: u64, wave: u32, monster: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    hasher.update(monster.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn next_unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1_u64 << 53) as f64);
        (self.next_u64() >> 11) as f64 * SCALE
    }
}
