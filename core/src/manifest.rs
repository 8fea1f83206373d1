//! Declarative wave descriptions consumed by the spawn coordinator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{TemplateId, WaveNumber};

/// Whether a wave comes from the authored sequence or the endless rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveMode {
    /// Authored main sequence.
    Main,
    /// Endless rotation after the main sequence.
    Endless,
}

/// Timed run of same-type spawns within a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Template of every monster in the group.
    pub monster: TemplateId,
    /// Number of monsters spawned.
    pub count: u32,
    /// Level of every monster in the group.
    pub level: u32,
    /// Wait before the first spawn.
    pub initial_delay: Duration,
    /// Wait between consecutive spawns.
    pub interval: Duration,
}

impl SpawnGroup {
    /// Creates a spawn group.
    #[must_use]
    pub fn new(
        monster: impl Into<String>,
        count: u32,
        level: u32,
        initial_delay: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            monster: TemplateId::new(monster),
            count,
            level,
            initial_delay,
            interval,
        }
    }
}

/// Everything needed to run one wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveManifest {
    /// Number of the wave the manifest was authored for.
    pub wave: WaveNumber,
    /// Advisory difficulty score.
    pub difficulty: f32,
    /// Boss spawned at the staging position when the wave starts.
    pub boss: Option<TemplateId>,
    /// Groups spawned concurrently.
    pub groups: Vec<SpawnGroup>,
}

impl WaveManifest {
    /// Reports whether the wave carries a boss.
    #[must_use]
    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Number of monsters the manifest schedules, boss included.
    #[must_use]
    pub fn scheduled_spawns(&self) -> u32 {
        let groups: u32 = self.groups.iter().map(|group| group.count).sum();
        groups + u32::from(self.has_boss())
    }
}
