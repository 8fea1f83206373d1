#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave counter and Strategy⇄Combat transitions.
//!
//! The scheduler owns the one-based wave index and decides which manifest a
//! wave runs. Waves past the main sequence index the endless rotation modulo
//! its length and grow with every completed loop. Spawning itself is delegated
//! to the [`SpawnCoordinator`].

use ember_keepers_core::{
    Event, PhaseSink, WaveManifest, WaveMode, WaveNumber, ENDLESS_LOOP_LENGTH, MAIN_WAVE_COUNT,
};
use ember_keepers_system_spawning::SpawnCoordinator;
use ember_keepers_system_wave_config::{scaled_for_loop, WaveTables};
use tracing::{debug, error, info, warn};

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    main_wave_count: u32,
    endless_loop_length: u32,
}

impl Config {
    /// Creates a configuration for a main sequence of `main_wave_count` waves
    /// followed by an endless rotation of `endless_loop_length` manifests.
    #[must_use]
    pub const fn new(main_wave_count: u32, endless_loop_length: u32) -> Self {
        Self {
            main_wave_count,
            endless_loop_length,
        }
    }

    /// Number of waves before endless mode.
    #[must_use]
    pub const fn main_wave_count(&self) -> u32 {
        self.main_wave_count
    }

    /// Length of the endless rotation.
    #[must_use]
    pub const fn endless_loop_length(&self) -> u32 {
        self.endless_loop_length
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(MAIN_WAVE_COUNT, ENDLESS_LOOP_LENGTH)
    }
}

/// Progress through the wave sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveState {
    current: u32,
    mode: WaveMode,
    in_progress: bool,
}

impl WaveState {
    /// State of a fresh session: no wave started, main mode, idle.
    pub const INITIAL: Self = Self {
        current: 0,
        mode: WaveMode::Main,
        in_progress: false,
    };

    /// Most recently started wave; zero before the first start.
    #[must_use]
    pub const fn current(&self) -> WaveNumber {
        WaveNumber::new(self.current)
    }

    /// Main or endless.
    #[must_use]
    pub const fn mode(&self) -> WaveMode {
        self.mode
    }

    /// Whether a wave is being fought.
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.in_progress
    }
}

impl Default for WaveState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Slot of the endless rotation that `wave` runs, `None` for main waves or an empty rotation.
#[must_use]
pub fn endless_slot(wave: u32, main_wave_count: u32, loop_length: u32) -> Option<usize> {
    if wave <= main_wave_count || loop_length == 0 {
        return None;
    }
    Some(((wave - main_wave_count - 1) % loop_length) as usize)
}

/// Number of endless loops completed before `wave`; zero for main waves.
#[must_use]
pub fn loop_iteration(wave: u32, main_wave_count: u32, loop_length: u32) -> u32 {
    if wave <= main_wave_count || loop_length == 0 {
        return 0;
    }
    (wave - main_wave_count - 1) / loop_length
}

/// Owns the wave index and starts and finishes waves.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
    tables: WaveTables,
    state: WaveState,
}

impl WaveScheduler {
    /// Creates a scheduler that looks manifests up in `tables`.
    #[must_use]
    pub fn new(config: Config, tables: WaveTables) -> Self {
        Self {
            config,
            tables,
            state: WaveState::INITIAL,
        }
    }

    /// Returns to the state of a fresh session.
    pub fn reset(&mut self) {
        self.state = WaveState::INITIAL;
    }

    /// Current progress.
    #[must_use]
    pub fn state(&self) -> WaveState {
        self.state
    }

    /// Most recently started wave.
    #[must_use]
    pub fn current_wave(&self) -> WaveNumber {
        self.state.current()
    }

    /// Whether the main sequence has been exhausted.
    #[must_use]
    pub fn is_endless_mode(&self) -> bool {
        self.state.mode == WaveMode::Endless
    }

    /// Whether a wave is being fought.
    #[must_use]
    pub fn is_wave_in_progress(&self) -> bool {
        self.state.in_progress
    }

    /// Manifest that `wave` runs, already scaled for its endless loop.
    #[must_use]
    pub fn manifest_for(&self, wave: WaveNumber) -> Option<WaveManifest> {
        let index = wave.get();
        if index == 0 {
            return None;
        }
        let main = self.config.main_wave_count;
        let loop_length = self.config.endless_loop_length;
        if index <= main {
            return self.tables.main().get(index as usize - 1).cloned();
        }
        let slot = endless_slot(index, main, loop_length)?;
        let base = self.tables.endless().get(slot)?;
        Some(scaled_for_loop(
            base,
            loop_iteration(index, main, loop_length),
            wave,
        ))
    }

    /// Starts the next wave.
    ///
    /// Rejected with `false` while a wave is already in progress; the index is
    /// left untouched. A wave without a manifest is logged and cleared on the
    /// spot so the session never gets stuck in combat.
    pub fn start_wave(
        &mut self,
        coordinator: &mut SpawnCoordinator,
        phase: &mut dyn PhaseSink,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if self.state.in_progress {
            debug!(
                wave = self.state.current,
                "start rejected: wave already in progress"
            );
            return false;
        }

        self.state.current = self.state.current.saturating_add(1);
        if self.state.current > self.config.main_wave_count {
            self.state.mode = WaveMode::Endless;
        }
        self.state.in_progress = true;

        let wave = self.state.current();
        let mode = self.state.mode;
        phase.combat_phase_started(wave);
        out_events.push(Event::WaveStarted { wave, mode });

        match self.manifest_for(wave) {
            Some(manifest) => {
                info!(
                    wave = wave.get(),
                    ?mode,
                    spawns = manifest.scheduled_spawns(),
                    boss = manifest.has_boss(),
                    "wave started"
                );
                coordinator.spawn_wave(&manifest);
            }
            None => {
                error!(wave = wave.get(), ?mode, "no manifest for wave");
                warn!(wave = wave.get(), "treating wave without manifest as cleared");
                coordinator.reset();
                let _ = self.on_wave_cleared(wave, phase, out_events);
            }
        }
        true
    }

    /// Finishes `wave` and hands control back to the strategy phase.
    ///
    /// Ignored unless `wave` is the wave in progress.
    pub fn on_wave_cleared(
        &mut self,
        wave: WaveNumber,
        phase: &mut dyn PhaseSink,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.state.in_progress || wave != self.state.current() {
            debug!(
                wave = wave.get(),
                current = self.state.current,
                "ignoring clear for a wave that is not running"
            );
            return false;
        }
        self.state.in_progress = false;
        info!(wave = wave.get(), "wave cleared");
        out_events.push(Event::WaveCleared { wave });
        phase.enter_strategy_phase();
        true
    }
}
