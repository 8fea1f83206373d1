#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifecycle façade that wires the world, the combat systems and the external
//! collaborators into one playable session.
//!
//! Every mutation goes through `world::apply`. The session feeds the resulting
//! events to the systems, applies the commands they answer with, and repeats
//! until the tick settles or the configured pump depth is exhausted. Events are
//! published to an outbox the host drains with [`Session::drain_events`].

mod catalog;
mod collaborators;
mod config;
mod progress;

use std::time::Duration;

use ember_keepers_core::{
    Command, Equipment, Event, HeroId, HeroSnapshot, HeroView, MonsterView, Phase, Position,
    TemplateId, WaveNumber,
};
use ember_keepers_system_hero_combat::HeroCombat;
use ember_keepers_system_monster_ai::MonsterAi;
use ember_keepers_system_revive::ReviveQueue;
use ember_keepers_system_skills::{SkillDecisionEngine, SkillEffects};
use ember_keepers_system_spawning::SpawnCoordinator;
use ember_keepers_system_wave_config::WaveTables;
use ember_keepers_system_waves::WaveScheduler;
use ember_keepers_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub use catalog::TemplateCatalog;
pub use collaborators::{BaseCore, Collaborators, PhaseTracker, Wallet};
pub use config::{
    ConfigError, ReviveSettings, SessionConfig, SkillSettings, SpawnSettings, WaveSettings,
};
pub use progress::{
    ProgressError, ProgressRecord, GOLD_EARNED, HIGHEST_WAVE, MONSTERS_SLAIN, REVIVES_PAID,
    WAVES_CLEARED,
};

/// A running game: world state, systems and collaborators.
pub struct Session {
    config: SessionConfig,
    world: World,
    scheduler: WaveScheduler,
    coordinator: SpawnCoordinator,
    monster_ai: MonsterAi,
    hero_combat: HeroCombat,
    skill_engine: SkillDecisionEngine,
    skill_effects: SkillEffects,
    revive: ReviveQueue,
    collaborators: Collaborators,
    loot: ChaCha8Rng,
    phase: Phase,
    progress: ProgressRecord,
    outbox: Vec<Event>,
}

impl Session {
    /// Creates a session backed by the built-in collaborators.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_collaborators(config, Collaborators::standard(config.base_health))
    }

    /// Creates a session that talks to the supplied collaborators.
    pub fn with_collaborators(
        config: SessionConfig,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            scheduler: WaveScheduler::new(
                config.wave_config(),
                WaveTables::generate(&config.table_config()),
            ),
            coordinator: SpawnCoordinator::new(config.spawn_config()),
            monster_ai: MonsterAi::new(config.monster_ai_config()),
            hero_combat: HeroCombat::default(),
            skill_engine: SkillDecisionEngine::new(),
            skill_effects: SkillEffects::new(config.effects_config()),
            revive: ReviveQueue::new(config.revive_config()),
            collaborators,
            loot: ChaCha8Rng::seed_from_u64(config.loot_seed),
            phase: Phase::MainMenu,
            progress: ProgressRecord::new(),
            outbox: Vec::new(),
            config,
        })
    }

    /// Clears the battlefield and the roster and enters the strategy phase
    /// with the starting gold and an intact base.
    pub fn start_new_game(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::ResetWorld, &mut events);
        self.scheduler.reset();
        self.coordinator.reset();
        self.revive.reset();
        self.collaborators.ledger.reset(self.config.starting_gold);
        self.collaborators.base.rebuild();
        self.collaborators.phase.enter_strategy_phase();
        self.enter(Phase::Strategy, &mut events);
        info!(gold = self.config.starting_gold, "new game started");
        self.pump(events);
    }

    /// Starts the next wave.
    ///
    /// Rejected outside the strategy phase and while a wave is running.
    pub fn start_current_wave(&mut self) -> bool {
        if self.phase != Phase::Strategy {
            debug!(phase = ?self.phase, "wave start rejected");
            return false;
        }
        let mut started = Vec::new();
        if !self.scheduler.start_wave(
            &mut self.coordinator,
            self.collaborators.phase.as_mut(),
            &mut started,
        ) {
            return false;
        }
        let wave = self.scheduler.current_wave();
        self.progress.raise_to(HIGHEST_WAVE, i64::from(wave.get()));
        let mut events = Vec::new();
        self.enter(Phase::Combat, &mut events);
        events.append(&mut started);

        let mut commands = Vec::new();
        if !self.scheduler.is_wave_in_progress() {
            self.settle_cleared_wave(wave, &mut events, &mut commands);
        }
        self.resolve(events, commands);
        true
    }

    /// Ends the running wave as if its last monster had fallen.
    ///
    /// Pending spawns are abandoned. Returns `false` when no wave is running.
    pub fn on_wave_completed(&mut self) -> bool {
        if self.phase != Phase::Combat || !self.scheduler.is_wave_in_progress() {
            return false;
        }
        self.coordinator.reset();
        let mut events = Vec::new();
        let mut commands = Vec::new();
        let wave = self.scheduler.current_wave();
        let completed = self.complete_wave(wave, &mut events, &mut commands);
        self.resolve(events, commands);
        completed
    }

    /// Advances combat by `dt`; does nothing outside the combat phase.
    pub fn tick(&mut self, dt: Duration) {
        if self.phase != Phase::Combat {
            return;
        }
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.pump(events);
    }

    /// Recruits a benched hero built from the template `template`.
    pub fn recruit_hero(&mut self, template: &TemplateId) -> Option<HeroId> {
        let template = match self.collaborators.templates.hero_template(template) {
            Ok(template) => template,
            Err(error) => {
                warn!(%error, "recruit skipped");
                return None;
            }
        };
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::RecruitHero { template }, &mut events);
        let hero = events.iter().find_map(|event| match event {
            Event::HeroRecruited { hero, .. } => Some(*hero),
            _ => None,
        });
        self.pump(events);
        hero
    }

    /// Places a living hero on the battlefield.
    pub fn deploy_hero(&mut self, hero: HeroId, position: Position) -> bool {
        self.command(Command::DeployHero { hero, position }, |event| {
            matches!(event, Event::HeroDeployed { hero: deployed, .. } if *deployed == hero)
        })
    }

    /// Withdraws a hero from the battlefield.
    pub fn bench_hero(&mut self, hero: HeroId) -> bool {
        self.command(Command::BenchHero { hero }, |event| {
            matches!(event, Event::HeroBenched { hero: benched } if *benched == hero)
        })
    }

    /// Equips `item` into `slot`, replacing whatever was there.
    pub fn equip_item(&mut self, hero: HeroId, slot: usize, item: Equipment) -> bool {
        self.command(Command::EquipItem { hero, slot, item }, |event| {
            matches!(event, Event::EquipmentChanged { .. })
        })
    }

    /// Empties `slot`.
    pub fn unequip_item(&mut self, hero: HeroId, slot: usize) -> bool {
        self.command(Command::UnequipItem { hero, slot }, |event| {
            matches!(event, Event::EquipmentChanged { .. })
        })
    }

    /// Buys an immediate revive at half health.
    pub fn revive_hero_immediate(&mut self, hero: HeroId) -> bool {
        let Some(snapshot) = query::hero(&self.world, hero) else {
            return false;
        };
        let mut commands = Vec::new();
        let bought = self.revive.revive_immediate(
            &snapshot,
            self.collaborators.ledger.as_mut(),
            &mut commands,
        );
        if bought {
            self.resolve(Vec::new(), commands);
        }
        bought
    }

    /// Queues a free revive for a fallen hero.
    ///
    /// Heroes that fall in combat are queued automatically.
    pub fn queue_free_revive(&mut self, hero: HeroId) -> bool {
        query::hero(&self.world, hero).is_some_and(|snapshot| {
            self.revive
                .queue_free_revive(&snapshot, self.scheduler.current_wave())
        })
    }

    /// Price of the next paid revive for `hero`.
    #[must_use]
    pub fn revive_cost(&self, hero: HeroId) -> u32 {
        self.revive.revive_cost(hero)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Most recently started wave; zero before the first.
    #[must_use]
    pub fn current_wave(&self) -> WaveNumber {
        self.scheduler.current_wave()
    }

    /// Whether the main sequence is behind us.
    #[must_use]
    pub fn is_endless_mode(&self) -> bool {
        self.scheduler.is_endless_mode()
    }

    /// Whether a wave is being fought.
    #[must_use]
    pub fn is_wave_in_progress(&self) -> bool {
        self.scheduler.is_wave_in_progress()
    }

    /// Living monsters of the running wave.
    #[must_use]
    pub fn active_monster_count(&self) -> usize {
        self.coordinator.active_monster_count()
    }

    /// Whether `hero` could use its skill right now.
    #[must_use]
    pub fn is_skill_ready(&self, hero: HeroId) -> bool {
        query::hero(&self.world, hero).is_some_and(|snapshot| snapshot.skill_ready())
    }

    /// Time until the skill of `hero` comes off cooldown.
    #[must_use]
    pub fn skill_cooldown_remaining(&self, hero: HeroId) -> Option<Duration> {
        query::hero(&self.world, hero).map(|snapshot| snapshot.skill_cooldown_remaining)
    }

    /// Snapshot of one hero.
    #[must_use]
    pub fn hero(&self, hero: HeroId) -> Option<HeroSnapshot> {
        query::hero(&self.world, hero)
    }

    /// Snapshots of every recruited hero.
    #[must_use]
    pub fn heroes(&self) -> HeroView {
        query::hero_view(&self.world)
    }

    /// Snapshots of every monster on the battlefield.
    #[must_use]
    pub fn monsters(&self) -> MonsterView {
        query::monster_view(&self.world)
    }

    /// Gold in the ledger.
    #[must_use]
    pub fn gold(&self) -> u32 {
        self.collaborators.ledger.balance()
    }

    /// Whether the base has fallen.
    #[must_use]
    pub fn is_base_destroyed(&self) -> bool {
        self.collaborators.base.is_destroyed()
    }

    /// Meta-progression counters.
    #[must_use]
    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    /// Configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Takes every event published since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    fn command(&mut self, command: Command, accepted: impl Fn(&Event) -> bool) -> bool {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let done = events.iter().any(accepted);
        self.pump(events);
        done
    }

    fn resolve(&mut self, mut events: Vec<Event>, commands: Vec<Command>) {
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.pump(events);
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        let depth = self.config.max_pump_depth;
        for round in 0..depth {
            self.react(&mut events);
            self.outbox.extend(events.iter().cloned());

            let mut commands = Vec::new();
            let mut next = Vec::new();
            if let Some(wave) = self.dispatch(&events, &mut commands) {
                let _ = self.complete_wave(wave, &mut next, &mut commands);
            }
            if commands.is_empty() && next.is_empty() {
                return;
            }
            if round + 1 == depth {
                warn!(
                    depth,
                    dropped = commands.len(),
                    "pump depth exhausted; dropping remaining commands"
                );
                let _ = self.coordinator.abandon_unapplied(&commands);
                self.outbox.extend(next);
                return;
            }
            for command in commands {
                world::apply(&mut self.world, command, &mut next);
            }
            events = next;
        }
    }

    fn dispatch(&mut self, events: &[Event], out: &mut Vec<Command>) -> Option<WaveNumber> {
        let heroes = query::hero_view(&self.world);
        let monsters = query::monster_view(&self.world);
        let base = self.collaborators.base.position();

        let cleared = self.coordinator.handle(
            events,
            self.collaborators.templates.as_ref(),
            base,
            out,
        );
        self.monster_ai.handle(events, &heroes, &monsters, base, out);
        self.hero_combat.handle(events, &heroes, &monsters, out);
        self.skill_engine.handle(events, &heroes, &monsters, base, out);
        self.skill_effects.handle(events, &heroes, &monsters, base, out);
        cleared
    }

    /// Settles loot, base damage and deaths before `events` are published.
    fn react(&mut self, events: &mut Vec<Event>) {
        let mut raised = Vec::new();
        for event in events.iter() {
            match event {
                Event::MonsterDied {
                    monster, gold_drop, ..
                } => {
                    let (low, high) = (gold_drop.min.min(gold_drop.max), gold_drop.max);
                    let gold = self.loot.gen_range(low..=high.max(low));
                    self.collaborators.ledger.add(gold);
                    self.progress.bump(MONSTERS_SLAIN, 1);
                    self.progress.bump(GOLD_EARNED, i64::from(gold));
                    debug!(monster = monster.get(), gold, "loot collected");
                }
                Event::BaseStruck { amount, .. } => {
                    self.collaborators.base.take_damage(*amount);
                    if self.phase != Phase::GameOver && self.collaborators.base.is_destroyed() {
                        warn!(wave = self.scheduler.current_wave().get(), "base destroyed");
                        self.coordinator.reset();
                        self.enter(Phase::GameOver, &mut raised);
                    }
                }
                Event::HeroDied { hero } => {
                    info!(hero = hero.get(), "hero fell");
                    let _ = self.queue_free_revive(*hero);
                }
                Event::HeroRevived { hero, paid } => {
                    info!(hero = hero.get(), paid, "hero revived");
                    if *paid {
                        self.progress.bump(REVIVES_PAID, 1);
                    }
                }
                _ => {}
            }
        }
        events.append(&mut raised);
    }

    fn complete_wave(
        &mut self,
        wave: WaveNumber,
        events: &mut Vec<Event>,
        commands: &mut Vec<Command>,
    ) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        if !self
            .scheduler
            .on_wave_cleared(wave, self.collaborators.phase.as_mut(), events)
        {
            return false;
        }
        self.settle_cleared_wave(wave, events, commands);
        true
    }

    fn settle_cleared_wave(
        &mut self,
        wave: WaveNumber,
        events: &mut Vec<Event>,
        commands: &mut Vec<Command>,
    ) {
        self.progress.bump(WAVES_CLEARED, 1);
        let heroes = query::hero_view(&self.world);
        let revived = self.revive.poll_free_revives(&heroes, wave, commands);
        if revived > 0 {
            debug!(wave = wave.get(), revived, "free revives due");
        }
        self.enter(Phase::Strategy, events);
    }

    fn enter(&mut self, phase: Phase, events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, "phase changed");
        self.phase = phase;
        events.push(Event::PhaseChanged { phase });
    }
}
