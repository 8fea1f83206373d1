//! Default implementations of the collaborator contracts.

use ember_keepers_core::{
    BaseTarget, CurrencyLedger, Phase, PhaseSink, Position, TemplateSource, WaveNumber,
};

use crate::catalog::TemplateCatalog;

/// Gold purse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    gold: u32,
}

impl Wallet {
    /// Creates a wallet holding `gold`.
    #[must_use]
    pub const fn new(gold: u32) -> Self {
        Self { gold }
    }
}

impl CurrencyLedger for Wallet {
    fn try_spend(&mut self, amount: u32) -> bool {
        match self.gold.checked_sub(amount) {
            Some(left) => {
                self.gold = left;
                true
            }
            None => false,
        }
    }

    fn add(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    fn balance(&self) -> u32 {
        self.gold
    }

    fn reset(&mut self, balance: u32) {
        self.gold = balance;
    }
}

/// The defended core structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseCore {
    position: Position,
    max_health: f32,
    health: f32,
}

impl BaseCore {
    /// Creates an intact base at `position`.
    #[must_use]
    pub fn new(position: Position, max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            position,
            max_health,
            health: max_health,
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health of an intact base.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }
}

impl Default for BaseCore {
    fn default() -> Self {
        Self::new(Position::ORIGIN, 1_000.0)
    }
}

impl BaseTarget for BaseCore {
    fn position(&self) -> Position {
        self.position
    }

    fn take_damage(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.health = (self.health - amount).max(0.0);
        }
    }

    fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    fn rebuild(&mut self) {
        self.health = self.max_health;
    }
}

/// Phase holder that remembers the latest transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTracker {
    phase: Phase,
    last_wave: Option<WaveNumber>,
}

impl PhaseTracker {
    /// Phase most recently entered.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Wave announced by the latest combat start.
    #[must_use]
    pub const fn last_wave(&self) -> Option<WaveNumber> {
        self.last_wave
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self {
            phase: Phase::MainMenu,
            last_wave: None,
        }
    }
}

impl PhaseSink for PhaseTracker {
    fn enter_strategy_phase(&mut self) {
        self.phase = Phase::Strategy;
    }

    fn combat_phase_started(&mut self, wave: WaveNumber) {
        self.phase = Phase::Combat;
        self.last_wave = Some(wave);
    }
}

/// Everything the session consumes from the surrounding game.
pub struct Collaborators {
    /// Wallet charged for paid revives and credited with loot.
    pub ledger: Box<dyn CurrencyLedger>,
    /// Source of monster and hero stat blocks.
    pub templates: Box<dyn TemplateSource>,
    /// The defended base.
    pub base: Box<dyn BaseTarget>,
    /// Receiver of phase transitions.
    pub phase: Box<dyn PhaseSink>,
}

impl Collaborators {
    /// Built-in collaborators with an empty wallet and a base of `base_health`.
    #[must_use]
    pub fn standard(base_health: f32) -> Self {
        Self {
            ledger: Box::new(Wallet::default()),
            templates: Box::new(TemplateCatalog::default()),
            base: Box::new(BaseCore::new(Position::ORIGIN, base_health)),
            phase: Box::new(PhaseTracker::default()),
        }
    }
}
