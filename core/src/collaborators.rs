//! Interfaces the engine consumes from the surrounding game.

use thiserror::Error;

use crate::{HeroTemplate, MonsterTemplate, Position, TemplateId, WaveNumber};

/// Wallet charged for paid actions.
pub trait CurrencyLedger {
    /// Removes `amount` if affordable; returns `false` without side effects otherwise.
    fn try_spend(&mut self, amount: u32) -> bool;

    /// Adds `amount` to the balance.
    fn add(&mut self, amount: u32);

    /// Current balance.
    fn balance(&self) -> u32;

    /// Replaces the balance; used when a new game starts.
    fn reset(&mut self, balance: u32);
}

/// Failure to resolve a template identifier.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// No monster template is registered under the identifier.
    #[error("unknown monster template `{0}`")]
    UnknownMonster(TemplateId),
    /// No hero template is registered under the identifier.
    #[error("unknown hero template `{0}`")]
    UnknownHero(TemplateId),
}

/// Lookup of static stat blocks.
pub trait TemplateSource {
    /// Resolves a monster template.
    fn monster_template(&self, id: &TemplateId) -> Result<MonsterTemplate, TemplateError>;

    /// Resolves a hero template.
    fn hero_template(&self, id: &TemplateId) -> Result<HeroTemplate, TemplateError>;
}

/// The defended base; the engine never owns its health.
pub trait BaseTarget {
    /// Location monsters advance toward.
    fn position(&self) -> Position;

    /// Applies a monster strike.
    fn take_damage(&mut self, amount: f32);

    /// Reports whether the base has fallen.
    fn is_destroyed(&self) -> bool;

    /// Restores the base to full health for a new game.
    fn rebuild(&mut self);
}

/// Receiver of phase transitions.
pub trait PhaseSink {
    /// Combat ended and the strategy phase begins.
    fn enter_strategy_phase(&mut self);

    /// A wave started.
    fn combat_phase_started(&mut self, wave: WaveNumber);
}
