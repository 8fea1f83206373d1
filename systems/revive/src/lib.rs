#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Paid and free revival of fallen heroes.
//!
//! A paid revive is immediate, restores half of the hero's health and gets
//! more expensive with every purchase for that hero. A free revive is queued
//! at death and fires once the configured number of waves has passed.

use std::collections::BTreeMap;

use ember_keepers_core::{Command, CurrencyLedger, HeroId, HeroSnapshot, HeroView, WaveNumber};
use tracing::debug;

const PAID_HEALTH_FRACTION: f32 = 0.5;
const FREE_HEALTH_FRACTION: f32 = 1.0;

/// Configuration parameters required to construct the revive queue.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    base_cost: u32,
    cost_multiplier: f64,
    free_revive_delay: f64,
}

impl Config {
    /// Creates a configuration.
    ///
    /// The n-th paid revive of a hero costs `base_cost · cost_multiplier^n`;
    /// free revives become eligible `free_revive_delay` waves after death.
    #[must_use]
    pub const fn new(base_cost: u32, cost_multiplier: f64, free_revive_delay: f64) -> Self {
        Self {
            base_cost,
            cost_multiplier,
            free_revive_delay,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(100, 1.5, 2.0)
    }
}

/// A fallen hero waiting for its free revive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviveTicket {
    /// Fallen hero.
    pub hero: HeroId,
    /// Wave during which the hero fell.
    pub death_wave: WaveNumber,
    /// Wave number from which the free revive fires.
    pub eligible_at: f64,
    /// What an immediate revive costs for this hero right now.
    pub paid_cost: u32,
}

/// Tracks fallen heroes and the revives bought for each of them.
#[derive(Debug)]
pub struct ReviveQueue {
    config: Config,
    tickets: BTreeMap<HeroId, ReviveTicket>,
    paid_revives: BTreeMap<HeroId, u32>,
}

impl ReviveQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tickets: BTreeMap::new(),
            paid_revives: BTreeMap::new(),
        }
    }

    /// Forgets every ticket and purchase.
    pub fn reset(&mut self) {
        self.tickets.clear();
        self.paid_revives.clear();
    }

    /// Price of the next paid revive for `hero`.
    #[must_use]
    pub fn revive_cost(&self, hero: HeroId) -> u32 {
        let count = self.paid_revives.get(&hero).copied().unwrap_or(0);
        let exponent = i32::try_from(count).unwrap_or(i32::MAX);
        let cost = f64::from(self.config.base_cost) * self.config.cost_multiplier.powi(exponent);
        cost.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }

    /// Number of paid revives bought for `hero`.
    #[must_use]
    pub fn paid_revive_count(&self, hero: HeroId) -> u32 {
        self.paid_revives.get(&hero).copied().unwrap_or(0)
    }

    /// Ticket of a queued hero.
    #[must_use]
    pub fn ticket(&self, hero: HeroId) -> Option<&ReviveTicket> {
        self.tickets.get(&hero)
    }

    /// Number of heroes waiting for a free revive.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tickets.len()
    }

    /// Buys an immediate revive at half health.
    ///
    /// Fails without spending anything when the hero is alive or the ledger
    /// cannot cover the cost.
    pub fn revive_immediate(
        &mut self,
        hero: &HeroSnapshot,
        ledger: &mut dyn CurrencyLedger,
        out: &mut Vec<Command>,
    ) -> bool {
        if hero.is_alive() {
            debug!(hero = hero.id.get(), "paid revive rejected: hero is alive");
            return false;
        }
        let cost = self.revive_cost(hero.id);
        if !ledger.try_spend(cost) {
            debug!(
                hero = hero.id.get(),
                cost,
                balance = ledger.balance(),
                "paid revive rejected: insufficient funds"
            );
            return false;
        }
        out.push(Command::ReviveHero {
            hero: hero.id,
            health_fraction: PAID_HEALTH_FRACTION,
            paid: true,
        });
        *self.paid_revives.entry(hero.id).or_insert(0) += 1;
        let _ = self.tickets.remove(&hero.id);
        true
    }

    /// Queues a free revive for a fallen hero.
    ///
    /// Returns `false` for living heroes and heroes already queued.
    pub fn queue_free_revive(&mut self, hero: &HeroSnapshot, current_wave: WaveNumber) -> bool {
        if hero.is_alive() || self.tickets.contains_key(&hero.id) {
            return false;
        }
        let ticket = ReviveTicket {
            hero: hero.id,
            death_wave: current_wave,
            eligible_at: f64::from(current_wave.get()) + self.config.free_revive_delay,
            paid_cost: self.revive_cost(hero.id),
        };
        debug!(
            hero = hero.id.get(),
            eligible_at = ticket.eligible_at,
            "free revive queued"
        );
        let _ = self.tickets.insert(hero.id, ticket);
        true
    }

    /// Revives every queued hero whose ticket is due at `current_wave`.
    ///
    /// Tickets of heroes that are no longer dead or no longer recruited are
    /// dropped. Returns the number of revive commands issued.
    pub fn poll_free_revives(
        &mut self,
        heroes: &HeroView,
        current_wave: WaveNumber,
        out: &mut Vec<Command>,
    ) -> usize {
        let now = f64::from(current_wave.get());
        let mut revived = 0;
        self.tickets.retain(|hero, ticket| {
            let still_dead = heroes.get(*hero).is_some_and(|snapshot| !snapshot.is_alive());
            if !still_dead {
                return false;
            }
            if ticket.eligible_at > now {
                return true;
            }
            out.push(Command::ReviveHero {
                hero: *hero,
                health_fraction: FREE_HEALTH_FRACTION,
                paid: false,
            });
            revived += 1;
            false
        });
        revived
    }
}
