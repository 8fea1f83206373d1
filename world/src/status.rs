//! Timed status effects and periodic timers.

use std::time::Duration;

use ember_keepers_core::{StatusEffect, StatusKind};

#[derive(Clone, Copy, Debug)]
struct ActiveStatus {
    effect: StatusEffect,
    remaining: Duration,
}

/// Statuses applied to a single agent; at most one entry per kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct StatusBook {
    entries: Vec<ActiveStatus>,
}

impl StatusBook {
    /// Applies the effect, replacing and refreshing any status of the same kind.
    pub(crate) fn apply(&mut self, effect: StatusEffect, duration: Duration) {
        let kind = effect.kind();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.effect.kind() == kind)
        {
            Some(entry) => {
                entry.effect = effect;
                entry.remaining = duration;
            }
            None => self.entries.push(ActiveStatus {
                effect,
                remaining: duration,
            }),
        }
    }

    pub(crate) fn clear(&mut self, kind: StatusKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.effect.kind() != kind);
        self.entries.len() != before
    }

    pub(crate) fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn get(&self, kind: StatusKind) -> Option<StatusEffect> {
        self.entries
            .iter()
            .find(|entry| entry.effect.kind() == kind)
            .map(|entry| entry.effect)
    }

    pub(crate) fn kinds(&self) -> Vec<StatusKind> {
        self.entries.iter().map(|entry| entry.effect.kind()).collect()
    }

    /// Counts down every status, reporting the kinds that ran out.
    pub(crate) fn advance(&mut self, dt: Duration, expired: &mut Vec<StatusKind>) {
        self.entries.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(dt);
            if entry.remaining.is_zero() {
                expired.push(entry.effect.kind());
                false
            } else {
                true
            }
        });
    }
}

/// Fixed-interval trigger driven by accumulated tick time.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cadence {
    interval: Duration,
    elapsed: Duration,
}

impl Cadence {
    pub(crate) const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and returns how many intervals completed.
    pub(crate) fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reapplying_refreshes_duration() {
        let mut book = StatusBook::default();
        book.apply(StatusEffect::Slow { fraction: 0.5 }, Duration::from_secs(2));
        let mut expired = Vec::new();
        book.advance(Duration::from_millis(1500), &mut expired);
        book.apply(StatusEffect::Slow { fraction: 0.7 }, Duration::from_secs(2));
        book.advance(Duration::from_millis(1500), &mut expired);
        assert!(expired.is_empty());
        assert_eq!(
            book.get(StatusKind::Slow),
            Some(StatusEffect::Slow { fraction: 0.7 })
        );
        book.advance(Duration::from_millis(500), &mut expired);
        assert_eq!(expired, vec![StatusKind::Slow]);
        assert!(book.kinds().is_empty());
    }

    #[test]
    fn clearing_reports_presence() {
        let mut book = StatusBook::default();
        book.apply(StatusEffect::Freeze, Duration::from_secs(2));
        assert!(book.clear(StatusKind::Freeze));
        assert!(!book.clear(StatusKind::Freeze));
    }

    #[test]
    fn cadence_fires_once_per_interval() {
        let mut cadence = Cadence::new(Duration::from_secs(5));
        assert_eq!(cadence.advance(Duration::from_secs(4)), 0);
        assert_eq!(cadence.advance(Duration::from_secs(1)), 1);
        assert_eq!(cadence.advance(Duration::from_secs(11)), 2);
        assert_eq!(Cadence::new(Duration::ZERO).advance(Duration::from_secs(3)), 0);
    }
}
