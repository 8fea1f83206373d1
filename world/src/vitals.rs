//! Health bookkeeping shared by every combat agent.

/// Current and maximum health of an agent; alive exactly while health is positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vitals {
    health: f32,
    max_health: f32,
}

/// Outcome of applying damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Hit {
    pub(crate) dealt: f32,
    pub(crate) killed: bool,
}

impl Hit {
    const NONE: Self = Self {
        dealt: 0.0,
        killed: false,
    };
}

impl Vitals {
    pub(crate) fn full(max_health: f32) -> Self {
        let max_health = sanitize_max(max_health);
        Self {
            health: max_health,
            max_health,
        }
    }

    pub(crate) fn health(&self) -> f32 {
        self.health
    }

    pub(crate) fn max_health(&self) -> f32 {
        self.max_health
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn fraction(&self) -> f32 {
        self.health / self.max_health
    }

    /// Removes health; only the blow that reaches zero reports `killed`.
    pub(crate) fn damage(&mut self, amount: f32) -> Hit {
        if !self.is_alive() || !(amount > 0.0) {
            return Hit::NONE;
        }
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        Hit {
            dealt: before - self.health,
            killed: self.health <= 0.0,
        }
    }

    /// Restores health up to the maximum; the dead cannot be healed.
    pub(crate) fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || !(amount > 0.0) {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    /// Brings a dead agent back with a fraction of its maximum health.
    pub(crate) fn revive(&mut self, fraction: f32) -> bool {
        if self.is_alive() {
            return false;
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.health =
            (self.max_health * fraction).clamp(1.0_f32.min(self.max_health), self.max_health);
        true
    }

    /// Changes the maximum, clamping current health into range.
    pub(crate) fn set_max_health(&mut self, max_health: f32) {
        self.max_health = sanitize_max(max_health);
        self.health = self.health.min(self.max_health);
    }
}

fn sanitize_max(max_health: f32) -> f32 {
    if max_health.is_finite() {
        max_health.max(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(vitals: &Vitals) {
        assert!(vitals.health() >= 0.0);
        assert!(vitals.health() <= vitals.max_health());
        assert_eq!(vitals.is_alive(), vitals.health() > 0.0);
    }

    #[test]
    fn health_stays_within_bounds_under_mixed_traffic() {
        let mut vitals = Vitals::full(120.0);
        let mut deaths = 0;
        for step in 0..400_u32 {
            let amount = ((step * 37) % 90) as f32 - 20.0;
            if step % 3 == 0 {
                let _ = vitals.heal(amount);
            } else if step % 17 == 0 {
                let _ = vitals.revive(amount / 50.0);
            } else {
                let hit = vitals.damage(amount);
                if hit.killed {
                    deaths += 1;
                }
            }
            assert_invariant(&vitals);
        }
        assert!(deaths > 0);
    }

    #[test]
    fn only_the_killing_blow_reports_death() {
        let mut vitals = Vitals::full(10.0);
        assert!(!vitals.damage(4.0).killed);
        let hit = vitals.damage(50.0);
        assert!(hit.killed);
        assert_eq!(hit.dealt, 6.0);
        assert_eq!(vitals.damage(5.0), Hit::NONE);
        assert_eq!(vitals.heal(5.0), 0.0);
    }

    #[test]
    fn revive_requires_death() {
        let mut vitals = Vitals::full(200.0);
        assert!(!vitals.revive(0.5));
        let _ = vitals.damage(500.0);
        assert!(vitals.revive(0.5));
        assert_eq!(vitals.health(), 100.0);
        assert!(vitals.is_alive());
    }

    #[test]
    fn revive_with_zero_fraction_still_restores_life() {
        let mut vitals = Vitals::full(50.0);
        let _ = vitals.damage(60.0);
        assert!(vitals.revive(0.0));
        assert!(vitals.is_alive());
        assert_invariant(&vitals);
    }

    #[test]
    fn shrinking_maximum_clamps_health() {
        let mut vitals = Vitals::full(150.0);
        vitals.set_max_health(120.0);
        assert_eq!(vitals.health(), 120.0);
        assert_invariant(&vitals);
    }
}
