//! Behaviours attached to elite and boss monsters.
//!
//! A behaviour never touches world state directly. It reports
//! [`AbilityEffect`] values which the world resolves into state changes and
//! events, so the same monster type can be exercised without a live world.

use std::{fmt, time::Duration};

use ember_keepers_core::{AbilityKind, Element, TemplateId};

use crate::status::Cadence;

const SUMMON_INTERVAL: Duration = Duration::from_secs(15);
const SUMMON_TEMPLATE: &str = "corroder";
const SUMMON_LEVEL: u32 = 3;
const MINIONS_PER_RIFT: u32 = 5;
const RIFTS: u32 = 3;
const ENRAGED_RIFTS: u32 = 4;
const ENRAGE_THRESHOLD: f32 = 0.5;

const WEAKNESS_INTERVAL: Duration = Duration::from_secs(20);
const FORMER_WEAKNESS_RESISTANCE: f32 = 0.2;
const WEAKNESS_RESISTANCE: f32 = -0.3;

const SUPPRESSION_INTERVAL: Duration = Duration::from_secs(25);
const SUPPRESSION_DURATION: Duration = Duration::from_secs(8);

const RALLY_INTERVAL: Duration = Duration::from_secs(5);
const RALLY_RADIUS: f32 = 8.0;
const RALLY_BONUS: f32 = 0.3;

const CHILL_RADIUS: f32 = 4.0;
const CHILL_FRACTION: f32 = 0.5;
const CHILL_DURATION: Duration = Duration::from_secs(2);

const BURST_RADIUS: f32 = 6.0;
const BURST_DAMAGE: f32 = 100.0;

/// Request produced by a behaviour for the world to carry out.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AbilityEffect {
    Summon {
        template: TemplateId,
        count: u32,
        level: u32,
    },
    ShiftWeakness {
        previous: Element,
        previous_resistance: f32,
        next: Element,
        next_resistance: f32,
    },
    Suppress {
        duration: Duration,
    },
    Rally {
        radius: f32,
        bonus: f32,
        duration: Duration,
    },
    Chill {
        radius: f32,
        fraction: f32,
        duration: Duration,
    },
    Burst {
        radius: f32,
        damage: f32,
        element: Element,
    },
}

/// Capability set of an attached behaviour.
pub(crate) trait SpecialAbility: fmt::Debug {
    /// Runs once per tick while the bearer lives.
    fn on_tick(&mut self, dt: Duration, health_fraction: f32, out: &mut Vec<AbilityEffect>);

    /// Runs after the bearer lands a melee hit.
    fn on_strike(&mut self, _out: &mut Vec<AbilityEffect>) {}

    /// Runs once when the bearer dies.
    fn on_death(&mut self, _out: &mut Vec<AbilityEffect>) {}
}

/// Builds the behaviour object for the provided ability.
pub(crate) fn attach(kind: AbilityKind) -> Box<dyn SpecialAbility> {
    match kind {
        AbilityKind::DesolateSummons => Box::new(DesolateSummons {
            cadence: Cadence::new(SUMMON_INTERVAL),
            enraged: false,
        }),
        AbilityKind::EternalFrostCycle => Box::new(EternalFrostCycle {
            cadence: Cadence::new(WEAKNESS_INTERVAL),
            weakness: Element::Fire,
        }),
        AbilityKind::RiftSuppression => Box::new(RiftSuppression {
            cadence: Cadence::new(SUPPRESSION_INTERVAL),
        }),
        AbilityKind::FlameRally => Box::new(FlameRally {
            cadence: Cadence::new(RALLY_INTERVAL),
        }),
        AbilityKind::FrostChill => Box::new(FrostChill),
        AbilityKind::FissionBurst => Box::new(FissionBurst),
    }
}

#[derive(Debug)]
struct DesolateSummons {
    cadence: Cadence,
    enraged: bool,
}

impl SpecialAbility for DesolateSummons {
    fn on_tick(&mut self, dt: Duration, health_fraction: f32, out: &mut Vec<AbilityEffect>) {
        if health_fraction < ENRAGE_THRESHOLD {
            self.enraged = true;
        }
        let rifts = if self.enraged { ENRAGED_RIFTS } else { RIFTS };
        for _ in 0..self.cadence.advance(dt) {
            out.push(AbilityEffect::Summon {
                template: TemplateId::new(SUMMON_TEMPLATE),
                count: rifts * MINIONS_PER_RIFT,
                level: SUMMON_LEVEL,
            });
        }
    }
}

#[derive(Debug)]
struct EternalFrostCycle {
    cadence: Cadence,
    weakness: Element,
}

impl SpecialAbility for EternalFrostCycle {
    fn on_tick(&mut self, dt: Duration, _health_fraction: f32, out: &mut Vec<AbilityEffect>) {
        for _ in 0..self.cadence.advance(dt) {
            let previous = self.weakness;
            let next = match previous {
                Element::Fire => Element::Thunder,
                Element::Thunder => Element::Earth,
                _ => Element::Fire,
            };
            self.weakness = next;
            out.push(AbilityEffect::ShiftWeakness {
                previous,
                previous_resistance: FORMER_WEAKNESS_RESISTANCE,
                next,
                next_resistance: WEAKNESS_RESISTANCE,
            });
        }
    }
}

#[derive(Debug)]
struct RiftSuppression {
    cadence: Cadence,
}

impl SpecialAbility for RiftSuppression {
    fn on_tick(&mut self, dt: Duration, _health_fraction: f32, out: &mut Vec<AbilityEffect>) {
        if self.cadence.advance(dt) > 0 {
            out.push(AbilityEffect::Suppress {
                duration: SUPPRESSION_DURATION,
            });
        }
    }
}

#[derive(Debug)]
struct FlameRally {
    cadence: Cadence,
}

impl SpecialAbility for FlameRally {
    fn on_tick(&mut self, dt: Duration, _health_fraction: f32, out: &mut Vec<AbilityEffect>) {
        if self.cadence.advance(dt) > 0 {
            out.push(AbilityEffect::Rally {
                radius: RALLY_RADIUS,
                bonus: RALLY_BONUS,
                duration: RALLY_INTERVAL,
            });
        }
    }
}

#[derive(Debug)]
struct FrostChill;

impl SpecialAbility for FrostChill {
    fn on_tick(&mut self, _dt: Duration, _health_fraction: f32, _out: &mut Vec<AbilityEffect>) {}

    fn on_strike(&mut self, out: &mut Vec<AbilityEffect>) {
        out.push(AbilityEffect::Chill {
            radius: CHILL_RADIUS,
            fraction: CHILL_FRACTION,
            duration: CHILL_DURATION,
        });
    }
}

#[derive(Debug)]
struct FissionBurst;

impl SpecialAbility for FissionBurst {
    fn on_tick(&mut self, _dt: Duration, _health_fraction: f32, _out: &mut Vec<AbilityEffect>) {}

    fn on_death(&mut self, out: &mut Vec<AbilityEffect>) {
        out.push(AbilityEffect::Burst {
            radius: BURST_RADIUS,
            damage: BURST_DAMAGE,
            element: Element::Thunder,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: AbilityKind, seconds: u64, health_fraction: f32) -> Vec<AbilityEffect> {
        let mut ability = attach(kind);
        let mut out = Vec::new();
        for _ in 0..seconds {
            ability.on_tick(Duration::from_secs(1), health_fraction, &mut out);
        }
        out
    }

    #[test]
    fn desolate_lord_opens_more_rifts_when_wounded() {
        let calm = run(AbilityKind::DesolateSummons, 15, 1.0);
        let wounded = run(AbilityKind::DesolateSummons, 15, 0.4);
        let counts = |effects: &[AbilityEffect]| -> Vec<u32> {
            effects
                .iter()
                .filter_map(|effect| match effect {
                    AbilityEffect::Summon { count, .. } => Some(*count),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(counts(&calm), vec![15]);
        assert_eq!(counts(&wounded), vec![20]);
    }

    #[test]
    fn eternal_frost_rotates_through_three_weaknesses() {
        let effects = run(AbilityKind::EternalFrostCycle, 80, 1.0);
        let rotation: Vec<(Element, Element)> = effects
            .iter()
            .filter_map(|effect| match effect {
                AbilityEffect::ShiftWeakness { previous, next, .. } => Some((*previous, *next)),
                _ => None,
            })
            .collect();
        assert_eq!(
            rotation,
            vec![
                (Element::Fire, Element::Thunder),
                (Element::Thunder, Element::Earth),
                (Element::Earth, Element::Fire),
                (Element::Fire, Element::Thunder),
            ]
        );
    }

    #[test]
    fn rift_heart_suppresses_every_twenty_five_seconds() {
        let effects = run(AbilityKind::RiftSuppression, 60, 1.0);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn reactive_abilities_stay_quiet_on_tick() {
        assert!(run(AbilityKind::FrostChill, 30, 1.0).is_empty());
        assert!(run(AbilityKind::FissionBurst, 30, 1.0).is_empty());

        let mut fission = attach(AbilityKind::FissionBurst);
        let mut out = Vec::new();
        fission.on_strike(&mut out);
        assert!(out.is_empty());
        fission.on_death(&mut out);
        assert_eq!(out.len(), 1);
    }
}
