#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Elemental advantage table and resistance-adjusted damage.

use ember_keepers_core::{Element, HeroSnapshot, MonsterSnapshot, Resistances};

/// Smallest amount of damage any resolved attack deals.
pub const MINIMUM_DAMAGE: f32 = 1.0;

const ADVANTAGE: f32 = 1.5;
const DISADVANTAGE: f32 = 0.75;
const NEUTRAL: f32 = 1.0;

/// Defensive properties consulted when resolving an attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderProfile {
    /// Elemental affinity the advantage table is keyed on.
    pub affinity: Element,
    /// Damage reduction per element.
    pub resistances: Resistances,
}

impl From<&MonsterSnapshot> for DefenderProfile {
    fn from(monster: &MonsterSnapshot) -> Self {
        Self {
            affinity: monster.affinity,
            resistances: monster.resistances,
        }
    }
}

impl From<&HeroSnapshot> for DefenderProfile {
    fn from(hero: &HeroSnapshot) -> Self {
        Self {
            affinity: hero.element,
            resistances: hero.resistances,
        }
    }
}

/// Advantage multiplier of `attacker` against a defender of element `defender`.
#[must_use]
pub const fn multiplier(attacker: Element, defender: Element) -> f32 {
    match (attacker, defender) {
        (Element::Fire, Element::Ice) | (Element::Thunder, Element::Earth) => ADVANTAGE,
        (Element::Ice, Element::Fire) | (Element::Earth, Element::Thunder) => DISADVANTAGE,
        _ => NEUTRAL,
    }
}

/// `max(1, base × (1 − resistance) × multiplier)`.
///
/// Physical attacks ([`Element::None`]) are reduced by the physical
/// resistance. Resistances above one never heal the defender; the result is
/// floored instead.
#[must_use]
pub fn final_damage(base: f32, element: Element, defender: &DefenderProfile) -> f32 {
    let resistance = defender.resistances.against(element);
    let raw = base * (1.0 - resistance) * multiplier(element, defender.affinity);
    raw.max(MINIMUM_DAMAGE)
}

/// Damage a hero actually loses: the resolved amount minus flat defence, floored at one.
#[must_use]
pub fn hero_intake(base: f32, element: Element, hero: &HeroSnapshot) -> f32 {
    let resolved = final_damage(base, element, &DefenderProfile::from(hero));
    (resolved - hero.physical_defense).max(MINIMUM_DAMAGE)
}
