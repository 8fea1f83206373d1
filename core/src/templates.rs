//! Static stat blocks that the world instantiates into live agents.

use std::{ops::Add, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{AbilityKind, Element, MonsterRank, Resistances, SkillKind, TemplateId};

/// Number of equipment slots carried by every hero.
pub const EQUIPMENT_SLOTS: usize = 6;

const HEALTH_AND_ATTACK_PER_LEVEL: f32 = 0.3;
const SPEED_PER_LEVEL: f32 = 0.1;

/// Inclusive range of gold dropped by a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoldRange {
    /// Smallest possible drop.
    pub min: u32,
    /// Largest possible drop.
    pub max: u32,
}

impl GoldRange {
    /// Creates a range, swapping the bounds when they are reversed.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

/// Stat block describing a monster type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    /// Identifier used by wave manifests.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Element of the monster's attacks.
    pub affinity: Element,
    /// Rank of the monster.
    pub rank: MonsterRank,
    /// Health at level one.
    pub base_health: f32,
    /// Attack damage at level one.
    pub base_attack: f32,
    /// Time between melee attacks.
    pub attack_interval: Duration,
    /// Movement speed at level one in units per second.
    pub move_speed: f32,
    /// Damage reduction per element.
    pub resistances: Resistances,
    /// Attached elite or boss behaviour.
    pub ability: Option<AbilityKind>,
    /// Gold dropped on death.
    pub gold_drop: GoldRange,
}

/// Level-scaled stats of a monster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterStats {
    /// Maximum health.
    pub max_health: f32,
    /// Attack damage.
    pub attack: f32,
    /// Movement speed.
    pub move_speed: f32,
}

impl MonsterTemplate {
    /// Scales the template to the provided level; levels below one count as one.
    #[must_use]
    pub fn stats_at(&self, level: u32) -> MonsterStats {
        let steps = level.max(1).saturating_sub(1) as f32;
        let power = 1.0 + steps * HEALTH_AND_ATTACK_PER_LEVEL;
        MonsterStats {
            max_health: self.base_health * power,
            attack: self.base_attack * power,
            move_speed: self.move_speed * (1.0 + steps * SPEED_PER_LEVEL),
        }
    }
}

/// Combat role of a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroClass {
    /// Frontline tank.
    Guardian,
    /// Damage dealer.
    Dps,
    /// Healer and controller.
    Support,
}

/// Primary attributes of a hero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Raises health and defence.
    pub strength: u32,
    /// Raises attack and movement speed.
    pub agility: u32,
    /// Raises energy regeneration.
    pub intelligence: u32,
    /// Raises elemental potency.
    pub element_mastery: u32,
}

/// Stat block describing a recruitable hero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroTemplate {
    /// Identifier used when recruiting.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Element of the hero's attacks.
    pub element: Element,
    /// Combat role.
    pub class: HeroClass,
    /// Primary attributes.
    pub attributes: Attributes,
    /// Skill occupying the hero's active slot.
    pub skill: SkillKind,
    /// Full cooldown of the skill.
    pub skill_cooldown: Duration,
    /// Energy consumed by the skill.
    pub skill_energy_cost: f32,
    /// Base damage reduction per element.
    pub resistances: Resistances,
}

/// Stats derived from a hero's attributes and gear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    /// Maximum health.
    pub max_health: f32,
    /// Flat reduction applied to every incoming hit.
    pub physical_defense: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Energy regenerated per second.
    pub energy_regen: f32,
    /// Energy capacity.
    pub max_energy: f32,
    /// Damage of an auto-attack.
    pub attack_damage: f32,
    /// Distance at which auto-attacks connect.
    pub attack_range: f32,
    /// Distance at which targets are acquired.
    pub detection_range: f32,
}

impl HeroTemplate {
    /// Stats before equipment and buffs.
    #[must_use]
    pub fn base_stats(&self) -> HeroStats {
        let attributes = self.attributes;
        HeroStats {
            max_health: 100.0 + 10.0 * attributes.strength as f32,
            physical_defense: 0.5 * attributes.strength as f32,
            attack_speed: 1.0 + 0.05 * attributes.agility as f32,
            move_speed: 5.0 + 0.2 * attributes.agility as f32,
            energy_regen: 5.0 + 0.3 * attributes.intelligence as f32,
            max_energy: 100.0,
            attack_damage: 10.0,
            attack_range: 5.0,
            detection_range: 10.0,
        }
    }
}

impl HeroStats {
    /// Applies flat modifiers, keeping rates positive.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: &StatModifiers) -> Self {
        self.attack_damage = (self.attack_damage + modifiers.attack).max(0.0);
        self.attack_speed = (self.attack_speed + modifiers.attack_speed).max(0.1);
        self.physical_defense += modifiers.physical_defense;
        self.max_health = (self.max_health + modifiers.max_health).max(1.0);
        self.energy_regen = (self.energy_regen + modifiers.energy_regen).max(0.0);
        self
    }
}

/// Rarity tier of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    /// Baseline tier.
    Common,
    /// Second tier.
    Rare,
    /// Third tier.
    Epic,
    /// Top tier.
    Legendary,
}

/// Kind of slot an item is designed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlotKind {
    /// Weapon slot.
    Weapon,
    /// Body armour slot.
    Armor,
    /// Head slot.
    Helmet,
    /// Feet slot.
    Boots,
    /// Ring slot.
    Ring,
    /// Neck slot.
    Amulet,
}

/// Flat stat adjustments carried by equipment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatModifiers {
    /// Added auto-attack damage.
    pub attack: f32,
    /// Added attacks per second.
    pub attack_speed: f32,
    /// Added physical defence.
    pub physical_defense: f32,
    /// Added maximum health.
    pub max_health: f32,
    /// Added energy regeneration.
    pub energy_regen: f32,
}

impl Add for StatModifiers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            attack: self.attack + rhs.attack,
            attack_speed: self.attack_speed + rhs.attack_speed,
            physical_defense: self.physical_defense + rhs.physical_defense,
            max_health: self.max_health + rhs.max_health,
            energy_regen: self.energy_regen + rhs.energy_regen,
        }
    }
}

/// Item that can occupy a hero equipment slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Identifier of the item.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Slot the item is designed for.
    pub slot_kind: EquipmentSlotKind,
    /// Stats granted while equipped.
    pub modifiers: StatModifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whisper() -> MonsterTemplate {
        MonsterTemplate {
            id: TemplateId::new("whisper"),
            name: "Whisper".to_owned(),
            affinity: Element::None,
            rank: MonsterRank::Normal,
            base_health: 50.0,
            base_attack: 5.0,
            attack_interval: Duration::from_secs(1),
            move_speed: 3.0,
            resistances: Resistances::NONE,
            ability: None,
            gold_drop: GoldRange::new(5, 15),
        }
    }

    #[test]
    fn level_one_matches_template() {
        let stats = whisper().stats_at(1);
        assert_eq!(stats.max_health, 50.0);
        assert_eq!(stats.attack, 5.0);
        assert_eq!(stats.move_speed, 3.0);
    }

    #[test]
    fn levels_scale_health_attack_and_speed() {
        let stats = whisper().stats_at(3);
        assert!((stats.max_health - 80.0).abs() < 1e-4);
        assert!((stats.attack - 8.0).abs() < 1e-4);
        assert!((stats.move_speed - 3.6).abs() < 1e-4);
        assert_eq!(whisper().stats_at(0), whisper().stats_at(1));
    }

    #[test]
    fn strength_feeds_health_and_defense() {
        let template = HeroTemplate {
            id: TemplateId::new("terra"),
            name: "Terra".to_owned(),
            element: Element::Earth,
            class: HeroClass::Guardian,
            attributes: Attributes {
                strength: 5,
                ..Attributes::default()
            },
            skill: SkillKind::PetrifiedSkin,
            skill_cooldown: Duration::from_secs(10),
            skill_energy_cost: 50.0,
            resistances: Resistances::NONE,
        };
        let stats = template.base_stats();
        assert_eq!(stats.max_health, 150.0);
        assert_eq!(stats.physical_defense, 2.5);
        assert_eq!(stats.energy_regen, 5.0);

        let geared = stats.with_modifiers(&StatModifiers {
            max_health: 20.0,
            attack_speed: -5.0,
            ..StatModifiers::default()
        });
        assert_eq!(geared.max_health, 170.0);
        assert_eq!(geared.attack_speed, 0.1);
    }

    #[test]
    fn gold_range_orders_bounds() {
        assert_eq!(GoldRange::new(15, 5), GoldRange::new(5, 15));
    }
}
