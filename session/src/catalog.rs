//! Built-in stat blocks for every monster the wave tables reference and the
//! twelve recruitable heroes.

use std::{collections::BTreeMap, time::Duration};

use ember_keepers_core::{
    AbilityKind, Attributes, Element, GoldRange, HeroClass, HeroTemplate, MonsterRank,
    MonsterTemplate, Resistances, SkillKind, TemplateError, TemplateId, TemplateSource,
};

const SKILL_COOLDOWN: Duration = Duration::from_secs(10);
const SKILL_ENERGY_COST: f32 = 50.0;

struct MonsterRow {
    id: &'static str,
    name: &'static str,
    affinity: Element,
    rank: MonsterRank,
    health: f32,
    attack: f32,
    attack_interval_ms: u64,
    move_speed: f32,
    resistances: Resistances,
    ability: Option<AbilityKind>,
    gold: (u32, u32),
}

const MONSTERS: [MonsterRow; 17] = [
    MonsterRow {
        id: "whisper",
        name: "Shadow Whisper",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 50.0,
        attack: 5.0,
        attack_interval_ms: 1_000,
        move_speed: 3.0,
        resistances: Resistances::NONE,
        ability: None,
        gold: (5, 15),
    },
    MonsterRow {
        id: "corroder",
        name: "Corroder",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 80.0,
        attack: 8.0,
        attack_interval_ms: 1_000,
        move_speed: 3.5,
        resistances: Resistances::NONE,
        ability: None,
        gold: (5, 15),
    },
    MonsterRow {
        id: "bonewall",
        name: "Bonewall",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 150.0,
        attack: 6.0,
        attack_interval_ms: 1_200,
        move_speed: 2.0,
        resistances: Resistances::physical(0.3),
        ability: None,
        gold: (8, 18),
    },
    MonsterRow {
        id: "fire_aberration",
        name: "Fire Aberration",
        affinity: Element::Fire,
        rank: MonsterRank::Normal,
        health: 120.0,
        attack: 10.0,
        attack_interval_ms: 1_000,
        move_speed: 3.0,
        resistances: Resistances::NONE.with(Element::Fire, 0.5),
        ability: None,
        gold: (8, 18),
    },
    MonsterRow {
        id: "ice_aberration",
        name: "Ice Aberration",
        affinity: Element::Ice,
        rank: MonsterRank::Normal,
        health: 120.0,
        attack: 10.0,
        attack_interval_ms: 1_000,
        move_speed: 3.0,
        resistances: Resistances::NONE.with(Element::Ice, 0.5),
        ability: None,
        gold: (8, 18),
    },
    MonsterRow {
        id: "thunder_aberration",
        name: "Thunder Aberration",
        affinity: Element::Thunder,
        rank: MonsterRank::Normal,
        health: 120.0,
        attack: 10.0,
        attack_interval_ms: 1_000,
        move_speed: 3.0,
        resistances: Resistances::NONE.with(Element::Thunder, 0.5),
        ability: None,
        gold: (8, 18),
    },
    MonsterRow {
        id: "chaos_mage",
        name: "Chaos Mage",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 90.0,
        attack: 14.0,
        attack_interval_ms: 1_500,
        move_speed: 2.5,
        resistances: Resistances::elemental(0.2),
        ability: None,
        gold: (10, 20),
    },
    MonsterRow {
        id: "cluster",
        name: "Cluster",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 200.0,
        attack: 12.0,
        attack_interval_ms: 1_200,
        move_speed: 2.0,
        resistances: Resistances::physical(0.2),
        ability: None,
        gold: (10, 20),
    },
    MonsterRow {
        id: "shadow_assassin",
        name: "Shadow Assassin",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 100.0,
        attack: 18.0,
        attack_interval_ms: 800,
        move_speed: 4.5,
        resistances: Resistances::NONE,
        ability: None,
        gold: (12, 22),
    },
    MonsterRow {
        id: "void_aggregate",
        name: "Void Aggregate",
        affinity: Element::None,
        rank: MonsterRank::Normal,
        health: 350.0,
        attack: 20.0,
        attack_interval_ms: 1_500,
        move_speed: 1.8,
        resistances: Resistances::elemental(0.25).with(Element::None, 0.25),
        ability: None,
        gold: (15, 25),
    },
    MonsterRow {
        id: "earth_devourer",
        name: "Earth Devourer",
        affinity: Element::Earth,
        rank: MonsterRank::Elite,
        health: 300.0,
        attack: 22.0,
        attack_interval_ms: 1_500,
        move_speed: 2.0,
        resistances: Resistances::NONE.with(Element::Earth, 0.5),
        ability: None,
        gold: (30, 50),
    },
    MonsterRow {
        id: "flame_commander",
        name: "Flame Commander",
        affinity: Element::Fire,
        rank: MonsterRank::Elite,
        health: 300.0,
        attack: 20.0,
        attack_interval_ms: 1_000,
        move_speed: 2.5,
        resistances: Resistances::NONE.with(Element::Fire, 0.5),
        ability: Some(AbilityKind::FlameRally),
        gold: (30, 50),
    },
    MonsterRow {
        id: "frost_golem",
        name: "Frost Golem",
        affinity: Element::Ice,
        rank: MonsterRank::Elite,
        health: 400.0,
        attack: 25.0,
        attack_interval_ms: 1_000,
        move_speed: 1.5,
        resistances: Resistances::NONE.with(Element::Ice, 0.6),
        ability: Some(AbilityKind::FrostChill),
        gold: (30, 50),
    },
    MonsterRow {
        id: "electric_fission",
        name: "Electric Fission",
        affinity: Element::Thunder,
        rank: MonsterRank::Elite,
        health: 250.0,
        attack: 15.0,
        attack_interval_ms: 1_000,
        move_speed: 3.5,
        resistances: Resistances::NONE.with(Element::Thunder, 0.5),
        ability: Some(AbilityKind::FissionBurst),
        gold: (30, 50),
    },
    MonsterRow {
        id: "boss_desolate_lord",
        name: "Desolate Lord",
        affinity: Element::None,
        rank: MonsterRank::Boss,
        health: 2_000.0,
        attack: 40.0,
        attack_interval_ms: 1_000,
        move_speed: 2.0,
        resistances: Resistances::physical(0.3),
        ability: Some(AbilityKind::DesolateSummons),
        gold: (200, 300),
    },
    MonsterRow {
        id: "boss_eternal_frost",
        name: "Eternal Frost",
        affinity: Element::Ice,
        rank: MonsterRank::Boss,
        health: 3_000.0,
        attack: 35.0,
        attack_interval_ms: 1_000,
        move_speed: 1.8,
        resistances: Resistances::NONE.with(Element::Ice, 0.8),
        ability: Some(AbilityKind::EternalFrostCycle),
        gold: (300, 400),
    },
    MonsterRow {
        id: "boss_rift_heart",
        name: "Rift Heart",
        affinity: Element::None,
        rank: MonsterRank::Boss,
        health: 5_000.0,
        attack: 50.0,
        attack_interval_ms: 1_000,
        move_speed: 1.5,
        resistances: Resistances::elemental(0.3).with(Element::None, 0.4),
        ability: Some(AbilityKind::RiftSuppression),
        gold: (500, 600),
    },
];

struct HeroRow {
    id: &'static str,
    name: &'static str,
    element: Element,
    class: HeroClass,
    strength: u32,
    agility: u32,
    intelligence: u32,
    skill: SkillKind,
}

const HEROES: [HeroRow; 12] = [
    HeroRow {
        id: "ignis",
        name: "Ignis",
        element: Element::Fire,
        class: HeroClass::Dps,
        strength: 0,
        agility: 3,
        intelligence: 2,
        skill: SkillKind::BurningSoulBarrage,
    },
    HeroRow {
        id: "cinder",
        name: "Cinder",
        element: Element::Fire,
        class: HeroClass::Guardian,
        strength: 5,
        agility: 0,
        intelligence: 0,
        skill: SkillKind::MoltenArmor,
    },
    HeroRow {
        id: "sol",
        name: "Sol",
        element: Element::Fire,
        class: HeroClass::Support,
        strength: 0,
        agility: 0,
        intelligence: 5,
        skill: SkillKind::PurifyingFlame,
    },
    HeroRow {
        id: "cryo",
        name: "Cryo",
        element: Element::Ice,
        class: HeroClass::Dps,
        strength: 0,
        agility: 5,
        intelligence: 0,
        skill: SkillKind::FrostPierce,
    },
    HeroRow {
        id: "boreas",
        name: "Boreas",
        element: Element::Ice,
        class: HeroClass::Guardian,
        strength: 3,
        agility: 0,
        intelligence: 2,
        skill: SkillKind::AbsoluteZero,
    },
    HeroRow {
        id: "glacia",
        name: "Glacia",
        element: Element::Ice,
        class: HeroClass::Support,
        strength: 0,
        agility: 0,
        intelligence: 5,
        skill: SkillKind::IceBarrier,
    },
    HeroRow {
        id: "volta",
        name: "Volta",
        element: Element::Thunder,
        class: HeroClass::Dps,
        strength: 0,
        agility: 2,
        intelligence: 3,
        skill: SkillKind::ChainLightning,
    },
    HeroRow {
        id: "fulgur",
        name: "Fulgur",
        element: Element::Thunder,
        class: HeroClass::Guardian,
        strength: 5,
        agility: 0,
        intelligence: 0,
        skill: SkillKind::ChargeOverload,
    },
    HeroRow {
        id: "surge",
        name: "Surge",
        element: Element::Thunder,
        class: HeroClass::Support,
        strength: 0,
        agility: 0,
        intelligence: 5,
        skill: SkillKind::EnergySurge,
    },
    HeroRow {
        id: "rocker",
        name: "Rocker",
        element: Element::Earth,
        class: HeroClass::Dps,
        strength: 2,
        agility: 3,
        intelligence: 0,
        skill: SkillKind::SeismicShot,
    },
    HeroRow {
        id: "terra",
        name: "Terra",
        element: Element::Earth,
        class: HeroClass::Guardian,
        strength: 5,
        agility: 0,
        intelligence: 0,
        skill: SkillKind::PetrifiedSkin,
    },
    HeroRow {
        id: "mire",
        name: "Mire",
        element: Element::Earth,
        class: HeroClass::Support,
        strength: 0,
        agility: 0,
        intelligence: 5,
        skill: SkillKind::MireTrap,
    },
];

impl MonsterRow {
    fn template(&self) -> MonsterTemplate {
        MonsterTemplate {
            id: TemplateId::new(self.id),
            name: self.name.to_owned(),
            affinity: self.affinity,
            rank: self.rank,
            base_health: self.health,
            base_attack: self.attack,
            attack_interval: Duration::from_millis(self.attack_interval_ms),
            move_speed: self.move_speed,
            resistances: self.resistances,
            ability: self.ability,
            gold_drop: GoldRange::new(self.gold.0, self.gold.1),
        }
    }
}

impl HeroRow {
    fn template(&self) -> HeroTemplate {
        HeroTemplate {
            id: TemplateId::new(self.id),
            name: self.name.to_owned(),
            element: self.element,
            class: self.class,
            attributes: Attributes {
                strength: self.strength,
                agility: self.agility,
                intelligence: self.intelligence,
                element_mastery: 0,
            },
            skill: self.skill,
            skill_cooldown: SKILL_COOLDOWN,
            skill_energy_cost: SKILL_ENERGY_COST,
            resistances: Resistances::NONE,
        }
    }
}

/// In-memory template source.
///
/// The default catalog carries the built-in roster; templates can be added or
/// replaced with [`TemplateCatalog::insert_monster`] and
/// [`TemplateCatalog::insert_hero`].
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateCatalog {
    monsters: BTreeMap<TemplateId, MonsterTemplate>,
    heroes: BTreeMap<TemplateId, HeroTemplate>,
}

impl TemplateCatalog {
    /// Creates a catalog without any template.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            monsters: BTreeMap::new(),
            heroes: BTreeMap::new(),
        }
    }

    /// Registers or replaces a monster template.
    pub fn insert_monster(&mut self, template: MonsterTemplate) {
        let _ = self.monsters.insert(template.id.clone(), template);
    }

    /// Registers or replaces a hero template.
    pub fn insert_hero(&mut self, template: HeroTemplate) {
        let _ = self.heroes.insert(template.id.clone(), template);
    }

    /// Identifiers of every registered hero, in order.
    pub fn hero_ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.heroes.keys()
    }

    /// Identifiers of every registered monster, in order.
    pub fn monster_ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.monsters.keys()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for row in &MONSTERS {
            catalog.insert_monster(row.template());
        }
        for row in &HEROES {
            catalog.insert_hero(row.template());
        }
        catalog
    }
}

impl TemplateSource for TemplateCatalog {
    fn monster_template(&self, id: &TemplateId) -> Result<MonsterTemplate, TemplateError> {
        self.monsters
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownMonster(id.clone()))
    }

    fn hero_template(&self, id: &TemplateId) -> Result<HeroTemplate, TemplateError> {
        self.heroes
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownHero(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_keepers_system_wave_config::{endless_waves, main_waves};

    #[test]
    fn every_scheduled_monster_resolves() {
        let catalog = TemplateCatalog::default();
        let manifests = main_waves().into_iter().chain(endless_waves(7));
        for manifest in manifests {
            for group in &manifest.groups {
                assert!(
                    catalog.monster_template(&group.monster).is_ok(),
                    "{} is missing",
                    group.monster
                );
            }
            if let Some(boss) = &manifest.boss {
                let template = catalog.monster_template(boss).expect("boss template");
                assert_eq!(template.rank, MonsterRank::Boss);
            }
        }
    }

    #[test]
    fn roster_covers_every_element_and_class_once() {
        let catalog = TemplateCatalog::default();
        let mut pairs = Vec::new();
        for id in catalog.hero_ids() {
            let hero = catalog.hero_template(id).expect("hero");
            assert_eq!(hero.skill.element(), hero.element);
            pairs.push((hero.element, hero.class as u8));
        }
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 12);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let catalog = TemplateCatalog::default();
        assert_eq!(
            catalog.hero_template(&TemplateId::new("whisper")),
            Err(TemplateError::UnknownHero(TemplateId::new("whisper")))
        );
        assert_eq!(
            catalog.monster_template(&TemplateId::new("ignis")),
            Err(TemplateError::UnknownMonster(TemplateId::new("ignis")))
        );
    }
}
