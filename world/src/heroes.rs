use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Equipment, Event, HeroBuff, HeroId, HeroSnapshot, HeroStats, HeroTemplate, Position,
    SkillKind, StatModifiers, StatusEffect, StatusKind, EQUIPMENT_SLOTS,
};

use crate::{
    status::{Cadence, StatusBook},
    vitals::{Hit, Vitals},
};

/// Cooldown and cost gate of a hero's active skill.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SkillSlot {
    kind: SkillKind,
    cooldown: Duration,
    remaining: Duration,
    cost: f32,
}

impl SkillSlot {
    pub(crate) fn new(kind: SkillKind, cooldown: Duration, cost: f32) -> Self {
        Self {
            kind,
            cooldown,
            remaining: Duration::ZERO,
            cost: cost.max(0.0),
        }
    }

    pub(crate) fn kind(&self) -> SkillKind {
        self.kind
    }

    pub(crate) fn is_ready(&self, energy: f32) -> bool {
        self.remaining.is_zero() && energy >= self.cost
    }

    fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    /// Spends energy and restarts the cooldown, scaled by `cooldown_scale`.
    /// Leaves everything untouched when the skill is not ready.
    pub(crate) fn try_use(&mut self, energy: &mut f32, cooldown_scale: u32) -> bool {
        if !self.is_ready(*energy) {
            return false;
        }
        *energy -= self.cost;
        self.remaining = self.cooldown.saturating_mul(cooldown_scale.max(1));
        true
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveBuff {
    buff: HeroBuff,
    remaining: Duration,
    pulse: Option<Cadence>,
}

impl ActiveBuff {
    fn modifiers(&self) -> StatModifiers {
        match self.buff {
            HeroBuff::AttackSpeed { bonus } => StatModifiers {
                attack_speed: bonus,
                ..StatModifiers::default()
            },
            HeroBuff::Defense { bonus } => StatModifiers {
                physical_defense: bonus,
                ..StatModifiers::default()
            },
            HeroBuff::ShockAura { .. } => StatModifiers::default(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct HeroState {
    pub(crate) id: HeroId,
    template: HeroTemplate,
    pub(crate) vitals: Vitals,
    stats: HeroStats,
    energy: f32,
    pub(crate) position: Position,
    deployed: bool,
    attack_cooldown: Duration,
    pub(crate) skill: SkillSlot,
    equipment: [Option<Equipment>; EQUIPMENT_SLOTS],
    buffs: Vec<ActiveBuff>,
    pub(crate) statuses: StatusBook,
    fallen_at_tick: Option<u64>,
}

impl HeroState {
    pub(crate) fn recruit(id: HeroId, template: HeroTemplate) -> Self {
        let stats = template.base_stats().with_modifiers(&StatModifiers::default());
        let skill = SkillSlot::new(
            template.skill,
            template.skill_cooldown,
            template.skill_energy_cost,
        );
        Self {
            id,
            vitals: Vitals::full(stats.max_health),
            stats,
            energy: 0.0,
            position: Position::ORIGIN,
            deployed: false,
            attack_cooldown: Duration::ZERO,
            skill,
            equipment: Default::default(),
            buffs: Vec::new(),
            statuses: StatusBook::default(),
            fallen_at_tick: None,
            template,
        }
    }

    pub(crate) fn is_fighting(&self) -> bool {
        self.deployed && self.vitals.is_alive()
    }

    pub(crate) fn is_deployed(&self) -> bool {
        self.deployed
    }

    pub(crate) fn deploy(&mut self, position: Position) {
        self.deployed = true;
        self.position = position;
    }

    pub(crate) fn bench(&mut self) {
        self.deployed = false;
    }

    pub(crate) fn attack_ready(&self) -> bool {
        self.attack_cooldown.is_zero()
    }

    pub(crate) fn start_attack_cooldown(&mut self) {
        let interval = 1.0 / self.stats.attack_speed;
        self.attack_cooldown =
            Duration::try_from_secs_f32(interval).unwrap_or(Duration::from_secs(1));
    }

    pub(crate) fn try_use_skill(&mut self, cooldown_scale: u32) -> bool {
        self.skill.try_use(&mut self.energy, cooldown_scale)
    }

    pub(crate) fn restore_energy(&mut self, amount: f32) -> bool {
        if !self.vitals.is_alive() || !(amount > 0.0) {
            return false;
        }
        self.energy = (self.energy + amount).min(self.stats.max_energy);
        true
    }

    pub(crate) fn equip(&mut self, slot: usize, item: Equipment) -> bool {
        let Some(entry) = self.equipment.get_mut(slot) else {
            return false;
        };
        *entry = Some(item);
        self.recompute();
        true
    }

    pub(crate) fn unequip(&mut self, slot: usize) -> bool {
        let Some(entry) = self.equipment.get_mut(slot) else {
            return false;
        };
        let removed = entry.take().is_some();
        if removed {
            self.recompute();
        }
        removed
    }

    pub(crate) fn grant_buff(&mut self, buff: HeroBuff, duration: Duration) {
        let pulse = match buff {
            HeroBuff::ShockAura { interval, .. } => Some(Cadence::new(interval)),
            _ => None,
        };
        self.buffs.push(ActiveBuff {
            buff,
            remaining: duration,
            pulse,
        });
        self.recompute();
    }

    pub(crate) fn take_damage(&mut self, amount: f32, tick_index: u64) -> Hit {
        let hit = self.vitals.damage(amount);
        if hit.killed {
            self.buffs.clear();
            self.statuses.clear_all();
            self.attack_cooldown = Duration::ZERO;
            self.fallen_at_tick = Some(tick_index);
            self.recompute();
        }
        hit
    }

    pub(crate) fn revive(&mut self, health_fraction: f32) -> bool {
        if !self.vitals.revive(health_fraction) {
            return false;
        }
        self.fallen_at_tick = None;
        true
    }

    /// Advances regeneration, cooldowns, statuses and buffs of a living hero.
    pub(crate) fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.vitals.is_alive() {
            return;
        }
        self.skill.advance(dt);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(dt);
        if self.deployed {
            let regenerated = self.energy + self.stats.energy_regen * dt.as_secs_f32();
            self.energy = regenerated.min(self.stats.max_energy);
        }

        let mut expired = Vec::new();
        self.statuses.advance(dt, &mut expired);
        for kind in expired {
            out_events.push(Event::StatusExpired {
                target: AgentRef::Hero(self.id),
                kind,
            });
        }

        let before = self.buffs.len();
        let (hero, origin, deployed) = (self.id, self.position, self.deployed);
        self.buffs.retain_mut(|active| {
            let active_for = dt.min(active.remaining);
            if let (Some(pulse), HeroBuff::ShockAura { radius, damage, .. }) =
                (active.pulse.as_mut(), active.buff)
            {
                for _ in 0..pulse.advance(active_for) {
                    if deployed {
                        out_events.push(Event::ShockPulse {
                            hero,
                            origin,
                            radius,
                            damage,
                        });
                    }
                }
            }
            active.remaining = active.remaining.saturating_sub(dt);
            !active.remaining.is_zero()
        });
        if self.buffs.len() != before {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let gear = self
            .equipment
            .iter()
            .flatten()
            .map(|item| item.modifiers)
            .fold(StatModifiers::default(), |total, modifiers| total + modifiers);
        let buffs = self
            .buffs
            .iter()
            .map(ActiveBuff::modifiers)
            .fold(StatModifiers::default(), |total, modifiers| total + modifiers);
        self.stats = self.template.base_stats().with_modifiers(&(gear + buffs));
        self.vitals.set_max_health(self.stats.max_health);
    }

    pub(crate) fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot {
            id: self.id,
            template: self.template.id.clone(),
            element: self.template.element,
            class: self.template.class,
            position: self.position,
            health: self.vitals.health(),
            max_health: self.vitals.max_health(),
            energy: self.energy,
            max_energy: self.stats.max_energy,
            skill: self.skill.kind,
            skill_cooldown_remaining: self.skill.remaining,
            skill_energy_cost: self.skill.cost,
            deployed: self.deployed,
            attack_ready: self.attack_ready(),
            attack_damage: self.stats.attack_damage,
            attack_range: self.stats.attack_range,
            detection_range: self.stats.detection_range,
            move_speed: self.effective_move_speed(),
            physical_defense: self.stats.physical_defense,
            resistances: self.template.resistances,
            fallen_at_tick: self.fallen_at_tick,
            statuses: self.statuses.kinds(),
        }
    }

    fn effective_move_speed(&self) -> f32 {
        match self.statuses.get(StatusKind::Slow) {
            Some(StatusEffect::Slow { fraction }) => {
                self.stats.move_speed * (1.0 - fraction.clamp(0.0, 1.0))
            }
            _ => self.stats.move_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_keepers_core::{
        Attributes, Element, EquipmentSlotKind, HeroClass, Rarity, Resistances, TemplateId,
    };

    fn template() -> HeroTemplate {
        HeroTemplate {
            id: TemplateId::new("ignis"),
            name: "Ignis".to_owned(),
            element: Element::Fire,
            class: HeroClass::Dps,
            attributes: Attributes {
                agility: 3,
                intelligence: 2,
                ..Attributes::default()
            },
            skill: SkillKind::BurningSoulBarrage,
            skill_cooldown: Duration::from_secs(10),
            skill_energy_cost: 50.0,
            resistances: Resistances::NONE,
        }
    }

    #[test]
    fn skill_never_fires_while_cooling_or_short_of_energy() {
        let cooldowns = [0_u64, 1, 250, 9_999];
        let energies = [0.0_f32, 10.0, 49.9, 50.0, 100.0];
        for remaining_ms in cooldowns {
            for start_energy in energies {
                let mut slot = SkillSlot::new(SkillKind::MireTrap, Duration::from_secs(10), 50.0);
                slot.remaining = Duration::from_millis(remaining_ms);
                let mut energy = start_energy;
                let used = slot.try_use(&mut energy, 1);
                let expected = remaining_ms == 0 && start_energy >= 50.0;
                assert_eq!(used, expected, "cooldown {remaining_ms}ms energy {start_energy}");
                if !used {
                    assert_eq!(energy, start_energy);
                    assert_eq!(slot.remaining, Duration::from_millis(remaining_ms));
                }
            }
        }
    }

    #[test]
    fn suppressed_use_doubles_cooldown() {
        let mut slot = SkillSlot::new(SkillKind::MireTrap, Duration::from_secs(10), 50.0);
        let mut energy = 60.0;
        assert!(slot.try_use(&mut energy, 2));
        assert_eq!(slot.remaining, Duration::from_secs(20));
        assert_eq!(energy, 10.0);
    }

    #[test]
    fn equipment_round_trip_restores_stats() {
        let mut hero = HeroState::recruit(HeroId::new(0), template());
        let baseline = hero.stats;
        let ring = Equipment {
            id: TemplateId::new("ember_ring"),
            name: "Ember Ring".to_owned(),
            rarity: Rarity::Rare,
            slot_kind: EquipmentSlotKind::Ring,
            modifiers: StatModifiers {
                attack: 4.0,
                max_health: 25.0,
                ..StatModifiers::default()
            },
        };
        assert!(!hero.equip(EQUIPMENT_SLOTS, ring.clone()));
        assert!(hero.equip(4, ring));
        assert_eq!(hero.stats.attack_damage, baseline.attack_damage + 4.0);
        assert_eq!(hero.vitals.max_health(), baseline.max_health + 25.0);
        assert!(hero.unequip(4));
        assert!(!hero.unequip(4));
        assert_eq!(hero.stats, baseline);
    }

    #[test]
    fn buff_expiry_removes_exactly_its_bonus() {
        let mut hero = HeroState::recruit(HeroId::new(0), template());
        hero.deploy(Position::ORIGIN);
        let baseline = hero.stats.physical_defense;
        hero.grant_buff(HeroBuff::Defense { bonus: 30.0 }, Duration::from_secs(10));
        hero.grant_buff(HeroBuff::Defense { bonus: 20.0 }, Duration::from_secs(4));
        assert_eq!(hero.stats.physical_defense, baseline + 50.0);

        let mut events = Vec::new();
        hero.advance(Duration::from_secs(5), &mut events);
        assert_eq!(hero.stats.physical_defense, baseline + 30.0);
        hero.advance(Duration::from_secs(5), &mut events);
        assert_eq!(hero.stats.physical_defense, baseline);
    }

    #[test]
    fn shock_aura_pulses_each_interval_while_active() {
        let mut hero = HeroState::recruit(HeroId::new(3), template());
        hero.deploy(Position::new(1.0, 2.0));
        hero.grant_buff(
            HeroBuff::ShockAura {
                interval: Duration::from_secs(1),
                radius: 4.0,
                damage: 15.0,
            },
            Duration::from_secs(8),
        );
        let mut events = Vec::new();
        for _ in 0..12 {
            hero.advance(Duration::from_millis(500), &mut events);
        }
        let pulses = events
            .iter()
            .filter(|event| matches!(event, Event::ShockPulse { .. }))
            .count();
        assert_eq!(pulses, 6);
    }

    #[test]
    fn death_clears_buffs_and_records_tick() {
        let mut hero = HeroState::recruit(HeroId::new(1), template());
        hero.deploy(Position::ORIGIN);
        hero.grant_buff(HeroBuff::AttackSpeed { bonus: 0.5 }, Duration::from_secs(5));
        let hit = hero.take_damage(1_000.0, 42);
        assert!(hit.killed);
        assert_eq!(hero.snapshot().fallen_at_tick, Some(42));
        assert_eq!(hero.stats.attack_speed, template().base_stats().attack_speed);
        assert!(hero.revive(1.0));
        assert_eq!(hero.snapshot().fallen_at_tick, None);
    }
}
