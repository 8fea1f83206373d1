use std::time::Duration;

use ember_keepers_core::{
    AgentRef, Element, Event, GoldRange, HeroId, MonsterId, MonsterRank, MonsterSnapshot,
    MonsterTemplate, Position, Resistances, StatusEffect, StatusKind, TemplateId,
};

use crate::{
    abilities::{self, AbilityEffect, SpecialAbility},
    status::StatusBook,
    vitals::Vitals,
};

/// Ability request tagged with the monster that produced it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TriggeredEffect {
    pub(crate) monster: MonsterId,
    pub(crate) origin: Position,
    pub(crate) effect: AbilityEffect,
}

#[derive(Debug)]
pub(crate) struct MonsterState {
    pub(crate) id: MonsterId,
    pub(crate) template: TemplateId,
    pub(crate) rank: MonsterRank,
    level: u32,
    affinity: Element,
    pub(crate) vitals: Vitals,
    attack: f32,
    attack_interval: Duration,
    attack_cooldown: Duration,
    move_speed: f32,
    pub(crate) resistances: Resistances,
    pub(crate) position: Position,
    pub(crate) gold_drop: GoldRange,
    pub(crate) statuses: StatusBook,
    ability: Option<Box<dyn SpecialAbility>>,
}

impl MonsterState {
    pub(crate) fn spawn(
        id: MonsterId,
        template: &MonsterTemplate,
        level: u32,
        position: Position,
    ) -> Self {
        let level = level.max(1);
        let stats = template.stats_at(level);
        Self {
            id,
            template: template.id.clone(),
            rank: template.rank,
            level,
            affinity: template.affinity,
            vitals: Vitals::full(stats.max_health),
            attack: stats.attack,
            attack_interval: template.attack_interval,
            attack_cooldown: Duration::ZERO,
            move_speed: stats.move_speed,
            resistances: template.resistances,
            position,
            gold_drop: template.gold_drop,
            statuses: StatusBook::default(),
            ability: template.ability.map(abilities::attach),
        }
    }

    pub(crate) fn attack_ready(&self) -> bool {
        self.attack_cooldown.is_zero()
    }

    pub(crate) fn start_attack_cooldown(&mut self) {
        self.attack_cooldown = self.attack_interval;
    }

    fn effective_attack(&self) -> f32 {
        match self.statuses.get(StatusKind::Empowered) {
            Some(StatusEffect::Empowered { bonus }) => self.attack * (1.0 + bonus),
            _ => self.attack,
        }
    }

    fn effective_move_speed(&self) -> f32 {
        match self.statuses.get(StatusKind::Slow) {
            Some(StatusEffect::Slow { fraction }) => {
                self.move_speed * (1.0 - fraction.clamp(0.0, 1.0))
            }
            _ => self.move_speed,
        }
    }

    fn taunted_by(&self) -> Option<HeroId> {
        match self.statuses.get(StatusKind::Taunt) {
            Some(StatusEffect::Taunt { hero }) => Some(hero),
            _ => None,
        }
    }

    /// Counts down timers and runs the attached behaviour.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        out_events: &mut Vec<Event>,
        triggered: &mut Vec<TriggeredEffect>,
    ) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(dt);

        let mut expired = Vec::new();
        self.statuses.advance(dt, &mut expired);
        for kind in expired {
            out_events.push(Event::StatusExpired {
                target: AgentRef::Monster(self.id),
                kind,
            });
        }

        let health_fraction = self.vitals.fraction();
        if let Some(ability) = self.ability.as_mut() {
            let mut effects = Vec::new();
            ability.on_tick(dt, health_fraction, &mut effects);
            self.tag(effects, triggered);
        }
    }

    pub(crate) fn landed_strike(&mut self, triggered: &mut Vec<TriggeredEffect>) {
        if let Some(ability) = self.ability.as_mut() {
            let mut effects = Vec::new();
            ability.on_strike(&mut effects);
            self.tag(effects, triggered);
        }
    }

    pub(crate) fn died(&mut self, triggered: &mut Vec<TriggeredEffect>) {
        if let Some(ability) = self.ability.as_mut() {
            let mut effects = Vec::new();
            ability.on_death(&mut effects);
            self.tag(effects, triggered);
        }
    }

    fn tag(&self, effects: Vec<AbilityEffect>, triggered: &mut Vec<TriggeredEffect>) {
        triggered.extend(effects.into_iter().map(|effect| TriggeredEffect {
            monster: self.id,
            origin: self.position,
            effect,
        }));
    }

    pub(crate) fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            id: self.id,
            template: self.template.clone(),
            rank: self.rank,
            level: self.level,
            position: self.position,
            health: self.vitals.health(),
            max_health: self.vitals.max_health(),
            affinity: self.affinity,
            resistances: self.resistances,
            attack_damage: self.effective_attack(),
            attack_ready: self.attack_ready(),
            move_speed: self.effective_move_speed(),
            taunted_by: self.taunted_by(),
            statuses: self.statuses.kinds(),
        }
    }
}
