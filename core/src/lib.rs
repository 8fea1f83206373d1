#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ember Keepers combat engine.
//!
//! This crate defines the message surface that connects the session façade,
//! the authoritative world, and the pure combat systems. Systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

mod collaborators;
mod manifest;
mod snapshots;
mod templates;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub use collaborators::{BaseTarget, CurrencyLedger, PhaseSink, TemplateError, TemplateSource};
pub use manifest::{SpawnGroup, WaveManifest, WaveMode};
pub use snapshots::{HeroSnapshot, HeroView, MonsterSnapshot, MonsterView};
pub use templates::{
    Attributes, Equipment, EquipmentSlotKind, GoldRange, HeroClass, HeroStats, HeroTemplate,
    MonsterStats, MonsterTemplate, Rarity, StatModifiers, EQUIPMENT_SLOTS,
};

/// Number of hand-authored waves that precede endless mode.
pub const MAIN_WAVE_COUNT: u32 = 20;

/// Number of manifests in the endless rotation.
pub const ENDLESS_LOOP_LENGTH: u32 = 10;

/// High level state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No game is running.
    MainMenu,
    /// Between waves; heroes may be deployed and equipped while combat is paused.
    Strategy,
    /// A wave is being fought.
    Combat,
    /// The base fell and the session must be restarted.
    GameOver,
}

/// Elemental affinity carried by attacks and agents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// Physical, non-elemental damage.
    #[default]
    None,
    /// Fire damage.
    Fire,
    /// Ice damage.
    Ice,
    /// Thunder damage.
    Thunder,
    /// Earth damage.
    Earth,
}

impl Element {
    /// The four elemental affinities in rotation order.
    pub const ELEMENTAL: [Element; 4] = [
        Element::Fire,
        Element::Ice,
        Element::Thunder,
        Element::Earth,
    ];

    /// Reports whether the element is anything other than physical.
    #[must_use]
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Element::None)
    }
}

/// Fractional damage reduction per element; negative values amplify damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    /// Reduction applied to fire damage.
    pub fire: f32,
    /// Reduction applied to ice damage.
    pub ice: f32,
    /// Reduction applied to thunder damage.
    pub thunder: f32,
    /// Reduction applied to earth damage.
    pub earth: f32,
    /// Reduction applied to physical damage.
    pub physical: f32,
}

impl Resistances {
    /// Resistance profile that reduces nothing.
    pub const NONE: Self = Self {
        fire: 0.0,
        ice: 0.0,
        thunder: 0.0,
        earth: 0.0,
        physical: 0.0,
    };

    /// Profile resisting only physical damage.
    #[must_use]
    pub const fn physical(value: f32) -> Self {
        Self {
            physical: value,
            ..Self::NONE
        }
    }

    /// Profile applying the same reduction to all four elements.
    #[must_use]
    pub const fn elemental(value: f32) -> Self {
        Self {
            fire: value,
            ice: value,
            thunder: value,
            earth: value,
            physical: 0.0,
        }
    }

    /// Returns a copy with the resistance for `element` replaced.
    #[must_use]
    pub const fn with(self, element: Element, value: f32) -> Self {
        match element {
            Element::None => Self {
                physical: value,
                ..self
            },
            Element::Fire => Self { fire: value, ..self },
            Element::Ice => Self { ice: value, ..self },
            Element::Thunder => Self {
                thunder: value,
                ..self
            },
            Element::Earth => Self {
                earth: value,
                ..self
            },
        }
    }

    /// Resistance used when receiving damage of the provided element.
    #[must_use]
    pub fn against(&self, element: Element) -> f32 {
        match element {
            Element::None => self.physical,
            Element::Fire => self.fire,
            Element::Ice => self.ice,
            Element::Thunder => self.thunder,
            Element::Earth => self.earth,
        }
    }

    /// Overwrites the resistance for the provided element.
    pub fn set(&mut self, element: Element, value: f32) {
        let slot = match element {
            Element::None => &mut self.physical,
            Element::Fire => &mut self.fire,
            Element::Ice => &mut self.ice,
            Element::Thunder => &mut self.thunder,
            Element::Earth => &mut self.earth,
        };
        *slot = value;
    }
}

/// Point on the battlefield ground plane measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    z: f32,
}

impl Position {
    /// Battlefield origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new position from its planar coordinates.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Depth coordinate.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Returns the position translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Squared Euclidean distance, cheaper for comparisons.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Moves up to `max_step` units toward `target` without overshooting it.
    #[must_use]
    pub fn step_toward(self, target: Self, max_step: f32) -> Self {
        let distance = self.distance(target);
        if distance <= max_step || distance <= f32::EPSILON {
            return target;
        }
        let fraction = max_step.max(0.0) / distance;
        Self::new(
            self.x + (target.x - self.x) * fraction,
            self.z + (target.z - self.z) * fraction,
        )
    }

    /// Arithmetic mean of the provided positions, `None` when empty.
    #[must_use]
    pub fn centroid<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut count = 0_u32;
        let (mut x, mut z) = (0.0_f32, 0.0_f32);
        for position in positions {
            x += position.x;
            z += position.z;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let count = count as f32;
        Some(Self::new(x / count, z / count))
    }
}

/// Unique identifier assigned to a recruited hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(u32);

impl HeroId {
    /// Creates a new hero identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a spawned monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based wave counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a wave number from its one-based value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the one-based value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WaveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a monster, hero or equipment template, e.g. `"whisper"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Creates a template identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to either kind of combat agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRef {
    /// A hero agent.
    Hero(HeroId),
    /// A monster agent.
    Monster(MonsterId),
}

/// Receiver of a monster's melee strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeTarget {
    /// A hero standing in melee range.
    Hero(HeroId),
    /// The defended base.
    Base,
}

/// Rank of a monster which controls loot and staging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterRank {
    /// Regular wave filler.
    Normal,
    /// Stronger monster with an attached ability.
    Elite,
    /// Wave boss spawned at the staging position.
    Boss,
}

/// Periodic or reactive behaviour attached to elite and boss monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Opens rifts that request waves of summoned minions.
    DesolateSummons,
    /// Rotates the elemental weakness of the bearer.
    EternalFrostCycle,
    /// Periodically doubles hero skill cooldowns for a while.
    RiftSuppression,
    /// Empowers nearby monsters on a fixed cadence.
    FlameRally,
    /// Slows heroes around the bearer whenever it lands a hit.
    FrostChill,
    /// Bursts into thunder damage on death.
    FissionBurst,
}

/// Active skill carried by a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    /// Fire attack-speed frenzy.
    BurningSoulBarrage,
    /// Fire nova with a self shield.
    MoltenArmor,
    /// Fire blast that strips monster empowerment.
    PurifyingFlame,
    /// Piercing ice line.
    FrostPierce,
    /// Freezing ice nova.
    AbsoluteZero,
    /// Slowing barrier in front of the base.
    IceBarrier,
    /// Bouncing thunder strike.
    ChainLightning,
    /// Defensive thunder aura.
    ChargeOverload,
    /// Heal and energy burst for nearby allies.
    EnergySurge,
    /// Earth blast with knockback near the base.
    SeismicShot,
    /// Defensive earth taunt.
    PetrifiedSkin,
    /// Slowing earth trap on distant packs.
    MireTrap,
}

impl SkillKind {
    /// Stable identifier used in logs and persisted records.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            SkillKind::BurningSoulBarrage => "burning_soul_barrage",
            SkillKind::MoltenArmor => "molten_armor",
            SkillKind::PurifyingFlame => "purifying_flame",
            SkillKind::FrostPierce => "frost_pierce",
            SkillKind::AbsoluteZero => "absolute_zero",
            SkillKind::IceBarrier => "ice_barrier",
            SkillKind::ChainLightning => "chain_lightning",
            SkillKind::ChargeOverload => "charge_overload",
            SkillKind::EnergySurge => "energy_surge",
            SkillKind::SeismicShot => "seismic_shot",
            SkillKind::PetrifiedSkin => "petrified_skin",
            SkillKind::MireTrap => "mire_trap",
        }
    }

    /// Element of the damage dealt by the skill.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            SkillKind::BurningSoulBarrage | SkillKind::MoltenArmor | SkillKind::PurifyingFlame => {
                Element::Fire
            }
            SkillKind::FrostPierce | SkillKind::AbsoluteZero | SkillKind::IceBarrier => {
                Element::Ice
            }
            SkillKind::ChainLightning | SkillKind::ChargeOverload | SkillKind::EnergySurge => {
                Element::Thunder
            }
            SkillKind::SeismicShot | SkillKind::PetrifiedSkin | SkillKind::MireTrap => {
                Element::Earth
            }
        }
    }
}

/// Status effect applied to an agent for a limited duration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Reduces movement by the provided fraction.
    Slow {
        /// Fraction of movement speed removed.
        fraction: f32,
    },
    /// Prevents all action.
    Freeze,
    /// Pushed away from the source.
    Knockback,
    /// Absorbs incoming damage.
    Shield {
        /// Amount of damage the shield represents.
        amount: f32,
    },
    /// Forces a monster to pursue the provided hero.
    Taunt {
        /// Hero the monster must pursue.
        hero: HeroId,
    },
    /// Raises a monster's attack by the provided fraction.
    Empowered {
        /// Additive attack multiplier bonus.
        bonus: f32,
    },
}

impl StatusEffect {
    /// Discriminant used to refresh and clear statuses.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            StatusEffect::Slow { .. } => StatusKind::Slow,
            StatusEffect::Freeze => StatusKind::Freeze,
            StatusEffect::Knockback => StatusKind::Knockback,
            StatusEffect::Shield { .. } => StatusKind::Shield,
            StatusEffect::Taunt { .. } => StatusKind::Taunt,
            StatusEffect::Empowered { .. } => StatusKind::Empowered,
        }
    }
}

/// Discriminant of a [`StatusEffect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// See [`StatusEffect::Slow`].
    Slow,
    /// See [`StatusEffect::Freeze`].
    Freeze,
    /// See [`StatusEffect::Knockback`].
    Knockback,
    /// See [`StatusEffect::Shield`].
    Shield,
    /// See [`StatusEffect::Taunt`].
    Taunt,
    /// See [`StatusEffect::Empowered`].
    Empowered,
}

/// Timed self-buff granted to a hero by a skill.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HeroBuff {
    /// Adds attacks per second.
    AttackSpeed {
        /// Attacks per second added while active.
        bonus: f32,
    },
    /// Adds physical defence.
    Defense {
        /// Defence added while active.
        bonus: f32,
    },
    /// Periodically pulses thunder damage around the hero.
    ShockAura {
        /// Time between pulses.
        interval: Duration,
        /// Radius of each pulse.
        radius: f32,
        /// Base damage of each pulse.
        damage: f32,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Removes every agent and restarts identifier allocation.
    ResetWorld,
    /// Creates a benched hero from the provided template.
    RecruitHero {
        /// Template describing the hero.
        template: HeroTemplate,
    },
    /// Places a living hero on the battlefield.
    DeployHero {
        /// Hero being deployed.
        hero: HeroId,
        /// Location the hero occupies.
        position: Position,
    },
    /// Withdraws a hero from the battlefield.
    BenchHero {
        /// Hero being benched.
        hero: HeroId,
    },
    /// Places an item into one of the hero's equipment slots.
    EquipItem {
        /// Hero receiving the item.
        hero: HeroId,
        /// Zero-based slot index.
        slot: usize,
        /// Item to equip.
        item: Equipment,
    },
    /// Empties one of the hero's equipment slots.
    UnequipItem {
        /// Hero losing the item.
        hero: HeroId,
        /// Zero-based slot index.
        slot: usize,
    },
    /// Creates a monster from a template at the requested level.
    SpawnMonster {
        /// Template describing the monster.
        template: MonsterTemplate,
        /// Level used to scale the template stats.
        level: u32,
        /// Location the monster appears at.
        position: Position,
    },
    /// Relocates a living monster.
    MoveMonster {
        /// Monster being moved.
        monster: MonsterId,
        /// Destination of the move.
        to: Position,
    },
    /// Relocates a living, deployed hero.
    MoveHero {
        /// Hero being moved.
        hero: HeroId,
        /// Destination of the move.
        to: Position,
    },
    /// Resolves a hero auto-attack; rejected unless the hero's attack is ready.
    HeroStrike {
        /// Attacking hero.
        hero: HeroId,
        /// Monster receiving the hit.
        monster: MonsterId,
        /// Resolved damage.
        amount: f32,
        /// Element of the attack.
        element: Element,
    },
    /// Resolves a monster melee attack; rejected unless the monster's attack is ready.
    MonsterStrike {
        /// Attacking monster.
        monster: MonsterId,
        /// Receiver of the hit.
        target: StrikeTarget,
        /// Resolved damage.
        amount: f32,
    },
    /// Applies resolved damage to any agent outside the auto-attack cadence.
    DealDamage {
        /// Agent receiving the damage.
        target: AgentRef,
        /// Resolved damage.
        amount: f32,
        /// Element of the damage.
        element: Element,
    },
    /// Requests activation of the hero's skill.
    UseSkill {
        /// Hero attempting to use its skill.
        hero: HeroId,
    },
    /// Grants a timed buff to a hero.
    GrantBuff {
        /// Hero receiving the buff.
        hero: HeroId,
        /// Buff to grant.
        buff: HeroBuff,
        /// Time until the buff expires.
        duration: Duration,
    },
    /// Applies or refreshes a status effect.
    ApplyStatus {
        /// Agent receiving the status.
        target: AgentRef,
        /// Status to apply.
        effect: StatusEffect,
        /// Time until the status expires.
        duration: Duration,
    },
    /// Removes a status effect before it expires.
    ClearStatus {
        /// Agent losing the status.
        target: AgentRef,
        /// Kind of status to remove.
        kind: StatusKind,
    },
    /// Restores hero health.
    HealHero {
        /// Hero being healed.
        hero: HeroId,
        /// Health restored.
        amount: f32,
    },
    /// Restores hero energy.
    RestoreEnergy {
        /// Hero receiving energy.
        hero: HeroId,
        /// Energy restored.
        amount: f32,
    },
    /// Brings a dead hero back to life.
    ReviveHero {
        /// Hero being revived.
        hero: HeroId,
        /// Fraction of maximum health restored.
        health_fraction: f32,
        /// Whether the revive was bought with currency.
        paid: bool,
    },
}

/// Events broadcast by the world and the session after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that every agent was removed.
    WorldReset,
    /// Confirms that a hero joined the roster.
    HeroRecruited {
        /// Identifier assigned to the hero.
        hero: HeroId,
        /// Template the hero was built from.
        template: TemplateId,
    },
    /// Confirms that a hero was placed on the battlefield.
    HeroDeployed {
        /// Deployed hero.
        hero: HeroId,
        /// Location the hero occupies.
        position: Position,
    },
    /// Confirms that a hero left the battlefield.
    HeroBenched {
        /// Benched hero.
        hero: HeroId,
    },
    /// Reports that an equipment slot changed contents.
    EquipmentChanged {
        /// Hero whose equipment changed.
        hero: HeroId,
        /// Slot that changed.
        slot: usize,
        /// Item now occupying the slot, if any.
        item: Option<TemplateId>,
    },
    /// Reports that an equipment command targeted an invalid hero or slot.
    EquipmentRejected {
        /// Hero named in the command.
        hero: HeroId,
        /// Slot named in the command.
        slot: usize,
    },
    /// Confirms that a monster entered the battlefield.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Template the monster was built from.
        template: TemplateId,
        /// Rank of the monster.
        rank: MonsterRank,
        /// Level of the monster.
        level: u32,
        /// Location the monster appeared at.
        position: Position,
    },
    /// Reports damage applied to a monster.
    MonsterDamaged {
        /// Monster that was hit.
        monster: MonsterId,
        /// Health removed.
        amount: f32,
        /// Element of the damage.
        element: Element,
    },
    /// Reports that a monster died and was removed.
    MonsterDied {
        /// Monster that died.
        monster: MonsterId,
        /// Template the monster was built from.
        template: TemplateId,
        /// Rank of the monster.
        rank: MonsterRank,
        /// Location of death.
        position: Position,
        /// Gold range rolled for loot.
        gold_drop: GoldRange,
    },
    /// Reports damage applied to a hero.
    HeroDamaged {
        /// Hero that was hit.
        hero: HeroId,
        /// Health removed.
        amount: f32,
    },
    /// Reports that a hero fell.
    HeroDied {
        /// Hero that fell.
        hero: HeroId,
    },
    /// Reports health restored to a hero.
    HeroHealed {
        /// Hero that was healed.
        hero: HeroId,
        /// Health restored.
        amount: f32,
    },
    /// Reports that a dead hero came back.
    HeroRevived {
        /// Revived hero.
        hero: HeroId,
        /// Whether the revive was bought with currency.
        paid: bool,
    },
    /// Reports a monster hit on the base; the session forwards it to the base owner.
    BaseStruck {
        /// Attacking monster.
        monster: MonsterId,
        /// Damage dealt.
        amount: f32,
    },
    /// Confirms that a hero activated its skill.
    SkillUsed {
        /// Hero that used the skill.
        hero: HeroId,
        /// Skill that was used.
        skill: SkillKind,
        /// Location of the hero at activation.
        position: Position,
    },
    /// Reports a skill activation refused because the skill was not ready.
    SkillRejected {
        /// Hero that attempted the skill.
        hero: HeroId,
        /// Skill that was attempted.
        skill: SkillKind,
    },
    /// Reports that a hero received a buff.
    BuffGranted {
        /// Buffed hero.
        hero: HeroId,
        /// Buff granted.
        buff: HeroBuff,
    },
    /// Reports that a status effect was applied or refreshed.
    StatusApplied {
        /// Affected agent.
        target: AgentRef,
        /// Status applied.
        effect: StatusEffect,
        /// Time until expiry.
        duration: Duration,
    },
    /// Reports that a status effect expired or was cleared.
    StatusExpired {
        /// Affected agent.
        target: AgentRef,
        /// Kind of status removed.
        kind: StatusKind,
    },
    /// A hero's shock aura pulsed.
    ShockPulse {
        /// Hero carrying the aura.
        hero: HeroId,
        /// Centre of the pulse.
        origin: Position,
        /// Radius of the pulse.
        radius: f32,
        /// Base damage of the pulse.
        damage: f32,
    },
    /// A dying monster burst.
    DeathBurst {
        /// Monster that burst.
        monster: MonsterId,
        /// Centre of the burst.
        origin: Position,
        /// Radius of the burst.
        radius: f32,
        /// Base damage of the burst.
        damage: f32,
        /// Element of the burst.
        element: Element,
    },
    /// A monster rallied its neighbours.
    RallyPulse {
        /// Rallying monster.
        monster: MonsterId,
        /// Centre of the rally.
        origin: Position,
        /// Radius of the rally.
        radius: f32,
        /// Attack bonus granted.
        bonus: f32,
        /// Duration of the bonus.
        duration: Duration,
    },
    /// A monster hit chilled the heroes around it.
    ChillPulse {
        /// Chilling monster.
        monster: MonsterId,
        /// Centre of the chill.
        origin: Position,
        /// Radius of the chill.
        radius: f32,
        /// Movement fraction removed.
        fraction: f32,
        /// Duration of the slow.
        duration: Duration,
    },
    /// A monster asked for reinforcements to be spawned around it.
    SummonRequested {
        /// Summoning monster.
        summoner: MonsterId,
        /// Template of the summoned monsters.
        template: TemplateId,
        /// Number of monsters requested.
        count: u32,
        /// Level of the summoned monsters.
        level: u32,
        /// Centre of the summon.
        origin: Position,
    },
    /// A monster rotated its elemental weakness.
    WeaknessShifted {
        /// Monster whose weakness changed.
        monster: MonsterId,
        /// Element the monster is now weak to.
        weakness: Element,
    },
    /// Skill cooldowns are doubled until the suppression ends.
    SuppressionStarted {
        /// Monster that started the suppression.
        monster: MonsterId,
        /// Length of the suppression.
        duration: Duration,
    },
    /// Skill cooldowns returned to normal.
    SuppressionEnded,
    /// A wave began.
    WaveStarted {
        /// Number of the wave.
        wave: WaveNumber,
        /// Whether the wave belongs to the main sequence or the endless loop.
        mode: WaveMode,
    },
    /// Every monster of a wave was defeated.
    WaveCleared {
        /// Number of the wave.
        wave: WaveNumber,
    },
    /// The session moved to another phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
}
