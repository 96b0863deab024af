//! World state and core simulation types
//!
//! One `World` is one run: exclusively owned and mutated by the tick loop,
//! exposed read-only to the renderer between ticks via [`Snapshot`], and
//! discarded at game over. Audio and haptics collaborators drain the
//! [`GameEvent`] queue after each tick; the engine never blocks on them.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::progression::GameModifiers;
use crate::sim::physics::random_range;
use crate::sim::spawn;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (hull depleted, or time-attack clock expired)
    GameOver,
    /// Campaign complete
    Victory,
}

/// Rule set for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Procedural waves forever
    #[default]
    Endless,
    /// The 20-level scripted campaign
    Campaign,
    /// Countdown clock; kills buy time
    TimeAttack,
    /// No hull damage from contact
    Zen,
}

/// The player's cell
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub thrusting: bool,
    /// Tick of the most recent shot; `None` until the first one
    pub last_shot: Option<u64>,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: SHIP_RADIUS,
            rotation: -FRAC_PI_2,
            thrusting: false,
            last_shot: None,
        }
    }
}

/// The four ordinary pathogen species
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Virus,
    Bacteria,
    Parasite,
    Fungus,
}

impl Species {
    pub fn name(self) -> &'static str {
        match self {
            Species::Virus => "virus",
            Species::Bacteria => "bacteria",
            Species::Parasite => "parasite",
            Species::Fungus => "fungus",
        }
    }
}

/// Rarity modifier layered on ordinary pathogens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Tough and slow (bacteria)
    Armored,
    /// Fast and fragile (virus)
    Swift,
    /// Aggressive tracker (parasite)
    Stalker,
}

/// Mega Virus phase cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MegaVirusPhase {
    /// Capsid up: all damage blocked
    Shielded,
    /// Capsid down: takes damage normally
    Vulnerable,
}

/// Boss identity, for events and spawn scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossKind {
    MegaVirus,
    BacterialColony,
    ParasiticWorm,
    FungalBloom,
}

/// Per-boss behavioral state; the machines themselves live in `sim::boss`
#[derive(Debug, Clone)]
pub enum BossState {
    MegaVirus {
        phase: MegaVirusPhase,
        phase_timer: u32,
    },
    BacterialColony {
        /// Trailing positions behind the core; scattered as independent
        /// bacteria on death
        segments: Vec<Vec2>,
    },
    ParasiticWorm {
        /// Follow chain behind the head
        segments: Vec<Vec2>,
    },
    FungalBloom {
        spore_timer: u32,
    },
}

impl BossState {
    pub fn kind(&self) -> BossKind {
        match self {
            BossState::MegaVirus { .. } => BossKind::MegaVirus,
            BossState::BacterialColony { .. } => BossKind::BacterialColony,
            BossState::ParasiticWorm { .. } => BossKind::ParasiticWorm,
            BossState::FungalBloom { .. } => BossKind::FungalBloom,
        }
    }
}

/// What kind of pathogen an entity is. One variant per concrete kind so that
/// illegal combinations (a prion with worm segments, a generic pathogen with
/// a biofilm shield) are unrepresentable.
#[derive(Debug, Clone)]
pub enum PathogenKind {
    Common {
        species: Species,
        variant: Option<Variant>,
    },
    /// Tiny swarm enemy; opacity flickers per tick
    Prion { opacity: f32 },
    /// Anchored; grows toward a radius cap and periodically buds a copy
    Cancer {
        growth_rate: f32,
        spawn_timer: u32,
    },
    /// Depletable shield layer absorbs damage before the core
    Biofilm {
        shield: f32,
        max_shield: f32,
    },
    Boss(BossState),
}

/// An adversary entity
#[derive(Debug, Clone)]
pub struct Pathogen {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub kind: PathogenKind,
    pub health: f32,
    pub max_health: f32,
    /// Score value on death
    pub points: u64,
    /// Silhouette vertex count
    pub sides: u32,
    /// Per-vertex radius jitter, fixed at spawn
    pub noise: Vec<f32>,
}

impl Pathogen {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, PathogenKind::Boss(_))
    }

    pub fn boss_kind(&self) -> Option<BossKind> {
        match &self.kind {
            PathogenKind::Boss(state) => Some(state.kind()),
            _ => None,
        }
    }

    /// Ordinary pathogens split into two children on death; swarm, anchored,
    /// shielded, and boss kinds do not.
    pub fn splits_on_death(&self) -> bool {
        matches!(self.kind, PathogenKind::Common { .. })
    }

    /// Kill-stat key for this pathogen
    pub fn species_name(&self) -> &'static str {
        match &self.kind {
            PathogenKind::Common { species, .. } => species.name(),
            PathogenKind::Prion { .. } => "prion",
            PathogenKind::Cancer { .. } => "cancer",
            PathogenKind::Biofilm { .. } => "biofilm",
            PathogenKind::Boss(state) => match state.kind() {
                BossKind::MegaVirus => "virus",
                BossKind::BacterialColony => "bacteria",
                BossKind::ParasiticWorm => "parasite",
                BossKind::FungalBloom => "fungus",
            },
        }
    }

    /// Render opacity; only prions flicker
    pub fn opacity(&self) -> f32 {
        match &self.kind {
            PathogenKind::Prion { opacity } => *opacity,
            _ => 1.0,
        }
    }

    /// Explosion/trim color for this pathogen
    pub fn color(&self) -> &'static str {
        match &self.kind {
            PathogenKind::Common { species, .. } => match species {
                Species::Virus => "#f59e0b",
                Species::Bacteria => "#ef4444",
                Species::Parasite => "#a855f7",
                Species::Fungus => "#10b981",
            },
            PathogenKind::Prion { .. } => "#94a3b8",
            PathogenKind::Cancer { .. } => "#f472b6",
            PathogenKind::Biofilm { .. } => "#22d3ee",
            PathogenKind::Boss(state) => match state.kind() {
                BossKind::MegaVirus => "#f59e0b",
                BossKind::BacterialColony => "#ef4444",
                BossKind::ParasiticWorm => "#a855f7",
                BossKind::FungalBloom => "#10b981",
            },
        }
    }
}

/// Player projectile
#[derive(Debug, Clone)]
pub struct Antibody {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub life: u32,
}

/// Cosmetic explosion/thrust debris
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: u32,
    pub color: &'static str,
    pub opacity: f32,
}

/// Collectible drop types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    DamageBoost,
    Bomb,
}

/// A collectible drop
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    pub life: u32,
}

/// Score popups and pickup callouts
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub text: String,
    pub color: &'static str,
    pub life: u32,
    pub size: f32,
}

/// Per-run countdown counters for timed buffs
#[derive(Debug, Clone, Default)]
pub struct ActivePowerUps {
    pub rapid_fire: u32,
    pub shield: u32,
    pub damage_boost: u32,
}

/// In-run statistics, fed to the progression store at run end
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub kills: u64,
    pub kills_by_type: HashMap<&'static str, u64>,
    pub time_played_ticks: u64,
}

impl RunStats {
    pub fn record_kill(&mut self, species: &'static str) {
        self.kills += 1;
        *self.kills_by_type.entry(species).or_insert(0) += 1;
    }
}

/// Discrete notifications for the audio/haptics collaborators. Drained once
/// per tick by the host; unconsumed events are simply dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Fire,
    /// Radius of the destroyed entity, for pitch scaling
    Explosion { size: f32 },
    PowerUpCollected,
    Damage,
    ShieldBounce,
    LevelClear,
    Bomb,
    GameOver,
    BossSpawn(BossKind),
    BossDefeat(BossKind),
    /// Edge-triggered: emitted on the transition, not every tick
    ThrustStart,
    ThrustStop,
}

/// Run setup
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub mode: GameMode,
    pub seed: u64,
    /// Gameplay modifiers derived from the persisted profile
    pub mods: GameModifiers,
}

/// Read-only view of the world for the renderer, produced once per tick
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub ship: &'a Ship,
    pub pathogens: &'a [Pathogen],
    pub antibodies: &'a [Antibody],
    pub particles: &'a [Particle],
    pub power_ups: &'a [PowerUp],
    pub floating_texts: &'a [FloatingText],
    pub active_power_ups: &'a ActivePowerUps,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub score: u64,
    pub level: u32,
    pub health: f32,
    pub max_health: f32,
    pub shake: f32,
    pub shake_angle: f32,
    pub flash: f32,
    /// Ticks remaining; `None` outside time attack
    pub time_left: Option<u32>,
}

/// Complete per-run simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub mode: GameMode,
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub health: f32,
    pub shake: f32,
    pub shake_angle: f32,
    pub flash: f32,
    pub ship: Ship,
    pub pathogens: Vec<Pathogen>,
    pub antibodies: Vec<Antibody>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub floating_texts: Vec<FloatingText>,
    pub active_power_ups: ActivePowerUps,
    pub mods: GameModifiers,
    pub stats: RunStats,
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    pub seed: u64,
    pub ticks: u64,
    /// Time-attack clock, in ticks
    pub time_left: u32,
    pub regen_timer: u32,
    next_id: u32,
}

impl World {
    /// Create a run and spawn its first wave
    pub fn new(config: WorldConfig) -> Self {
        let center = Vec2::new(config.width / 2.0, config.height / 2.0);
        let health = config.mods.max_health;
        let mut world = Self {
            width: config.width,
            height: config.height,
            mode: config.mode,
            phase: GamePhase::Playing,
            level: 1,
            score: 0,
            health,
            shake: 0.0,
            shake_angle: 0.0,
            flash: 0.0,
            ship: Ship::new(center),
            pathogens: Vec::new(),
            antibodies: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            floating_texts: Vec::new(),
            active_power_ups: ActivePowerUps::default(),
            mods: config.mods,
            stats: RunStats::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            seed: config.seed,
            ticks: 0,
            time_left: TIME_ATTACK_INITIAL_SECONDS * FPS,
            regen_timer: 0,
            next_id: 1,
        };
        spawn::populate_level(&mut world);
        world
    }

    /// Allocate a monotonic entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Immutable view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            ship: &self.ship,
            pathogens: &self.pathogens,
            antibodies: &self.antibodies,
            particles: &self.particles,
            power_ups: &self.power_ups,
            floating_texts: &self.floating_texts,
            active_power_ups: &self.active_power_ups,
            phase: self.phase,
            mode: self.mode,
            score: self.score,
            level: self.level,
            health: self.health,
            max_health: self.mods.max_health,
            shake: self.shake,
            shake_angle: self.shake_angle,
            flash: self.flash,
            time_left: (self.mode == GameMode::TimeAttack).then_some(self.time_left),
        }
    }

    /// Hand this tick's events to the audio/haptics collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Burst of debris particles at a position. The particle population is
    /// hard-capped; the oldest are dropped first.
    pub fn create_explosion(&mut self, pos: Vec2, color: &'static str, count: u32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let id = self.next_entity_id();
            let vel = Vec2::new(
                random_range(&mut self.rng, -3.0, 3.0),
                random_range(&mut self.rng, -3.0, 3.0),
            );
            let radius = random_range(&mut self.rng, 1.0, 4.0);
            let life = random_range(&mut self.rng, 20.0, 40.0) as u32;
            self.particles.push(Particle {
                id,
                pos,
                vel,
                radius,
                life,
                color,
                opacity: 1.0,
            });
        }
    }

    /// Score popup / pickup callout drifting upward
    pub fn spawn_floating_text(
        &mut self,
        pos: Vec2,
        text: impl Into<String>,
        color: &'static str,
        size: f32,
    ) {
        let id = self.next_entity_id();
        let vx = random_range(&mut self.rng, -0.5, 0.5);
        self.floating_texts.push(FloatingText {
            id,
            pos,
            vel: Vec2::new(vx, -1.0),
            text: text.into(),
            color,
            life: 60,
            size,
        });
    }
}
