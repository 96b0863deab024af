//! Cytoscape - an immune-defense arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, world state, per-tick combat, bosses)
//! - `progression`: Persisted player profile, XP economy, upgrades, cytokines
//! - `campaign`: Scripted 20-level campaign
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: Injected key-value storage with decode-with-defaults

pub mod campaign;
pub mod highscores;
pub mod persistence;
pub mod progression;
pub mod sim;

pub use highscores::{ScoreEntry, load_top_scores, save_top_score};
pub use persistence::{KeyValueStore, MemoryStore};
pub use progression::{GameModifiers, PlayerProfile, compute_modifiers};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second). The sim is tick-based,
    /// deliberately not time-delta scaled.
    pub const FPS: u32 = 60;

    /// Velocity retained per tick
    pub const FRICTION: f32 = 0.98;
    /// Ship acceleration along heading per tick (base, before upgrades)
    pub const SHIP_THRUST: f32 = 0.15;
    /// Ship rotation per tick while a turn key is held (radians)
    pub const SHIP_TURN_SPEED: f32 = 0.08;
    /// Ship collision radius
    pub const SHIP_RADIUS: f32 = 18.0;
    /// Starting hull (base, before upgrades)
    pub const BASE_MAX_HEALTH: f32 = 100.0;
    /// Hull damage per unshielded pathogen contact
    pub const CONTACT_DAMAGE: f32 = 10.0;

    /// Antibody muzzle speed (added to ship velocity)
    pub const BULLET_SPEED: f32 = 7.0;
    /// Antibody lifetime in ticks
    pub const BULLET_LIFE: u32 = 60;
    /// Shot cadence in milliseconds (base, before upgrades)
    pub const BASE_SHOT_DELAY_MS: f32 = 200.0;
    /// Shot cadence while rapid-fire is active
    pub const RAPID_FIRE_DELAY_MS: f32 = 80.0;

    /// Pathogen radius band; splits below the minimum are dropped
    pub const PATHOGEN_MIN_RADIUS: f32 = 15.0;
    pub const PATHOGEN_MAX_RADIUS: f32 = 50.0;
    /// Generic pathogens in the first wave; each level adds one
    pub const INITIAL_PATHOGEN_COUNT: u32 = 5;
    /// Minimum spawn distance from the ship when a safe zone is requested
    pub const SAFE_SPAWN_DISTANCE: f32 = 200.0;

    /// Cosmetic particle cap (oldest dropped first)
    pub const MAX_PARTICLES: usize = 200;

    /// Timed power-up duration in ticks (5 seconds)
    pub const POWERUP_DURATION: u32 = 300;
    /// Chance a destroyed pathogen drops a power-up
    pub const POWERUP_DROP_RATE: f32 = 0.15;
    /// Uncollected power-up lifetime in ticks (10 seconds)
    pub const POWERUP_LIFETIME: u32 = 600;

    /// Levels that spawn a scripted boss instead of a full generic wave
    pub const BOSS_LEVELS: [u32; 4] = [5, 10, 15, 20];

    /// Mega Virus phase lengths, ticks
    pub const MEGA_VIRUS_SHIELDED_TICKS: u32 = 180;
    pub const MEGA_VIRUS_VULNERABLE_TICKS: u32 = 240;
    /// Bacterial Colony trailing body length
    pub const COLONY_SEGMENTS: usize = 8;
    /// Parasitic Worm body length and inter-segment distance
    pub const WORM_SEGMENTS: usize = 12;
    pub const WORM_SEGMENT_SPACING: f32 = 22.0;
    /// Ticks between Fungal Bloom spore releases
    pub const BLOOM_SPORE_INTERVAL: u32 = 180;

    /// Ticks between cancer cell buds
    pub const CANCER_BUD_INTERVAL: u32 = 600;
    /// Radius cap for cancer growth
    pub const CANCER_MAX_RADIUS: f32 = 70.0;
    /// Biofilm shield capacity, in damage absorbed
    pub const BIOFILM_SHIELD: f32 = 12.0;

    /// Special-type unlock levels and spawn chances (base + level * increment).
    /// The chance is deliberately never clamped to 1.0; at very high levels
    /// the roll simply always succeeds, matching the reference behavior.
    pub const PRION_MIN_LEVEL: u32 = 3;
    pub const PRION_BASE_CHANCE: f32 = 0.15;
    pub const PRION_CHANCE_PER_LEVEL: f32 = 0.01;
    pub const PRION_SWARM_COUNT: u32 = 5;
    pub const CANCER_MIN_LEVEL: u32 = 6;
    pub const CANCER_BASE_CHANCE: f32 = 0.10;
    pub const CANCER_CHANCE_PER_LEVEL: f32 = 0.01;
    pub const BIOFILM_MIN_LEVEL: u32 = 8;
    pub const BIOFILM_BASE_CHANCE: f32 = 0.08;
    pub const BIOFILM_CHANCE_PER_LEVEL: f32 = 0.008;

    /// Chain-reaction cytokine: splash radius and damage on pathogen death
    pub const CHAIN_REACTION_RADIUS: f32 = 120.0;
    pub const CHAIN_REACTION_DAMAGE: f32 = 1.0;

    /// Auto-target cytokine: antibody steering range and per-tick turn cap
    pub const AUTO_TARGET_RANGE: f32 = 150.0;
    pub const AUTO_TARGET_TURN_RATE: f32 = 0.08;

    /// Regeneration cytokine: heal interval (ticks) and amount
    pub const REGEN_INTERVAL: u32 = 120;
    pub const REGEN_AMOUNT: f32 = 1.0;

    /// Time-attack mode timers (seconds)
    pub const TIME_ATTACK_INITIAL_SECONDS: u32 = 60;
    pub const TIME_ATTACK_KILL_BONUS_SECONDS: u32 = 2;
    pub const TIME_ATTACK_BOSS_BONUS_SECONDS: u32 = 15;
}
