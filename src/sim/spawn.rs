//! Wave director: level population, pathogen construction, boss entry
//!
//! Species, variants, stats, and placement are all drawn from the world RNG,
//! so wave composition is reproducible per seed.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::campaign::{self, CampaignLevel, SpawnScript};
use crate::consts::*;
use crate::sim::physics::{distance, random_range};
use crate::sim::state::{
    BossKind, BossState, GameEvent, GameMode, GamePhase, MegaVirusPhase, Pathogen, PathogenKind,
    Species, Variant, World,
};

/// Fill the arena for the current level.
///
/// Campaign levels follow their scripted manifest. Other modes get a
/// procedural wave, with a boss replacing the wave on boss levels.
pub fn populate_level(world: &mut World) {
    if world.mode == GameMode::Campaign {
        if let Some(level) = campaign::level(world.level) {
            apply_manifest(world, level);
        }
        return;
    }

    // boss levels trade the full wave for the boss plus a thin escort
    let count = match boss_for_level(world.level) {
        Some(kind) => {
            spawn_boss(world, kind);
            (INITIAL_PATHOGEN_COUNT + world.level) / 3
        }
        None => INITIAL_PATHOGEN_COUNT + world.level,
    };
    // fresh wave spawns skip the smallest sizes; those are left to splits
    for _ in 0..count {
        let radius = random_range(&mut world.rng, PATHOGEN_MIN_RADIUS + 10.0, PATHOGEN_MAX_RADIUS);
        spawn_common(world, radius, None);
    }

    if boss_for_level(world.level).is_none() {
        roll_special_spawns(world);
    }
}

/// Boss assigned to a level, if any
pub fn boss_for_level(level: u32) -> Option<BossKind> {
    match level {
        l if l == BOSS_LEVELS[0] => Some(BossKind::MegaVirus),
        l if l == BOSS_LEVELS[1] => Some(BossKind::BacterialColony),
        l if l == BOSS_LEVELS[2] => Some(BossKind::ParasiticWorm),
        l if l == BOSS_LEVELS[3] => Some(BossKind::FungalBloom),
        _ => None,
    }
}

/// Level-scaled chance rolls for the late-game pathogen kinds
fn roll_special_spawns(world: &mut World) {
    let level = world.level as f32;

    if world.level >= PRION_MIN_LEVEL {
        let chance = PRION_BASE_CHANCE + PRION_CHANCE_PER_LEVEL * level;
        if world.rng.random::<f32>() < chance {
            spawn_prion_swarm(world);
        }
    }
    if world.level >= CANCER_MIN_LEVEL {
        let chance = CANCER_BASE_CHANCE + CANCER_CHANCE_PER_LEVEL * level;
        if world.rng.random::<f32>() < chance {
            spawn_cancer(world);
        }
    }
    if world.level >= BIOFILM_MIN_LEVEL {
        let chance = BIOFILM_BASE_CHANCE + BIOFILM_CHANCE_PER_LEVEL * level;
        if world.rng.random::<f32>() < chance {
            spawn_biofilm(world);
        }
    }
}

/// Execute a campaign level's spawn manifest
pub fn apply_manifest(world: &mut World, level: &CampaignLevel) {
    for script in level.spawns {
        spawn_scripted(world, script);
    }
    for _ in 0..level.prion_swarms {
        spawn_prion_swarm(world);
    }
    for _ in 0..level.cancers {
        spawn_cancer(world);
    }
    for _ in 0..level.biofilms {
        spawn_biofilm(world);
    }
    if let Some(kind) = level.boss {
        spawn_boss(world, kind);
    }
}

/// Advance to the next level and populate it.
///
/// In campaign mode, finishing the final level ends the run in victory.
pub fn advance_level(world: &mut World) {
    world.level += 1;
    if world.mode == GameMode::Campaign && world.level > campaign::LEVEL_COUNT {
        world.phase = GamePhase::Victory;
        return;
    }
    world.events.push(GameEvent::LevelClear);
    populate_level(world);
}

/// Random arena position at least [`SAFE_SPAWN_DISTANCE`] from the ship.
/// Bounded re-roll; falls back to the last candidate on a crowded arena.
fn random_spawn_pos(world: &mut World) -> Vec2 {
    let mut pos = Vec2::ZERO;
    for _ in 0..50 {
        pos = Vec2::new(
            random_range(&mut world.rng, 0.0, world.width),
            random_range(&mut world.rng, 0.0, world.height),
        );
        if distance(pos, world.ship.pos) > SAFE_SPAWN_DISTANCE {
            return pos;
        }
    }
    pos
}

/// Construct one ordinary pathogen with rolled species and variant.
/// `pos` is `None` for wave spawns (safe placement) and `Some` for split
/// children, which inherit the parent's spot.
pub fn spawn_common(world: &mut World, radius: f32, pos: Option<Vec2>) {
    let species = if radius > 40.0 {
        Species::Fungus
    } else if world.rng.random::<f32>() < 0.2 {
        Species::Parasite
    } else if radius > 30.0 {
        Species::Bacteria
    } else {
        Species::Virus
    };

    let variant = if world.rng.random::<f32>() < 0.3 {
        match species {
            Species::Bacteria => Some(Variant::Armored),
            Species::Virus => Some(Variant::Swift),
            Species::Parasite => Some(Variant::Stalker),
            Species::Fungus => None,
        }
    } else {
        None
    };

    push_common(world, radius, pos, species, variant);
}

/// Spawn one manifest line's worth of pathogens with the scripted make
pub fn spawn_scripted(world: &mut World, script: &SpawnScript) {
    for _ in 0..script.count {
        push_common(world, script.radius, None, script.species, script.variant);
    }
}

fn push_common(
    world: &mut World,
    radius: f32,
    pos: Option<Vec2>,
    species: Species,
    variant: Option<Variant>,
) {
    let pos = match pos {
        Some(p) => p,
        None => random_spawn_pos(world),
    };
    let level = world.level as f32;

    let mut speed_scale = 1.0 + level * 0.1;
    if species == Species::Parasite {
        speed_scale *= 1.5;
    }
    match variant {
        Some(Variant::Swift) => speed_scale *= 1.8,
        Some(Variant::Armored) => speed_scale *= 0.6,
        _ => {}
    }
    let vel = Vec2::new(
        random_range(&mut world.rng, -2.0, 2.0) * speed_scale,
        random_range(&mut world.rng, -2.0, 2.0) * speed_scale,
    );

    let mut health = radius / 10.0;
    if species == Species::Fungus {
        health *= 2.0;
    }
    match variant {
        Some(Variant::Armored) => health *= 2.5,
        Some(Variant::Swift) => health *= 0.6,
        _ => {}
    }

    let mut points = (100.0 / radius).floor() as u64 * 10;
    if species == Species::Parasite {
        points *= 2;
    }
    if variant.is_some() {
        points = (points as f32 * 1.5).floor() as u64;
    }

    let sides = if variant == Some(Variant::Swift) { 16 } else { 10 };
    let noise = (0..sides)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let rotation = random_range(&mut world.rng, 0.0, TAU);

    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel,
        radius,
        rotation,
        kind: PathogenKind::Common { species, variant },
        health,
        max_health: health,
        points,
        sides,
        noise,
    });
}

/// Split children for a destroyed ordinary pathogen. Halves below the
/// minimum radius vanish instead of splitting.
pub fn spawn_split_children(world: &mut World, pos: Vec2, parent_radius: f32) {
    let half = parent_radius / 2.0;
    if half < PATHOGEN_MIN_RADIUS {
        return;
    }
    for _ in 0..2 {
        spawn_common(world, half, Some(pos));
    }
}

/// Cluster of flickering prions around one safe anchor point
pub fn spawn_prion_swarm(world: &mut World) {
    let anchor = random_spawn_pos(world);
    for _ in 0..PRION_SWARM_COUNT {
        let offset = Vec2::new(
            random_range(&mut world.rng, -40.0, 40.0),
            random_range(&mut world.rng, -40.0, 40.0),
        );
        let vel = Vec2::new(
            random_range(&mut world.rng, -3.0, 3.0),
            random_range(&mut world.rng, -3.0, 3.0),
        );
        let noise = (0..8)
            .map(|_| random_range(&mut world.rng, 0.7, 1.3))
            .collect();
        let rotation = random_range(&mut world.rng, 0.0, TAU);
        let id = world.next_entity_id();
        world.pathogens.push(Pathogen {
            id,
            pos: anchor + offset,
            vel,
            radius: 8.0,
            rotation,
            kind: PathogenKind::Prion { opacity: 1.0 },
            health: 0.5,
            max_health: 0.5,
            points: 120,
            sides: 8,
            noise,
        });
    }
}

/// Anchored tumor cell that grows and buds copies of itself
pub fn spawn_cancer(world: &mut World) {
    let pos = random_spawn_pos(world);
    spawn_cancer_at(world, pos, 30.0);
}

pub fn spawn_cancer_at(world: &mut World, pos: Vec2, radius: f32) {
    let growth_rate = random_range(&mut world.rng, 0.01, 0.03);
    let noise = (0..12)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let rotation = random_range(&mut world.rng, 0.0, TAU);
    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel: Vec2::ZERO,
        radius,
        rotation,
        kind: PathogenKind::Cancer {
            growth_rate,
            spawn_timer: CANCER_BUD_INTERVAL,
        },
        health: 10.0,
        max_health: 10.0,
        points: 300,
        sides: 12,
        noise,
    });
}

/// Slow drifter with a depletable shield layer over its core
pub fn spawn_biofilm(world: &mut World) {
    let pos = random_spawn_pos(world);
    let vel = Vec2::new(
        random_range(&mut world.rng, -1.0, 1.0),
        random_range(&mut world.rng, -1.0, 1.0),
    );
    let noise = (0..14)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let rotation = random_range(&mut world.rng, 0.0, TAU);
    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel,
        radius: 35.0,
        rotation,
        kind: PathogenKind::Biofilm {
            shield: BIOFILM_SHIELD,
            max_shield: BIOFILM_SHIELD,
        },
        health: 8.0,
        max_health: 8.0,
        points: 400,
        sides: 14,
        noise,
    });
}

/// Place a boss across the arena from the ship and announce it
pub fn spawn_boss(world: &mut World, kind: BossKind) {
    let center = Vec2::new(world.width / 2.0, world.height / 2.0);
    let away = (center - world.ship.pos).normalize_or(Vec2::Y);
    let pos = center + away * (world.width.min(world.height) / 3.0);

    let (radius, health, sides, state) = match kind {
        BossKind::MegaVirus => (
            70.0,
            60.0,
            16,
            BossState::MegaVirus {
                phase: MegaVirusPhase::Shielded,
                phase_timer: MEGA_VIRUS_SHIELDED_TICKS,
            },
        ),
        BossKind::BacterialColony => (
            40.0,
            30.0,
            10,
            BossState::BacterialColony {
                segments: vec![pos; COLONY_SEGMENTS],
            },
        ),
        BossKind::ParasiticWorm => (
            25.0,
            25.0,
            12,
            BossState::ParasiticWorm {
                segments: (1..=WORM_SEGMENTS)
                    .map(|i| pos + Vec2::new(0.0, i as f32 * WORM_SEGMENT_SPACING))
                    .collect(),
            },
        ),
        BossKind::FungalBloom => (
            80.0,
            80.0,
            20,
            BossState::FungalBloom {
                spore_timer: BLOOM_SPORE_INTERVAL,
            },
        ),
    };
    let points = match kind {
        BossKind::MegaVirus | BossKind::BacterialColony => 1000,
        BossKind::ParasiticWorm => 1500,
        BossKind::FungalBloom => 2000,
    };

    let noise = (0..sides)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel: Vec2::ZERO,
        radius,
        rotation: 0.0,
        kind: PathogenKind::Boss(state),
        health,
        max_health: health,
        points,
        sides,
        noise,
    });
    world.events.push(GameEvent::BossSpawn(kind));
}
