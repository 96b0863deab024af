//! Boss behavior
//!
//! Each boss is a [`Pathogen`] whose `kind` carries a [`BossState`] machine.
//! Updates run before the movement pass: they steer, advance timers, and
//! queue any spawns, while position integration and wrapping happen with the
//! rest of the pathogen population.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::consts::*;
use crate::sim::physics::{angle_to_target, random_range, steer_angle};
use crate::sim::state::{BossState, MegaVirusPhase, Pathogen, PathogenKind, Species, World};

/// Advance every boss one tick
pub fn update_bosses(world: &mut World) {
    let ship_pos = world.ship.pos;
    let ticks = world.ticks;
    let mut spores: Vec<(Vec2, Vec2)> = Vec::new();

    let World { pathogens, rng, .. } = &mut *world;
    for p in pathogens.iter_mut() {
        let PathogenKind::Boss(state) = &mut p.kind else {
            continue;
        };
        match state {
            BossState::MegaVirus { phase, phase_timer } => {
                // slow and exposed while vulnerable, fast while shielded
                let speed = match phase {
                    MegaVirusPhase::Shielded => 1.5,
                    MegaVirusPhase::Vulnerable => 0.8,
                };
                let dir = (ship_pos - p.pos).normalize_or(Vec2::X);
                p.vel = dir * speed;
                p.rotation += 0.02;

                *phase_timer = phase_timer.saturating_sub(1);
                if *phase_timer == 0 {
                    *phase = match phase {
                        MegaVirusPhase::Shielded => MegaVirusPhase::Vulnerable,
                        MegaVirusPhase::Vulnerable => MegaVirusPhase::Shielded,
                    };
                    *phase_timer = match phase {
                        MegaVirusPhase::Shielded => MEGA_VIRUS_SHIELDED_TICKS,
                        MegaVirusPhase::Vulnerable => MEGA_VIRUS_VULNERABLE_TICKS,
                    };
                }
            }
            BossState::BacterialColony { segments } => {
                // head weaves toward the ship; body trails the head's path
                let heading = angle_to_target(p.pos, ship_pos);
                let weave = (ticks as f32 * 0.05).sin() * 0.6;
                let angle = heading + weave;
                p.vel = Vec2::new(angle.cos(), angle.sin()) * 1.0;
                p.rotation = heading;

                for i in (1..segments.len()).rev() {
                    segments[i] = segments[i - 1];
                }
                if let Some(first) = segments.first_mut() {
                    *first = p.pos;
                }
            }
            BossState::ParasiticWorm { segments } => {
                // turn-limited pursuit; segments follow at fixed spacing
                let target = angle_to_target(p.pos, ship_pos);
                p.rotation = steer_angle(p.rotation, target, 0.04);
                p.vel = Vec2::new(p.rotation.cos(), p.rotation.sin()) * 2.5;

                let mut lead = p.pos;
                for seg in segments.iter_mut() {
                    let dir = (lead - *seg).normalize_or(Vec2::X);
                    *seg = lead - dir * WORM_SEGMENT_SPACING;
                    lead = *seg;
                }
            }
            BossState::FungalBloom { spore_timer } => {
                let dir = (ship_pos - p.pos).normalize_or(Vec2::X);
                p.vel = dir * 0.5;
                p.rotation += 0.01;

                *spore_timer = spore_timer.saturating_sub(1);
                if *spore_timer == 0 {
                    *spore_timer = BLOOM_SPORE_INTERVAL;
                    for _ in 0..3 {
                        let angle = random_range(rng, 0.0, TAU);
                        let out = Vec2::new(angle.cos(), angle.sin());
                        spores.push((p.pos + out * p.radius, out * 2.0));
                    }
                }
            }
        }
    }

    for (pos, vel) in spores {
        spawn_spore(world, pos, vel);
    }
}

/// Segment radius used for worm body contact checks
pub const WORM_SEGMENT_RADIUS: f32 = 12.0;

/// A Fungal Bloom spore: a small, fragile fungus
pub fn spawn_spore(world: &mut World, pos: Vec2, vel: Vec2) {
    let noise = (0..10)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let rotation = random_range(&mut world.rng, 0.0, TAU);
    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel,
        radius: 12.0,
        rotation,
        kind: PathogenKind::Common {
            species: Species::Fungus,
            variant: None,
        },
        health: 1.0,
        max_health: 1.0,
        points: 80,
        sides: 10,
        noise,
    });
}

/// Death effects unique to bosses. The colony scatters its body as live
/// bacteria; the bloom releases a final spore burst.
pub fn on_boss_death(world: &mut World, boss: &Pathogen) {
    let PathogenKind::Boss(state) = &boss.kind else {
        return;
    };
    match state {
        BossState::BacterialColony { segments } => {
            for &pos in segments {
                scatter_bacterium(world, pos);
            }
        }
        BossState::FungalBloom { .. } => {
            for _ in 0..5 {
                let angle = random_range(&mut world.rng, 0.0, TAU);
                let out = Vec2::new(angle.cos(), angle.sin());
                spawn_spore(world, boss.pos + out * boss.radius, out * 2.0);
            }
        }
        BossState::MegaVirus { .. } | BossState::ParasiticWorm { .. } => {}
    }
}

fn scatter_bacterium(world: &mut World, pos: Vec2) {
    let vel = Vec2::new(
        random_range(&mut world.rng, -2.0, 2.0),
        random_range(&mut world.rng, -2.0, 2.0),
    );
    let noise = (0..10)
        .map(|_| random_range(&mut world.rng, 0.7, 1.3))
        .collect();
    let rotation = random_range(&mut world.rng, 0.0, TAU);
    let id = world.next_entity_id();
    world.pathogens.push(Pathogen {
        id,
        pos,
        vel,
        radius: PATHOGEN_MIN_RADIUS,
        rotation,
        kind: PathogenKind::Common {
            species: Species::Bacteria,
            variant: None,
        },
        health: 1.5,
        max_health: 1.5,
        points: 60,
        sides: 10,
        noise,
    });
}

/// Whether a boss currently blocks all incoming damage
pub fn is_invulnerable(p: &Pathogen) -> bool {
    matches!(
        p.kind,
        PathogenKind::Boss(BossState::MegaVirus {
            phase: MegaVirusPhase::Shielded,
            ..
        })
    )
}
