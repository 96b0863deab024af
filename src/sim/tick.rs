//! Fixed-timestep tick resolver
//!
//! [`tick`] advances a [`World`] by exactly one step. Per tick: input and
//! ship control, boss and pathogen updates, antibody flight, collision and
//! damage resolution, pickups, cosmetic entity upkeep, clocks, and the
//! level-clear and game-over checks. Damage never kills twice: dead
//! pathogens are pulled through a single resolution queue so splits, drops,
//! and chain reactions each fire exactly once per death.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::boss::{self, WORM_SEGMENT_RADIUS};
use crate::sim::physics::{
    angle_to_target, apply_friction, apply_velocity, circles_collide, clamp_speed, distance,
    random_range, steer_angle, wrap_position,
};
use crate::sim::spawn;
use crate::sim::state::{
    Antibody, BossState, GameEvent, GameMode, GamePhase, Pathogen, PathogenKind, PowerUp,
    PowerUpKind, Species, Variant, World,
};

/// Virtual-joystick sample, used instead of the key pair when present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    /// Heading in radians
    pub angle: f32,
    /// Deflection, 0..=1
    pub magnitude: f32,
}

/// Input sampled by the host for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    pub joystick: Option<Joystick>,
}

/// Advance the world one tick. No-op outside the playing phase.
pub fn tick(world: &mut World, input: &TickInput) {
    if world.phase != GamePhase::Playing {
        return;
    }
    world.ticks += 1;
    world.stats.time_played_ticks += 1;

    control_ship(world, input);
    move_ship(world);
    tick_active_power_ups(world);

    boss::update_bosses(world);
    update_pathogens(world);
    update_antibodies(world);

    resolve_antibody_hits(world);
    resolve_ship_contact(world);
    resolve_deaths(world, true);
    collect_power_ups(world);

    update_power_ups(world);
    update_particles(world);
    update_floating_texts(world);

    apply_regeneration(world);
    tick_time_attack_clock(world);
    decay_feedback(world);

    if world.phase == GamePhase::Playing && world.pathogens.is_empty() {
        spawn::advance_level(world);
    }
    if world.phase == GamePhase::Playing && world.health <= 0.0 {
        let pos = world.ship.pos;
        world.create_explosion(pos, "#ffffff", 40);
        world.events.push(GameEvent::GameOver);
        world.phase = GamePhase::GameOver;
    }
}

fn control_ship(world: &mut World, input: &TickInput) {
    let mut thrusting = input.thrust;
    if let Some(stick) = input.joystick {
        // proportional angle-seek, short way around
        let mut diff = stick.angle - world.ship.rotation;
        while diff > PI {
            diff -= TAU;
        }
        while diff < -PI {
            diff += TAU;
        }
        if diff.abs() > 0.05 {
            world.ship.rotation += diff * 0.15;
        }
        // thrust only on a firm deflection
        thrusting = stick.magnitude > 0.4;
    } else {
        if input.left {
            world.ship.rotation -= SHIP_TURN_SPEED;
        }
        if input.right {
            world.ship.rotation += SHIP_TURN_SPEED;
        }
    }

    if thrusting != world.ship.thrusting {
        world.events.push(if thrusting {
            GameEvent::ThrustStart
        } else {
            GameEvent::ThrustStop
        });
        world.ship.thrusting = thrusting;
    }

    if thrusting {
        let dir = Vec2::new(world.ship.rotation.cos(), world.ship.rotation.sin());
        world.ship.vel += dir * world.mods.thrust;
        if world.ticks % 2 == 0 {
            let tail = world.ship.pos - dir * world.ship.radius;
            world.create_explosion(tail, "#60a5fa", 1);
        }
    }

    if input.fire && can_fire(world) {
        fire_antibody(world);
    }
}

fn can_fire(world: &World) -> bool {
    let delay_ms = if world.active_power_ups.rapid_fire > 0 {
        RAPID_FIRE_DELAY_MS
    } else {
        world.mods.shot_delay_ms
    };
    let delay_ticks = (delay_ms * FPS as f32 / 1000.0) as u64;
    match world.ship.last_shot {
        None => true,
        Some(t) => world.ticks - t >= delay_ticks,
    }
}

fn fire_antibody(world: &mut World) {
    let dir = Vec2::new(world.ship.rotation.cos(), world.ship.rotation.sin());
    let id = world.next_entity_id();
    world.antibodies.push(Antibody {
        id,
        pos: world.ship.pos + dir * world.ship.radius,
        vel: dir * BULLET_SPEED + world.ship.vel,
        radius: 3.0,
        rotation: world.ship.rotation,
        life: BULLET_LIFE,
    });
    world.ship.last_shot = Some(world.ticks);
    world.events.push(GameEvent::Fire);
}

fn move_ship(world: &mut World) {
    apply_friction(&mut world.ship.vel, FRICTION);
    apply_velocity(&mut world.ship.pos, world.ship.vel);
    let (w, h, r) = (world.width, world.height, world.ship.radius);
    wrap_position(&mut world.ship.pos, w, h, r);
}

fn tick_active_power_ups(world: &mut World) {
    let a = &mut world.active_power_ups;
    a.rapid_fire = a.rapid_fire.saturating_sub(1);
    a.shield = a.shield.saturating_sub(1);
    a.damage_boost = a.damage_boost.saturating_sub(1);
}

/// Kind-specific behavior plus shared movement for every pathogen
fn update_pathogens(world: &mut World) {
    let ship_pos = world.ship.pos;
    let ticks = world.ticks;
    let level = world.level as f32;
    let (width, height) = (world.width, world.height);
    let mut buds: Vec<Vec2> = Vec::new();

    {
        let World { pathogens, rng, .. } = &mut *world;
        for p in pathogens.iter_mut() {
            match &mut p.kind {
                PathogenKind::Prion { opacity } => {
                    *opacity = 0.6 + 0.4 * (ticks as f32 * 0.1 + p.id as f32).sin();
                }
                PathogenKind::Cancer {
                    growth_rate,
                    spawn_timer,
                } => {
                    p.radius = (p.radius + *growth_rate).min(CANCER_MAX_RADIUS);
                    *spawn_timer = spawn_timer.saturating_sub(1);
                    if *spawn_timer == 0 {
                        *spawn_timer = CANCER_BUD_INTERVAL;
                        let offset = Vec2::new(
                            random_range(rng, -80.0, 80.0),
                            random_range(rng, -80.0, 80.0),
                        );
                        buds.push(p.pos + offset);
                    }
                }
                PathogenKind::Common {
                    species: Species::Parasite,
                    variant,
                } => {
                    // parasites home on the ship, harder for stalkers
                    let stalker = *variant == Some(Variant::Stalker);
                    let accel = if stalker { 0.12 } else { 0.05 };
                    let max_speed =
                        (3.0 + 0.2 * level) * if stalker { 1.4 } else { 1.0 };
                    let dir = (ship_pos - p.pos).normalize_or(Vec2::X);
                    p.vel += dir * accel;
                    clamp_speed(&mut p.vel, max_speed);
                }
                _ => {}
            }

            p.pos += p.vel;
            wrap_position(&mut p.pos, width, height, p.radius);
            if !p.is_boss() {
                p.rotation += 0.01;
            }
        }
    }

    for pos in buds {
        spawn::spawn_cancer_at(world, pos, 30.0);
    }
}

fn update_antibodies(world: &mut World) {
    let auto_target = world.mods.auto_target;
    let (width, height) = (world.width, world.height);

    // borrow pathogens read-only alongside the antibody mutation
    let World {
        antibodies,
        pathogens,
        ..
    } = &mut *world;
    for a in antibodies.iter_mut() {
        if auto_target {
            let nearest = pathogens
                .iter()
                .map(|p| (distance(a.pos, p.pos), p.pos))
                .filter(|(d, _)| *d < AUTO_TARGET_RANGE)
                .min_by(|x, y| x.0.total_cmp(&y.0));
            if let Some((_, target)) = nearest {
                let speed = a.vel.length();
                let current = a.vel.y.atan2(a.vel.x);
                let angle =
                    steer_angle(current, angle_to_target(a.pos, target), AUTO_TARGET_TURN_RATE);
                a.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                a.rotation = angle;
            }
        }
        a.pos += a.vel;
        wrap_position(&mut a.pos, width, height, a.radius);
        a.life = a.life.saturating_sub(1);
    }
    antibodies.retain(|a| a.life > 0);
}

/// Apply `amount` damage to a pathogen, honoring its resistances.
///
/// Priority: boss invulnerability blocks everything; a biofilm's shield
/// absorbs before the core; fungus takes a flat 0.5 per hit and a parasite
/// a flat 0.3 from fast antibodies, regardless of the hit's strength.
/// Returns false when the hit was fully blocked.
fn apply_damage(p: &mut Pathogen, amount: f32, hit_speed: f32) -> bool {
    if boss::is_invulnerable(p) {
        return false;
    }
    match &mut p.kind {
        PathogenKind::Biofilm { shield, .. } if *shield > 0.0 => {
            let absorbed = amount.min(*shield);
            *shield -= absorbed;
            p.health -= amount - absorbed;
        }
        PathogenKind::Common {
            species: Species::Fungus,
            ..
        } => p.health -= 0.5,
        PathogenKind::Common {
            species: Species::Parasite,
            ..
        } if hit_speed > 6.0 => p.health -= 0.3,
        _ => p.health -= amount,
    }
    true
}

fn resolve_antibody_hits(world: &mut World) {
    let damage = if world.active_power_ups.damage_boost > 0 {
        world.mods.bullet_damage * 2.0
    } else {
        world.mods.bullet_damage
    };

    let mut hits: Vec<(Vec2, &'static str)> = Vec::new();
    {
        let World {
            antibodies,
            pathogens,
            ..
        } = &mut *world;
        antibodies.retain(|a| {
            for p in pathogens.iter_mut() {
                // antibodies are point-like against the pathogen body
                if distance(a.pos, p.pos) < p.radius {
                    apply_damage(p, damage, a.vel.length());
                    hits.push((a.pos, p.color()));
                    return false;
                }
            }
            true
        });
    }
    for (pos, color) in hits {
        world.create_explosion(pos, color, 3);
    }
}

fn resolve_ship_contact(world: &mut World) {
    let shielded = world.active_power_ups.shield > 0;

    for i in 0..world.pathogens.len() {
        let ship_pos = world.ship.pos;
        let ship_radius = world.ship.radius;
        let (p_pos, p_radius) = {
            let p = &world.pathogens[i];
            (p.pos, p.radius)
        };

        let mut contact = None;
        if circles_collide(ship_pos, ship_radius, p_pos, p_radius) {
            contact = Some(p_pos);
        } else if let PathogenKind::Boss(BossState::ParasiticWorm { segments }) =
            &world.pathogens[i].kind
        {
            contact = segments
                .iter()
                .find(|s| circles_collide(ship_pos, ship_radius, **s, WORM_SEGMENT_RADIUS))
                .copied();
        }
        let Some(cpos) = contact else { continue };

        if shielded {
            let away = (p_pos - ship_pos).normalize_or(Vec2::X);
            world.pathogens[i].vel = away * 5.0;
            world.shake = world.shake.max(5.0);
            world.events.push(GameEvent::ShieldBounce);
        } else {
            if world.mode != GameMode::Zen {
                world.health -= CONTACT_DAMAGE;
            }
            world.shake = world.shake.max(10.0);
            world.flash = world.flash.max(5.0);
            world.events.push(GameEvent::Damage);
            let away = (ship_pos - cpos).normalize_or(Vec2::X);
            world.ship.vel = away * 5.0;
            world.pathogens[i].health -= 1.0;
        }
    }
}

/// Drain every dead pathogen through the death queue.
///
/// Each death scores, records stats, explodes, and may split, drop a
/// power-up, and trigger a chain reaction. Chain damage re-enters the queue,
/// so cascades resolve within the same call. `allow_spawns` is false for
/// bomb kills, which suppress splits and drops.
fn resolve_deaths(world: &mut World, allow_spawns: bool) {
    while let Some(idx) = world.pathogens.iter().position(|p| p.health <= 0.0) {
        let dead = world.pathogens.remove(idx);

        world.score += dead.points;
        world.stats.record_kill(dead.species_name());
        world.events.push(GameEvent::Explosion { size: dead.radius });
        let particle_count = (dead.radius / 3.0) as u32 + 5;
        world.create_explosion(dead.pos, dead.color(), particle_count);
        world.spawn_floating_text(dead.pos, format!("+{}", dead.points), "#fbbf24", 14.0);

        if let Some(kind) = dead.boss_kind() {
            world.events.push(GameEvent::BossDefeat(kind));
            world.shake = world.shake.max(15.0);
            boss::on_boss_death(world, &dead);
            if world.mode == GameMode::TimeAttack {
                world.time_left += TIME_ATTACK_BOSS_BONUS_SECONDS * FPS;
            }
        } else {
            if allow_spawns && dead.splits_on_death() {
                spawn::spawn_split_children(world, dead.pos, dead.radius);
            }
            if world.mode == GameMode::TimeAttack {
                world.time_left += TIME_ATTACK_KILL_BONUS_SECONDS * FPS;
            }
        }

        if allow_spawns {
            maybe_drop_power_up(world, dead.pos);
        }

        if world.mods.chain_reaction {
            let center = dead.pos;
            for p in &mut world.pathogens {
                if distance(center, p.pos) < CHAIN_REACTION_RADIUS {
                    apply_damage(p, CHAIN_REACTION_DAMAGE, 0.0);
                }
            }
        }
    }
}

fn maybe_drop_power_up(world: &mut World, pos: Vec2) {
    if world.rng.random::<f32>() >= POWERUP_DROP_RATE {
        return;
    }
    let kind = match world.rng.random_range(0..4) {
        0 => PowerUpKind::RapidFire,
        1 => PowerUpKind::Shield,
        2 => PowerUpKind::DamageBoost,
        _ => PowerUpKind::Bomb,
    };
    let vel = Vec2::new(
        random_range(&mut world.rng, -0.5, 0.5),
        random_range(&mut world.rng, -0.5, 0.5),
    );
    let id = world.next_entity_id();
    world.power_ups.push(PowerUp {
        id,
        pos,
        vel,
        radius: 12.0,
        kind,
        life: POWERUP_LIFETIME,
    });
}

fn collect_power_ups(world: &mut World) {
    let ship_pos = world.ship.pos;
    let ship_radius = world.ship.radius;
    let mut collected = Vec::new();
    world.power_ups.retain(|pu| {
        if circles_collide(ship_pos, ship_radius, pu.pos, pu.radius) {
            collected.push((pu.kind, pu.pos));
            false
        } else {
            true
        }
    });

    for (kind, pos) in collected {
        world.events.push(GameEvent::PowerUpCollected);
        let label = match kind {
            PowerUpKind::RapidFire => "RAPID FIRE",
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::DamageBoost => "DAMAGE BOOST",
            PowerUpKind::Bomb => "BOMB",
        };
        world.spawn_floating_text(pos, label, "#34d399", 16.0);
        match kind {
            PowerUpKind::RapidFire => world.active_power_ups.rapid_fire = POWERUP_DURATION,
            PowerUpKind::Shield => world.active_power_ups.shield = world.mods.shield_duration,
            PowerUpKind::DamageBoost => world.active_power_ups.damage_boost = POWERUP_DURATION,
            PowerUpKind::Bomb => detonate_bomb(world),
        }
    }
}

/// Wipe out every ordinary pathogen and chip the bosses. Bomb kills never
/// split or drop.
fn detonate_bomb(world: &mut World) {
    world.events.push(GameEvent::Bomb);
    world.shake = world.shake.max(20.0);
    world.flash = world.flash.max(10.0);
    for p in &mut world.pathogens {
        if p.is_boss() {
            apply_damage(p, 10.0, 0.0);
        } else {
            p.health = 0.0;
        }
    }
    resolve_deaths(world, false);
}

fn update_power_ups(world: &mut World) {
    let (width, height) = (world.width, world.height);
    for pu in &mut world.power_ups {
        pu.pos += pu.vel;
        wrap_position(&mut pu.pos, width, height, pu.radius);
        pu.life = pu.life.saturating_sub(1);
    }
    world.power_ups.retain(|pu| pu.life > 0);
}

fn update_particles(world: &mut World) {
    for p in &mut world.particles {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
        p.opacity = p.life as f32 / 40.0;
    }
    world.particles.retain(|p| p.life > 0);
}

fn update_floating_texts(world: &mut World) {
    for t in &mut world.floating_texts {
        t.pos += t.vel;
        t.life = t.life.saturating_sub(1);
    }
    world.floating_texts.retain(|t| t.life > 0);
}

fn apply_regeneration(world: &mut World) {
    if !world.mods.regeneration || world.health >= world.mods.max_health {
        world.regen_timer = 0;
        return;
    }
    world.regen_timer += 1;
    if world.regen_timer >= REGEN_INTERVAL {
        world.regen_timer = 0;
        world.health = (world.health + REGEN_AMOUNT).min(world.mods.max_health);
    }
}

fn tick_time_attack_clock(world: &mut World) {
    if world.mode != GameMode::TimeAttack || world.phase != GamePhase::Playing {
        return;
    }
    world.time_left = world.time_left.saturating_sub(1);
    if world.time_left == 0 {
        world.events.push(GameEvent::GameOver);
        world.phase = GamePhase::GameOver;
    }
}

fn decay_feedback(world: &mut World) {
    world.shake *= 0.9;
    if world.shake < 0.01 {
        world.shake = 0.0;
    } else {
        world.shake_angle = random_range(&mut world.rng, 0.0, TAU);
    }
    world.flash = (world.flash - 1.0).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::GameModifiers;
    use crate::sim::spawn::{spawn_boss, spawn_common};
    use crate::sim::state::{BossKind, WorldConfig};

    fn world_with(mode: GameMode, mods: GameModifiers) -> World {
        let mut world = World::new(WorldConfig {
            width: 800.0,
            height: 600.0,
            mode,
            seed: 42,
            mods,
        });
        world.pathogens.clear();
        world.drain_events();
        world
    }

    /// Plant one plain virus with known stats at a position
    fn plant_virus(world: &mut World, pos: Vec2, health: f32) -> u32 {
        spawn_common(world, 20.0, Some(pos));
        let p = world.pathogens.last_mut().unwrap();
        p.kind = PathogenKind::Common {
            species: Species::Virus,
            variant: None,
        };
        p.vel = Vec2::ZERO;
        p.health = health;
        p.max_health = health;
        p.points = 50;
        p.id
    }

    #[test]
    fn same_seed_same_inputs_same_world() {
        let mk = || {
            World::new(WorldConfig {
                width: 800.0,
                height: 600.0,
                mode: GameMode::Endless,
                seed: 1234,
                mods: GameModifiers::default(),
            })
        };
        let mut a = mk();
        let mut b = mk();
        let input = TickInput {
            thrust: true,
            fire: true,
            right: true,
            ..TickInput::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.pathogens.len(), b.pathogens.len());
        for (pa, pb) in a.pathogens.iter().zip(&b.pathogens) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.health, pb.health);
        }
    }

    #[test]
    fn antibody_kill_scores_and_splits() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        plant_virus(&mut world, Vec2::new(400.0, 100.0), 1.0);
        let id = world.next_entity_id();
        world.antibodies.push(Antibody {
            id,
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            radius: 3.0,
            rotation: 0.0,
            life: BULLET_LIFE,
        });

        resolve_antibody_hits(&mut world);
        resolve_deaths(&mut world, true);

        assert_eq!(world.score, 50);
        assert_eq!(world.stats.kills, 1);
        assert_eq!(world.stats.kills_by_type.get("virus"), Some(&1));
        // 20.0 splits into two 10.0 halves, which are below the size floor
        assert!(world.pathogens.is_empty());
        assert!(world.antibodies.is_empty());
        assert!(world
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Explosion { .. })));
    }

    #[test]
    fn large_pathogen_splits_into_two() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        spawn_common(&mut world, 40.0, Some(Vec2::new(400.0, 100.0)));
        world.pathogens[0].health = 0.0;
        resolve_deaths(&mut world, true);
        assert_eq!(world.pathogens.len(), 2);
        assert!(world.pathogens.iter().all(|p| p.radius == 20.0));
    }

    #[test]
    fn shield_bounces_contact_without_damage() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        world.active_power_ups.shield = 100;
        let pos = world.ship.pos;
        plant_virus(&mut world, pos, 5.0);

        let before = world.health;
        resolve_ship_contact(&mut world);
        assert_eq!(world.health, before);
        assert!(world.events.contains(&GameEvent::ShieldBounce));
        // pathogen was knocked away
        assert!(world.pathogens[0].vel.length() > 4.9);
    }

    #[test]
    fn contact_damages_hull_and_pathogen() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        let pos = world.ship.pos;
        plant_virus(&mut world, pos, 5.0);

        let before = world.health;
        resolve_ship_contact(&mut world);
        assert_eq!(world.health, before - CONTACT_DAMAGE);
        assert_eq!(world.pathogens[0].health, 4.0);
        assert!(world.shake >= 10.0);
        assert!(world.events.contains(&GameEvent::Damage));
    }

    #[test]
    fn zen_mode_contact_costs_no_hull() {
        let mut world = world_with(GameMode::Zen, GameModifiers::default());
        let pos = world.ship.pos;
        plant_virus(&mut world, pos, 5.0);
        let before = world.health;
        resolve_ship_contact(&mut world);
        assert_eq!(world.health, before);
    }

    #[test]
    fn bomb_clears_wave_without_splits_and_chips_boss() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        spawn_common(&mut world, 40.0, Some(Vec2::new(100.0, 100.0)));
        spawn_common(&mut world, 40.0, Some(Vec2::new(700.0, 500.0)));
        spawn_boss(&mut world, BossKind::BacterialColony);
        let boss_health = world.pathogens.last().unwrap().health;

        detonate_bomb(&mut world);

        assert_eq!(world.pathogens.len(), 1);
        let boss = &world.pathogens[0];
        assert!(boss.is_boss());
        assert_eq!(boss.health, boss_health - 10.0);
        assert!(world.events.contains(&GameEvent::Bomb));
        assert!(world.power_ups.is_empty());
    }

    #[test]
    fn shielded_mega_virus_blocks_bomb_damage() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        spawn_boss(&mut world, BossKind::MegaVirus);
        let before = world.pathogens[0].health;
        detonate_bomb(&mut world);
        assert_eq!(world.pathogens[0].health, before);
    }

    #[test]
    fn biofilm_shield_absorbs_before_core() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        let mut p = {
            crate::sim::spawn::spawn_biofilm(&mut world);
            world.pathogens.pop().unwrap()
        };
        let core = p.health;

        apply_damage(&mut p, 5.0, 7.0);
        assert_eq!(p.health, core);
        apply_damage(&mut p, 10.0, 7.0);
        // 12 total shield: 7 left absorbed, 3 spills to the core
        assert_eq!(p.health, core - 3.0);
    }

    #[test]
    fn fungus_and_fast_hit_parasite_take_flat_damage() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        spawn_common(&mut world, 45.0, Some(Vec2::new(100.0, 100.0)));
        let mut fungus = world.pathogens.pop().unwrap();
        let before = fungus.health;
        apply_damage(&mut fungus, 2.0, 7.0);
        assert_eq!(fungus.health, before - 0.5);

        plant_virus(&mut world, Vec2::new(100.0, 100.0), 10.0);
        let mut parasite = world.pathogens.pop().unwrap();
        parasite.kind = PathogenKind::Common {
            species: Species::Parasite,
            variant: None,
        };
        apply_damage(&mut parasite, 1.0, 7.0);
        assert!((parasite.health - 9.7).abs() < 1e-5);
        // slow hits bypass the resistance entirely
        apply_damage(&mut parasite, 1.0, 5.0);
        assert!((parasite.health - 8.7).abs() < 1e-5);
    }

    #[test]
    fn parasite_pursuit_tops_out_at_the_level_cap() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        plant_virus(&mut world, Vec2::new(50.0, 50.0), 5.0);
        world.pathogens[0].kind = PathogenKind::Common {
            species: Species::Parasite,
            variant: None,
        };
        plant_virus(&mut world, Vec2::new(750.0, 550.0), 5.0);
        world.pathogens[1].kind = PathogenKind::Common {
            species: Species::Parasite,
            variant: Some(Variant::Stalker),
        };

        for _ in 0..100 {
            update_pathogens(&mut world);
        }
        let cap = 3.0 + 0.2 * world.level as f32;
        let plain = world.pathogens[0].vel.length();
        let stalker = world.pathogens[1].vel.length();
        assert!((plain - cap).abs() < 1e-3, "plain speed {plain}");
        assert!((stalker - cap * 1.4).abs() < 1e-3, "stalker speed {stalker}");
    }

    #[test]
    fn flat_resistance_ignores_damage_boost() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        world.active_power_ups.damage_boost = 100;
        spawn_common(&mut world, 45.0, Some(Vec2::new(400.0, 100.0)));
        let before = world.pathogens[0].health;
        let id = world.next_entity_id();
        world.antibodies.push(Antibody {
            id,
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            radius: 3.0,
            rotation: 0.0,
            life: BULLET_LIFE,
        });

        resolve_antibody_hits(&mut world);
        // boosted 2.0 hit still lands as the flat 0.5
        assert_eq!(world.pathogens[0].health, before - 0.5);
    }

    #[test]
    fn chain_reaction_cascades_through_the_queue() {
        let mut mods = GameModifiers::default();
        mods.chain_reaction = true;
        let mut world = world_with(GameMode::Endless, mods);
        plant_virus(&mut world, Vec2::new(400.0, 300.0), 0.0);
        plant_virus(&mut world, Vec2::new(450.0, 300.0), 1.0);
        plant_virus(&mut world, Vec2::new(500.0, 300.0), 1.0);

        resolve_deaths(&mut world, true);
        assert!(world.pathogens.is_empty());
        assert_eq!(world.stats.kills, 3);
    }

    #[test]
    fn time_attack_kills_buy_time_and_clock_ends_run() {
        let mut world = world_with(GameMode::TimeAttack, GameModifiers::default());
        let before = world.time_left;
        plant_virus(&mut world, Vec2::new(100.0, 100.0), 0.0);
        resolve_deaths(&mut world, true);
        assert_eq!(
            world.time_left,
            before + TIME_ATTACK_KILL_BONUS_SECONDS * FPS
        );

        world.time_left = 1;
        tick_time_attack_clock(&mut world);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn shot_cadence_respects_rapid_fire() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        // keep the arena occupied so level-clear doesn't respawn a wave
        plant_virus(&mut world, Vec2::new(700.0, 500.0), 100.0);
        let input = TickInput {
            fire: true,
            ..TickInput::default()
        };
        for _ in 0..60 {
            tick(&mut world, &input);
        }
        // 200 ms at 60 fps is a 12-tick cadence: shots at ticks 1, 13, 25, ...
        let normal = world.events.iter().filter(|e| **e == GameEvent::Fire).count();
        assert_eq!(normal, 5);

        world.drain_events();
        world.active_power_ups.rapid_fire = 10_000;
        for _ in 0..60 {
            tick(&mut world, &input);
        }
        let rapid = world.events.iter().filter(|e| **e == GameEvent::Fire).count();
        assert!(rapid > normal * 2);
    }

    #[test]
    fn auto_target_curves_antibodies() {
        let mut mods = GameModifiers::default();
        mods.auto_target = true;
        let mut world = world_with(GameMode::Endless, mods);
        plant_virus(&mut world, Vec2::new(450.0, 350.0), 100.0);
        let id = world.next_entity_id();
        world.antibodies.push(Antibody {
            id,
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(BULLET_SPEED, 0.0),
            radius: 3.0,
            rotation: 0.0,
            life: BULLET_LIFE,
        });

        update_antibodies(&mut world);
        // steered downward toward the target
        assert!(world.antibodies[0].vel.y > 0.0);
        assert!((world.antibodies[0].vel.length() - BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn clearing_the_arena_advances_the_level() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        assert!(world.pathogens.is_empty());
        tick(&mut world, &TickInput::default());
        assert_eq!(world.level, 2);
        assert!(world.events.contains(&GameEvent::LevelClear));
        assert!(!world.pathogens.is_empty());
    }

    #[test]
    fn hull_depletion_ends_the_run() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        plant_virus(&mut world, Vec2::new(700.0, 500.0), 100.0);
        world.health = 0.0;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.events.contains(&GameEvent::GameOver));

        // a finished world no longer advances
        let ticks = world.ticks;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.ticks, ticks);
    }

    #[test]
    fn thrust_events_are_edge_triggered() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        plant_virus(&mut world, Vec2::new(700.0, 500.0), 100.0);
        let on = TickInput {
            thrust: true,
            ..TickInput::default()
        };
        tick(&mut world, &on);
        tick(&mut world, &on);
        tick(&mut world, &on);
        let starts = world
            .events
            .iter()
            .filter(|e| **e == GameEvent::ThrustStart)
            .count();
        assert_eq!(starts, 1);

        tick(&mut world, &TickInput::default());
        assert!(world.events.contains(&GameEvent::ThrustStop));
    }

    #[test]
    fn joystick_overrides_heading_and_gates_thrust() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        plant_virus(&mut world, Vec2::new(700.0, 500.0), 100.0);

        let start = world.ship.rotation;
        let deflected = TickInput {
            joystick: Some(Joystick {
                angle: 1.0,
                magnitude: 0.9,
            }),
            ..TickInput::default()
        };
        tick(&mut world, &deflected);
        // smoothed seek: closer to the stick angle, not snapped onto it
        assert!((world.ship.rotation - 1.0).abs() < (start - 1.0).abs());
        assert_ne!(world.ship.rotation, 1.0);
        assert!(world.ship.thrusting);

        // a light deflection still steers but is not enough to thrust
        let before = world.ship.rotation;
        let light = TickInput {
            joystick: Some(Joystick {
                angle: 2.5,
                magnitude: 0.3,
            }),
            ..TickInput::default()
        };
        tick(&mut world, &light);
        assert!((world.ship.rotation - 2.5).abs() < (before - 2.5).abs());
        assert!(!world.ship.thrusting);

        // once the heading is inside the angular dead zone it stops seeking
        world.ship.rotation = 2.5 + 0.03;
        let held = world.ship.rotation;
        tick(&mut world, &light);
        assert_eq!(world.ship.rotation, held);
        assert!(!world.ship.thrusting);
    }

    #[test]
    fn shake_decays_geometrically_and_flash_linearly() {
        let mut world = world_with(GameMode::Endless, GameModifiers::default());
        world.shake = 10.0;
        world.flash = 3.0;
        decay_feedback(&mut world);
        assert!((world.shake - 9.0).abs() < 1e-5);
        assert_eq!(world.flash, 2.0);
        for _ in 0..200 {
            decay_feedback(&mut world);
        }
        assert_eq!(world.shake, 0.0);
        assert_eq!(world.flash, 0.0);
    }

    #[test]
    fn regeneration_heals_on_interval() {
        let mut mods = GameModifiers::default();
        mods.regeneration = true;
        let mut world = world_with(GameMode::Endless, mods);
        world.health = 50.0;
        for _ in 0..REGEN_INTERVAL {
            apply_regeneration(&mut world);
        }
        assert_eq!(world.health, 50.0 + REGEN_AMOUNT);
    }
}
