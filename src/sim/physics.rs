//! Physics primitives
//!
//! Pure, stateless helpers over `Vec2` used by the spawner and the per-tick
//! resolver. The arena is toroidal: positions wrap at the edges, optionally
//! padded by a margin so large entities only wrap once fully offscreen.

use glam::Vec2;
use rand::Rng;

/// Uniform sample in `[min, max)`. Unlike `Rng::random_range` this accepts an
/// empty range and returns `min`, which spawn code relies on.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Strict circle overlap test: circles that exactly touch do not collide.
#[inline]
pub fn circles_collide(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    distance(a_pos, b_pos) < a_radius + b_radius
}

/// Wrap a position into the toroidal arena. `margin` extends the wrap
/// boundary past the edges.
pub fn wrap_position(pos: &mut Vec2, width: f32, height: f32, margin: f32) {
    if pos.x < -margin {
        pos.x = width + margin;
    }
    if pos.x > width + margin {
        pos.x = -margin;
    }
    if pos.y < -margin {
        pos.y = height + margin;
    }
    if pos.y > height + margin {
        pos.y = -margin;
    }
}

/// Integrate one tick of velocity into a position
#[inline]
pub fn apply_velocity(pos: &mut Vec2, vel: Vec2) {
    *pos += vel;
}

/// Multiplicative drag, applied once per tick (not time-scaled)
#[inline]
pub fn apply_friction(vel: &mut Vec2, factor: f32) {
    *vel *= factor;
}

/// Heading from one point to another
#[inline]
pub fn angle_to_target(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Magnitude of a velocity
#[inline]
pub fn speed(vel: Vec2) -> f32 {
    vel.length()
}

/// Rotate `current` toward `target` by at most `max_step` radians, taking
/// the short way around the circle
pub fn steer_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let mut diff = target - current;
    while diff > std::f32::consts::PI {
        diff -= std::f32::consts::TAU;
    }
    while diff < -std::f32::consts::PI {
        diff += std::f32::consts::TAU;
    }
    current + diff.clamp(-max_step, max_step)
}

/// Rescale a velocity to `max` magnitude when it exceeds it, preserving
/// direction. Velocities at or below `max` are untouched.
pub fn clamp_speed(vel: &mut Vec2, max: f32) {
    let s = speed(*vel);
    if s > max {
        *vel = *vel / s * max;
    }
}
