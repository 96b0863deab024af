//! Deterministic arena simulation
//!
//! Fixed-timestep (60 ticks/second) game logic with no rendering, audio, or
//! platform dependencies. The host drives [`tick::tick`] with sampled input,
//! renders from [`state::World::snapshot`], and drains
//! [`state::GameEvent`]s for sound and haptics. Runs with the same seed,
//! config, and input sequence are bit-identical.

pub mod boss;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{
    GameEvent, GameMode, GamePhase, Pathogen, PathogenKind, Snapshot, World, WorldConfig,
};
pub use tick::{Joystick, TickInput};
