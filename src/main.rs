//! Headless demo run
//!
//! Drives the simulation with a scripted pilot for up to two minutes,
//! then banks the run into an in-memory profile and leaderboard and logs
//! the results. Useful for profiling the tick loop and for eyeballing
//! balance changes without a renderer.

use cytoscape::consts::FPS;
use cytoscape::persistence::MemoryStore;
use cytoscape::progression::{
    award_xp, compute_modifiers, load_profile, record_run_stats, save_profile,
};
use cytoscape::sim::state::{GameMode, GamePhase, WorldConfig};
use cytoscape::sim::tick::{tick, TickInput};
use cytoscape::sim::World;
use cytoscape::{load_top_scores, save_top_score};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC1705CA9);

    let mut store = MemoryStore::new();
    let mut profile = load_profile(&store);
    let mods = compute_modifiers(&profile);

    log::info!("starting endless run, seed {seed}");
    let mut world = World::new(WorldConfig {
        width: 1280.0,
        height: 720.0,
        mode: GameMode::Endless,
        seed,
        mods,
    });

    // scripted pilot: spin slowly, thrust in bursts, fire constantly
    let max_ticks = 120 * FPS as u64;
    for t in 0..max_ticks {
        let input = TickInput {
            right: t % 7 != 0,
            thrust: (t / 30) % 2 == 0,
            fire: true,
            ..TickInput::default()
        };
        tick(&mut world, &input);
        world.drain_events();
        if t % (30 * FPS as u64) == 0 {
            let snap = world.snapshot();
            log::debug!(
                "t={t}: level {}, score {}, hull {:.0}/{:.0}, {} hostiles",
                snap.level,
                snap.score,
                snap.health,
                snap.max_health,
                snap.pathogens.len()
            );
        }
        if world.phase != GamePhase::Playing {
            break;
        }
    }

    log::info!(
        "run over after {:.1}s: score {}, level {}, kills {}",
        world.ticks as f32 / FPS as f32,
        world.score,
        world.level,
        world.stats.kills
    );

    let unlocked = award_xp(&mut profile, world.score);
    for c in unlocked {
        log::info!("unlocked cytokine: {c:?}");
    }
    record_run_stats(&mut profile, &world.stats, world.score, world.level);
    save_profile(&mut store, &profile);
    save_top_score(&mut store, world.score, world.level, "2026-08-30");

    log::info!(
        "profile: level {}, {} xp, {} points banked",
        profile.player_level(),
        profile.total_xp,
        profile.immunity_points
    );
    for (i, entry) in load_top_scores(&store).iter().enumerate() {
        log::info!("  #{} {} (level {})", i + 1, entry.score, entry.level);
    }
}
