//! Persistent player progression
//!
//! XP, spendable immunity points, the five purchasable upgrades, and the
//! three cytokine abilities that unlock at fixed player levels. The profile
//! is a plain serde document persisted through [`crate::persistence`]; every
//! field defaults so documents written by older builds still load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, KeyValueStore, PROFILE_KEY};
use crate::sim::state::RunStats;

/// Cumulative XP required to reach each player level (index 0 is level 1)
pub const LEVEL_THRESHOLDS: [u64; 20] = [
    0, 200, 500, 1_000, 2_000, 3_500, 5_500, 8_000, 11_000, 15_000, 20_000, 26_000, 33_000,
    41_000, 50_000, 60_000, 72_000, 85_000, 100_000, 120_000,
];

/// Immunity-point cost to buy each successive upgrade rank
pub const UPGRADE_COSTS: [u64; 5] = [100, 250, 500, 1_000, 2_000];
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Player level for a cumulative XP total, saturating at 20
pub fn calc_player_level(total_xp: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&t| total_xp >= t)
        .map(|i| i as u32 + 1)
        .unwrap_or(1)
}

/// XP still needed for the next level; `None` at the cap
pub fn xp_to_next_level(total_xp: u64) -> Option<u64> {
    let level = calc_player_level(total_xp) as usize;
    LEVEL_THRESHOLDS.get(level).map(|&next| next - total_xp)
}

/// Progress through the current level as a percentage, 100 at the cap
pub fn xp_progress_percent(total_xp: u64) -> f32 {
    let level = calc_player_level(total_xp) as usize;
    let Some(&next) = LEVEL_THRESHOLDS.get(level) else {
        return 100.0;
    };
    let current = LEVEL_THRESHOLDS[level - 1];
    (total_xp - current) as f32 / (next - current) as f32 * 100.0
}

/// The five purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    MaxHealth,
    Thrust,
    BulletDamage,
    FireRate,
    ShieldDuration,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::MaxHealth,
        UpgradeKind::Thrust,
        UpgradeKind::BulletDamage,
        UpgradeKind::FireRate,
        UpgradeKind::ShieldDuration,
    ];

    /// Display name for the upgrade screen
    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::MaxHealth => "Hull Integrity",
            UpgradeKind::Thrust => "Thruster Power",
            UpgradeKind::BulletDamage => "Antibody Potency",
            UpgradeKind::FireRate => "Rapid Response",
            UpgradeKind::ShieldDuration => "Membrane Shield",
        }
    }
}

/// Passive abilities unlocked by player level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cytokine {
    AutoTarget,
    Regeneration,
    ChainReaction,
}

impl Cytokine {
    pub const ALL: [Cytokine; 3] = [
        Cytokine::AutoTarget,
        Cytokine::Regeneration,
        Cytokine::ChainReaction,
    ];

    pub fn unlock_level(self) -> u32 {
        match self {
            Cytokine::AutoTarget => 5,
            Cytokine::Regeneration => 10,
            Cytokine::ChainReaction => 15,
        }
    }

    pub fn unlocked_at(self, player_level: u32) -> bool {
        player_level >= self.unlock_level()
    }
}

/// Purchased rank per upgrade track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpgradeLevels {
    pub max_health: u8,
    pub thrust: u8,
    pub bullet_damage: u8,
    pub fire_rate: u8,
    pub shield_duration: u8,
}

impl UpgradeLevels {
    pub fn get(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::MaxHealth => self.max_health,
            UpgradeKind::Thrust => self.thrust,
            UpgradeKind::BulletDamage => self.bullet_damage,
            UpgradeKind::FireRate => self.fire_rate,
            UpgradeKind::ShieldDuration => self.shield_duration,
        }
    }

    fn get_mut(&mut self, kind: UpgradeKind) -> &mut u8 {
        match kind {
            UpgradeKind::MaxHealth => &mut self.max_health,
            UpgradeKind::Thrust => &mut self.thrust,
            UpgradeKind::BulletDamage => &mut self.bullet_damage,
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::ShieldDuration => &mut self.shield_duration,
        }
    }
}

/// Lifetime statistics across every run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifetimeStats {
    pub total_runs: u64,
    pub total_kills: u64,
    pub kills_by_type: HashMap<String, u64>,
    pub best_score: u64,
    pub best_level: u32,
    pub total_time_played_secs: u64,
}

/// The persisted profile document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProfile {
    pub total_xp: u64,
    pub immunity_points: u64,
    pub upgrades: UpgradeLevels,
    pub stats: LifetimeStats,
    pub campaign_level_reached: u32,
}

impl PlayerProfile {
    pub fn player_level(&self) -> u32 {
        calc_player_level(self.total_xp)
    }
}

/// Gameplay numbers derived from a profile, handed to the sim at run start
#[derive(Debug, Clone, PartialEq)]
pub struct GameModifiers {
    pub max_health: f32,
    pub thrust: f32,
    pub bullet_damage: f32,
    pub shot_delay_ms: f32,
    /// Shield power-up duration, in ticks
    pub shield_duration: u32,
    pub auto_target: bool,
    pub regeneration: bool,
    pub chain_reaction: bool,
}

impl Default for GameModifiers {
    fn default() -> Self {
        Self {
            max_health: BASE_MAX_HEALTH,
            thrust: SHIP_THRUST,
            bullet_damage: 1.0,
            shot_delay_ms: BASE_SHOT_DELAY_MS,
            shield_duration: POWERUP_DURATION,
            auto_target: false,
            regeneration: false,
            chain_reaction: false,
        }
    }
}

/// Derive a run's gameplay numbers from purchased upgrades and unlocked
/// cytokines
pub fn compute_modifiers(profile: &PlayerProfile) -> GameModifiers {
    let u = &profile.upgrades;
    let level = profile.player_level();
    GameModifiers {
        max_health: BASE_MAX_HEALTH + 20.0 * u.max_health as f32,
        thrust: SHIP_THRUST + 0.03 * u.thrust as f32,
        bullet_damage: 1.0 + 0.25 * u.bullet_damage as f32,
        shot_delay_ms: BASE_SHOT_DELAY_MS - 20.0 * u.fire_rate as f32,
        shield_duration: POWERUP_DURATION + 60 * u.shield_duration as u32,
        auto_target: Cytokine::AutoTarget.unlocked_at(level),
        regeneration: Cytokine::Regeneration.unlocked_at(level),
        chain_reaction: Cytokine::ChainReaction.unlocked_at(level),
    }
}

/// Cost of the next rank of an upgrade; `None` when maxed
pub fn get_upgrade_cost(profile: &PlayerProfile, kind: UpgradeKind) -> Option<u64> {
    let rank = profile.upgrades.get(kind);
    UPGRADE_COSTS.get(rank as usize).copied()
}

pub fn can_afford_upgrade(profile: &PlayerProfile, kind: UpgradeKind) -> bool {
    get_upgrade_cost(profile, kind).is_some_and(|cost| profile.immunity_points >= cost)
}

/// Buy the next rank, deducting its cost. Returns the rank reached, or
/// `None` when maxed or unaffordable.
pub fn purchase_upgrade(profile: &mut PlayerProfile, kind: UpgradeKind) -> Option<u8> {
    let cost = get_upgrade_cost(profile, kind)?;
    if profile.immunity_points < cost {
        return None;
    }
    profile.immunity_points -= cost;
    let rank = profile.upgrades.get_mut(kind);
    *rank += 1;
    Some(*rank)
}

/// Bank a finished run's score as XP and currency. Returns cytokines that
/// this award newly unlocked.
pub fn award_xp(profile: &mut PlayerProfile, xp: u64) -> Vec<Cytokine> {
    let before = profile.player_level();
    profile.total_xp += xp;
    profile.immunity_points += xp;
    let after = profile.player_level();
    Cytokine::ALL
        .into_iter()
        .filter(|c| !c.unlocked_at(before) && c.unlocked_at(after))
        .collect()
}

/// Fold a finished run into the lifetime statistics
pub fn record_run_stats(
    profile: &mut PlayerProfile,
    stats: &RunStats,
    score: u64,
    level_reached: u32,
) {
    let s = &mut profile.stats;
    s.total_runs += 1;
    s.total_kills += stats.kills;
    for (species, n) in &stats.kills_by_type {
        *s.kills_by_type.entry((*species).to_string()).or_insert(0) += n;
    }
    s.best_score = s.best_score.max(score);
    s.best_level = s.best_level.max(level_reached);
    s.total_time_played_secs += stats.time_played_ticks / FPS as u64;
}

/// Wipe the profile back to a fresh one, both in memory and in storage
pub fn reset_profile(store: &mut dyn KeyValueStore) -> PlayerProfile {
    store.remove(PROFILE_KEY);
    PlayerProfile::default()
}

pub fn load_profile(store: &dyn KeyValueStore) -> PlayerProfile {
    persistence::load_or_default(store, PROFILE_KEY)
}

pub fn save_profile(store: &mut dyn KeyValueStore, profile: &PlayerProfile) {
    persistence::save(store, PROFILE_KEY, profile);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn level_curve_brackets() {
        assert_eq!(calc_player_level(0), 1);
        assert_eq!(calc_player_level(199), 1);
        assert_eq!(calc_player_level(200), 2);
        assert_eq!(calc_player_level(499), 2);
        assert_eq!(calc_player_level(500), 3);
        assert_eq!(calc_player_level(2_000), 5);
        assert_eq!(calc_player_level(120_000), 20);
        assert_eq!(calc_player_level(u64::MAX), 20);
    }

    #[test]
    fn xp_to_next_counts_down_and_caps() {
        assert_eq!(xp_to_next_level(0), Some(200));
        assert_eq!(xp_to_next_level(150), Some(50));
        assert_eq!(xp_to_next_level(200), Some(300));
        assert_eq!(xp_to_next_level(120_000), None);
    }

    #[test]
    fn progress_percent_spans_the_bracket() {
        assert_eq!(xp_progress_percent(0), 0.0);
        assert_eq!(xp_progress_percent(100), 50.0);
        assert_eq!(xp_progress_percent(200), 0.0);
        assert_eq!(xp_progress_percent(120_000), 100.0);
    }

    #[test]
    fn upgrade_cost_ladder() {
        let mut profile = PlayerProfile::default();
        assert_eq!(get_upgrade_cost(&profile, UpgradeKind::Thrust), Some(100));
        profile.upgrades.thrust = 4;
        assert_eq!(get_upgrade_cost(&profile, UpgradeKind::Thrust), Some(2_000));
        profile.upgrades.thrust = MAX_UPGRADE_LEVEL;
        assert_eq!(get_upgrade_cost(&profile, UpgradeKind::Thrust), None);
    }

    #[test]
    fn purchase_deducts_and_ranks_up() {
        let mut profile = PlayerProfile {
            immunity_points: 350,
            ..PlayerProfile::default()
        };
        assert!(can_afford_upgrade(&profile, UpgradeKind::MaxHealth));
        assert_eq!(purchase_upgrade(&mut profile, UpgradeKind::MaxHealth), Some(1));
        assert_eq!(profile.immunity_points, 250);
        assert_eq!(purchase_upgrade(&mut profile, UpgradeKind::MaxHealth), Some(2));
        assert_eq!(profile.immunity_points, 0);
        // broke now
        assert_eq!(purchase_upgrade(&mut profile, UpgradeKind::MaxHealth), None);
    }

    #[test]
    fn purchase_refused_at_max_rank() {
        let mut profile = PlayerProfile {
            immunity_points: 1_000_000,
            ..PlayerProfile::default()
        };
        for rank in 1..=MAX_UPGRADE_LEVEL {
            assert_eq!(
                purchase_upgrade(&mut profile, UpgradeKind::FireRate),
                Some(rank)
            );
        }
        assert_eq!(purchase_upgrade(&mut profile, UpgradeKind::FireRate), None);
    }

    #[test]
    fn modifiers_scale_with_ranks() {
        let mut profile = PlayerProfile::default();
        assert_eq!(compute_modifiers(&profile), GameModifiers::default());

        profile.upgrades = UpgradeLevels {
            max_health: 3,
            thrust: 2,
            bullet_damage: 4,
            fire_rate: 5,
            shield_duration: 1,
        };
        let mods = compute_modifiers(&profile);
        assert_eq!(mods.max_health, 160.0);
        assert!((mods.thrust - 0.21).abs() < 1e-6);
        assert_eq!(mods.bullet_damage, 2.0);
        assert_eq!(mods.shot_delay_ms, 100.0);
        assert_eq!(mods.shield_duration, 360);
    }

    #[test]
    fn cytokines_unlock_at_their_levels() {
        let mut profile = PlayerProfile::default();
        // level 4 -> 5 crosses the auto-target unlock
        profile.total_xp = 1_999;
        let unlocked = award_xp(&mut profile, 1);
        assert_eq!(unlocked, vec![Cytokine::AutoTarget]);
        assert!(compute_modifiers(&profile).auto_target);
        assert!(!compute_modifiers(&profile).regeneration);

        // one huge award can unlock several at once
        let unlocked = award_xp(&mut profile, 1_000_000);
        assert_eq!(
            unlocked,
            vec![Cytokine::Regeneration, Cytokine::ChainReaction]
        );
    }

    #[test]
    fn award_banks_currency_too() {
        let mut profile = PlayerProfile::default();
        award_xp(&mut profile, 500);
        assert_eq!(profile.total_xp, 500);
        assert_eq!(profile.immunity_points, 500);
    }

    #[test]
    fn run_stats_fold_into_lifetime_totals() {
        let mut profile = PlayerProfile::default();
        let mut stats = RunStats::default();
        stats.record_kill("virus");
        stats.record_kill("virus");
        stats.record_kill("fungus");
        stats.time_played_ticks = 3_600;

        record_run_stats(&mut profile, &stats, 4_200, 7);
        record_run_stats(&mut profile, &stats, 1_000, 3);

        assert_eq!(profile.stats.total_runs, 2);
        assert_eq!(profile.stats.total_kills, 6);
        assert_eq!(profile.stats.kills_by_type.get("virus"), Some(&4));
        assert_eq!(profile.stats.best_score, 4_200);
        assert_eq!(profile.stats.best_level, 7);
        assert_eq!(profile.stats.total_time_played_secs, 120);
    }

    #[test]
    fn profile_round_trips_camel_case() {
        let mut store = MemoryStore::new();
        let mut profile = PlayerProfile::default();
        profile.total_xp = 777;
        profile.upgrades.bullet_damage = 2;
        save_profile(&mut store, &profile);

        let raw = store.get(PROFILE_KEY).unwrap();
        assert!(raw.contains("totalXp"));
        assert!(raw.contains("bulletDamage"));
        assert_eq!(load_profile(&store), profile);
    }

    #[test]
    fn older_documents_decode_with_defaults() {
        let mut store = MemoryStore::new();
        store.set(PROFILE_KEY, r#"{"totalXp": 600}"#);
        let profile = load_profile(&store);
        assert_eq!(profile.total_xp, 600);
        assert_eq!(profile.upgrades, UpgradeLevels::default());
        assert_eq!(profile.player_level(), 3);
    }

    #[test]
    fn reset_clears_storage_and_memory() {
        let mut store = MemoryStore::new();
        let mut profile = PlayerProfile::default();
        award_xp(&mut profile, 9_000);
        save_profile(&mut store, &profile);

        let fresh = reset_profile(&mut store);
        assert_eq!(fresh, PlayerProfile::default());
        assert!(store.get(PROFILE_KEY).is_none());
    }
}
