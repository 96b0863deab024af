//! Local top-scores list
//!
//! A ten-entry leaderboard persisted as a JSON array through the host's
//! [`KeyValueStore`]. Dates are host-supplied strings; the engine keeps no
//! clock of its own.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, SCORES_KEY};

pub const MAX_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub score: u64,
    pub level: u32,
    pub date: String,
}

/// Load the leaderboard, best first. Missing or corrupt storage yields an
/// empty list.
pub fn load_top_scores(store: &dyn KeyValueStore) -> Vec<ScoreEntry> {
    persistence::load_or_default(store, SCORES_KEY)
}

/// Insert a finished run into the leaderboard and persist it. The list is
/// re-sorted best first and trimmed to [`MAX_SCORES`]. Returns the entry's
/// position (0-based) when it made the cut.
pub fn save_top_score(
    store: &mut dyn KeyValueStore,
    score: u64,
    level: u32,
    date: &str,
) -> Option<usize> {
    let mut scores = load_top_scores(store);
    let entry = ScoreEntry {
        score,
        level,
        date: date.to_string(),
    };
    scores.push(entry.clone());
    // stable sort keeps earlier runs ahead of a tying new entry
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(MAX_SCORES);
    persistence::save(store, SCORES_KEY, &scores);
    scores.iter().position(|e| *e == entry)
}
