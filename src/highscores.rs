//! High score table
//!
//! Top three scores, persisted as a JSON array of three integers under
//! [`HighScores::STORAGE_KEY`].

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StorageError};

/// Number of high scores kept
pub const MAX_HIGH_SCORES: usize = 3;

/// Top scores, always three entries, sorted descending, zero-padded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct HighScores {
    scores: [u64; MAX_HIGH_SCORES],
}

impl From<Vec<u64>> for HighScores {
    fn from(stored: Vec<u64>) -> Self {
        Self::from_stored(stored)
    }
}

impl From<HighScores> for Vec<u64> {
    fn from(table: HighScores) -> Self {
        table.scores.to_vec()
    }
}

impl HighScores {
    pub const STORAGE_KEY: &'static str = "basket_catch_highscores";

    /// Empty table (`[0, 0, 0]`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from whatever was stored, restoring the invariant
    pub fn from_stored(mut stored: Vec<u64>) -> Self {
        stored.sort_unstable_by(|a, b| b.cmp(a));
        let mut scores = [0; MAX_HIGH_SCORES];
        for (slot, score) in scores.iter_mut().zip(stored) {
            *slot = score;
        }
        Self { scores }
    }

    pub fn scores(&self) -> &[u64; MAX_HIGH_SCORES] {
        &self.scores
    }

    pub fn top_score(&self) -> u64 {
        self.scores[0]
    }

    /// Check if a score would enter the table (strictly beats an entry)
    pub fn qualifies(&self, score: u64) -> bool {
        self.scores.iter().any(|&entry| score > entry)
    }

    /// Insert `score` before the first entry it beats, dropping the last.
    /// Returns whether the table changed. Ties never qualify.
    pub fn record_if_high_score(&mut self, score: u64) -> bool {
        let Some(pos) = self.scores.iter().position(|&entry| score > entry) else {
            return false;
        };
        self.scores[pos..].rotate_right(1);
        self.scores[pos] = score;
        true
    }

    /// Scoreboard lines, e.g. `"1. 300"`; empty slots read `"Anonymous: 0"`
    pub fn display_lines(&self) -> Vec<String> {
        self.scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                if score > 0 {
                    format!("{}. {}", i + 1, score)
                } else {
                    format!("{}. Anonymous: 0", i + 1)
                }
            })
            .collect()
    }

    /// Load from storage; absent or unreadable data yields an empty table
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded high scores {:?}", scores.scores);
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(err) => {
                log::warn!("Ignoring stored high scores: {}", err);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved {:?}", self.scores);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn table(scores: [u64; 3]) -> HighScores {
        HighScores::from_stored(scores.to_vec())
    }

    #[test]
    fn test_insert_reorders() {
        let mut scores = table([300, 200, 100]);
        assert!(scores.record_if_high_score(250));
        assert_eq!(scores.scores(), &[300, 250, 200]);
    }

    #[test]
    fn test_losing_score_is_idempotent() {
        let mut scores = table([300, 200, 100]);
        assert!(!scores.record_if_high_score(50));
        assert!(!scores.record_if_high_score(50));
        assert_eq!(scores.scores(), &[300, 200, 100]);
    }

    #[test]
    fn test_ties_do_not_qualify() {
        let mut scores = table([300, 200, 100]);
        assert!(!scores.record_if_high_score(100));
        assert!(scores.record_if_high_score(200 + 1));
        assert_eq!(scores.scores(), &[300, 201, 200]);
        assert!(!scores.qualifies(200));
    }

    #[test]
    fn test_new_top_score() {
        let mut scores = HighScores::new();
        assert!(scores.record_if_high_score(10));
        assert!(scores.record_if_high_score(500));
        assert_eq!(scores.scores(), &[500, 10, 0]);
        assert_eq!(scores.top_score(), 500);
    }

    #[test]
    fn test_zero_never_qualifies_on_empty_table() {
        let mut scores = HighScores::new();
        assert!(!scores.record_if_high_score(0));
    }

    #[test]
    fn test_from_stored_normalizes() {
        assert_eq!(HighScores::from_stored(vec![]).scores(), &[0, 0, 0]);
        assert_eq!(
            HighScores::from_stored(vec![5, 40, 10, 90, 1]).scores(),
            &[90, 40, 10]
        );
        assert_eq!(HighScores::from_stored(vec![7]).scores(), &[7, 0, 0]);
    }

    #[test]
    fn test_display_lines() {
        let scores = table([300, 0, 0]);
        assert_eq!(
            scores.display_lines(),
            vec!["1. 300", "2. Anonymous: 0", "3. Anonymous: 0"]
        );
    }

    #[test]
    fn test_load_defaults_when_missing_or_corrupt() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScores::load(&store), HighScores::new());

        let _ = store.set(HighScores::STORAGE_KEY, "{broken");
        assert_eq!(HighScores::load(&store), HighScores::new());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let scores = table([120, 80, 30]);
        assert!(scores.save(&mut store).is_ok());
        assert_eq!(
            store.get(HighScores::STORAGE_KEY).ok().flatten().as_deref(),
            Some("[120,80,30]")
        );
        assert_eq!(HighScores::load(&store), scores);
    }

    proptest! {
        #[test]
        fn table_stays_sorted_and_full(submissions in proptest::collection::vec(0u64..10_000, 0..50)) {
            let mut scores = HighScores::new();
            for score in submissions {
                let before = scores;
                let qualified = scores.record_if_high_score(score);
                prop_assert_eq!(qualified, before != scores);
                prop_assert_eq!(qualified, before.qualifies(score));
                let s = scores.scores();
                prop_assert!(s[0] >= s[1] && s[1] >= s[2]);
            }
        }
    }
}
