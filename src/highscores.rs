//! Run leaderboard
//!
//! In-memory only; the best ten finished runs of this session, best first.

use serde::{Deserialize, Serialize};

/// Runs kept on the board
pub const LEADERBOARD_SIZE: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    /// Units travelled before the run ended
    pub distance: f32,
    /// Preset level index reached, `None` for endless runs
    pub level: Option<usize>,
    pub seed: u64,
}

/// Finished runs, best score first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<RunRecord>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries sorted by score, best first
    pub fn entries(&self) -> &[RunRecord] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the board, 0 when empty
    pub fn high_score(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }

    /// Whether `score` would earn a place
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < LEADERBOARD_SIZE || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Insert a finished run; returns its 1-based rank if it made the board
    ///
    /// Ties keep the earlier run ahead.
    pub fn record(&mut self, run: RunRecord) -> Option<usize> {
        if !self.qualifies(run.score) {
            return None;
        }
        let index = self
            .entries
            .iter()
            .position(|e| run.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, run);
        self.entries.truncate(LEADERBOARD_SIZE);
        Some(index + 1)
    }
}
