//! Top-N result table, persisted as a JSON file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use rangefire_core::state::MatchSummary;

/// Entries kept on the board.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: i64,
    pub accuracy_percent: u32,
    pub total_hits: u32,
}

impl LeaderboardEntry {
    pub fn from_summary(player_name: impl Into<String>, summary: &MatchSummary) -> Self {
        Self {
            player_name: player_name.into(),
            score: summary.score,
            accuracy_percent: summary.accuracy_percent,
            total_hits: summary.total_hits,
        }
    }
}

/// Ranked by score, ties broken by hits. Earlier entries win remaining ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Read a board from disk. A missing file is an empty board.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading leaderboard {}", path.display()))?;
        let mut board: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing leaderboard {}", path.display()))?;
        board.rank();
        Ok(board)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing leaderboard {}", path.display()))
    }

    /// Insert a result. Returns its 1-based rank, or `None` if it did not
    /// make the cut.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| ranks_below(e, &entry))
            .unwrap_or(self.entries.len());
        if rank >= LEADERBOARD_SIZE {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(LEADERBOARD_SIZE);
        Some(rank + 1)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn high_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    fn rank(&mut self) {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(b.total_hits.cmp(&a.total_hits)));
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}

/// True when `existing` should sit below `new`.
fn ranks_below(existing: &LeaderboardEntry, new: &LeaderboardEntry) -> bool {
    (new.score, new.total_hits) > (existing.score, existing.total_hits)
}
