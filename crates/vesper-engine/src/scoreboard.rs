//! Where finished runs are reported.
//!
//! The core only needs somewhere to send `(name, elapsed, score)`;
//! persistence belongs to the host. [`MemoryScoreboard`] keeps entries in
//! memory, which is enough for tests and single-process games.

use serde::{Deserialize, Serialize};
use tracing::info;

/// One finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    /// Simulated seconds across every level of the run.
    pub elapsed_playtime: f64,
    pub score: u64,
}

/// Receives finished runs.
pub trait Scoreboard {
    fn submit(&mut self, entry: ScoreEntry);

    /// Entries, best first.
    fn entries(&self) -> &[ScoreEntry];

    /// The best `n` entries.
    fn top(&self, n: usize) -> &[ScoreEntry] {
        let entries = self.entries();
        &entries[..n.min(entries.len())]
    }
}

/// In-memory scoreboard ordered by score (descending), then playtime
/// (ascending). Equal entries keep submission order.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreboard {
    entries: Vec<ScoreEntry>,
}

impl MemoryScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Scoreboard for MemoryScoreboard {
    fn submit(&mut self, entry: ScoreEntry) {
        info!(name = %entry.name, score = entry.score, elapsed = entry.elapsed_playtime, "score submitted");
        let index = self.entries.partition_point(|existing| {
            existing.score > entry.score
                || (existing.score == entry.score && existing.elapsed_playtime <= entry.elapsed_playtime)
        });
        self.entries.insert(index, entry);
    }

    fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, elapsed_playtime: f64, score: u64) -> ScoreEntry {
        ScoreEntry {
            name: name.into(),
            elapsed_playtime,
            score,
        }
    }

    #[test]
    fn orders_by_score_then_time() {
        let mut board = MemoryScoreboard::new();
        board.submit(entry("slow", 90.0, 300));
        board.submit(entry("low", 10.0, 100));
        board.submit(entry("fast", 45.0, 300));
        board.submit(entry("tie", 45.0, 300));

        let names: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["fast", "tie", "slow", "low"]);
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(10).len(), 4);
    }
}
