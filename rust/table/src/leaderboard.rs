use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// A player's best chip count so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub avatar: String,
    pub best_chips: u32,
    /// RFC3339 time the best was reached
    pub achieved_at: String,
}

/// Personal-best chip totals, keyed by display name
#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: RwLock<HashMap<String, LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a chip total; returns `true` when it is a new personal best
    pub fn record(&self, name: &str, avatar: &str, chips: u32) -> Result<bool, LeaderboardError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LeaderboardError::StoragePoisoned)?;
        let improved = entries
            .get(name)
            .is_none_or(|entry| chips > entry.best_chips);
        if improved {
            entries.insert(
                name.to_string(),
                LeaderboardEntry {
                    name: name.to_string(),
                    avatar: avatar.to_string(),
                    best_chips: chips,
                    achieved_at: chrono::Utc::now().to_rfc3339(),
                },
            );
            tracing::debug!(player = %name, chips, "new personal best");
        }
        Ok(improved)
    }

    pub fn get(&self, name: &str) -> Result<Option<LeaderboardEntry>, LeaderboardError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LeaderboardError::StoragePoisoned)?;
        Ok(entries.get(name).cloned())
    }

    /// Best totals first; ties ordered by name
    pub fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LeaderboardError::StoragePoisoned)?;
        let mut ranked: Vec<LeaderboardEntry> = entries.values().cloned().collect();
        ranked.sort_by(|a, b| b.best_chips.cmp(&a.best_chips).then_with(|| a.name.cmp(&b.name)));
        ranked.truncate(limit);
        Ok(ranked)
    }

    pub fn len(&self) -> Result<usize, LeaderboardError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LeaderboardError::StoragePoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, LeaderboardError> {
        self.len().map(|n| n == 0)
    }
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Leaderboard storage poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_best_total() {
        let board = Leaderboard::new();
        assert!(board.record("Ana", "😎", 1200).unwrap());
        assert!(!board.record("Ana", "😎", 900).unwrap());
        assert!(!board.record("Ana", "😎", 1200).unwrap());
        assert!(board.record("Ana", "😎", 1500).unwrap());
        assert_eq!(board.get("Ana").unwrap().unwrap().best_chips, 1500);
        assert_eq!(board.len().unwrap(), 1);
    }

    #[test]
    fn top_orders_by_chips_then_name() {
        let board = Leaderboard::new();
        board.record("Cy", "🎲", 800).unwrap();
        board.record("Ben", "🃏", 2000).unwrap();
        board.record("Ana", "😎", 800).unwrap();

        let names: Vec<String> = board.top(10).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Ben", "Ana", "Cy"]);
        assert_eq!(board.top(1).unwrap().len(), 1);
    }

    #[test]
    fn empty_board() {
        let board = Leaderboard::new();
        assert!(board.is_empty().unwrap());
        assert!(board.get("nobody").unwrap().is_none());
        assert!(board.top(5).unwrap().is_empty());
    }
}
