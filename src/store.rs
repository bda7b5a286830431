use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Puzzle;

/// In-memory holding area for generated puzzles, keyed by puzzle id.
/// Entries live until the background sweep removes them.
#[derive(Default)]
pub struct PuzzleStore {
    puzzles: DashMap<Uuid, Puzzle>,
}

impl PuzzleStore {
    pub fn new() -> Self {
        Self {
            puzzles: DashMap::new(),
        }
    }

    pub fn insert(&self, puzzle: Puzzle) {
        self.puzzles.insert(puzzle.puzzle_id, puzzle);
    }

    pub fn get(&self, puzzle_id: &Uuid) -> Option<Puzzle> {
        self.puzzles.get(puzzle_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Drop puzzles older than `ttl_secs`, returning how many were removed
    pub fn remove_expired(&self, ttl_secs: u64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(ttl_secs as i64);
        let expired: Vec<Uuid> = self
            .puzzles
            .iter()
            .filter(|entry| entry.created_at < cutoff)
            .map(|entry| entry.puzzle_id)
            .collect();

        for puzzle_id in &expired {
            self.puzzles.remove(puzzle_id);
        }

        expired.len()
    }
}
