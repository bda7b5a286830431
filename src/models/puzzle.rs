use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single cell coordinate on the puzzle grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Reading direction of a placed word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

impl Direction {
    /// Fixed round-robin order used by the placement search
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// (row, col) step applied once per letter
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }
}

/// A word that was successfully written onto the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub start_pos: Position,
    pub end_pos: Position,
    pub direction: Direction,
    /// One coordinate per letter, ordered from start to end
    pub cells: Vec<Position>,
}

pub type Grid = Vec<Vec<char>>;

/// Outcome of one full placement run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub grid: Grid,
    pub placed_words: Vec<PlacedWord>,
    pub failed_words: Vec<String>,
    /// True only when every requested word was placed
    pub success: bool,
}

/// A generated puzzle as stored in memory and served over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub puzzle_id: Uuid,
    pub grid_size: usize,
    pub seed: Option<String>,
    pub grid: Grid,
    pub placed_words: Vec<PlacedWord>,
    pub failed_words: Vec<String>,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}
