use crate::models::{Direction, Grid, PlacedWord, PlacementResult, Position};
use crate::utils::letters;

use super::rng::{self, RandomSource};
use super::validator::PlacementValidator;

/// Cell value for a grid slot no word has claimed yet
pub const EMPTY_CELL: char = ' ';

/// Full restart passes over the whole word list
const MAX_PASSES: usize = 3;
/// Placement attempts per word within one pass
const MAX_ATTEMPTS_PER_WORD: usize = 2000;
/// Random candidate starts probed per attempt
const CANDIDATES_PER_ATTEMPT: usize = 100;
/// A pass is accepted once this fraction of words is placed
const ACCEPT_RATIO: f64 = 0.9;
/// Fraction of a word's letters allowed to conflict in the overlap fallback
const OVERLAP_BUDGET: f64 = 0.3;

/// Fatal engine errors.
///
/// Ordinary placement failure is reported through
/// `PlacementResult::failed_words`, never through this type. The search
/// bounds make an out-of-grid commit unreachable; seeing one means a bug.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("placement of {word:?} escaped the {grid_size}x{grid_size} grid at ({row}, {col})")]
    OutOfBounds {
        word: String,
        row: isize,
        col: isize,
        grid_size: usize,
    },
}

/// Inclusive start-position ranges for one word length and direction
struct StartBounds {
    row_min: usize,
    row_max: usize,
    col_min: usize,
    col_max: usize,
}

/// Places a list of words onto a square letter grid.
///
/// Words are laid along one of four directions and may cross where their
/// letters agree. When a seed is supplied, two engines given the same word
/// list produce identical grids.
pub struct WordPlacementEngine {
    grid_size: usize,
    grid: Grid,
    placed_words: Vec<PlacedWord>,
    random: RandomSource,
}

impl WordPlacementEngine {
    pub fn new(grid_size: usize) -> Self {
        Self::with_random_source(grid_size, rng::thread_source())
    }

    pub fn with_seed(grid_size: usize, seed: &str) -> Self {
        Self::with_random_source(grid_size, rng::seeded_source(seed))
    }

    /// Construct with an explicit random source (tests substitute a fixed
    /// sequence here)
    pub fn with_random_source(grid_size: usize, random: RandomSource) -> Self {
        Self {
            grid_size,
            grid: vec![vec![EMPTY_CELL; grid_size]; grid_size],
            placed_words: Vec::new(),
            random,
        }
    }

    /// Place every word onto a fresh grid and fill the leftover cells.
    ///
    /// Runs up to three full passes; a pass restarts from an empty grid
    /// because word order interacts with random placement, so a clean
    /// retry can succeed where the previous pass failed. Words that
    /// cannot be placed are reported in `failed_words`, not as errors.
    pub fn place_words(&mut self, words: &[String]) -> Result<PlacementResult, PlacementError> {
        self.reset();

        if words.is_empty() {
            return Ok(PlacementResult {
                grid: self.grid.clone(),
                placed_words: Vec::new(),
                failed_words: Vec::new(),
                success: false,
            });
        }

        // Longest first: long words claim space while options are plentiful
        let mut ordered: Vec<String> = words.to_vec();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut failed_words = Vec::new();

        for pass in 0..MAX_PASSES {
            self.reset();
            failed_words.clear();

            for raw in &ordered {
                let word = letters::normalize_word(raw);
                if word.is_empty() || word.chars().count() > self.grid_size {
                    failed_words.push(word);
                    continue;
                }
                if !self.place_word_with_retry(&word)? {
                    failed_words.push(word);
                }
            }

            let placed_ratio = self.placed_words.len() as f64 / ordered.len() as f64;
            if failed_words.is_empty() || placed_ratio >= ACCEPT_RATIO {
                break;
            }
            if pass + 1 < MAX_PASSES {
                tracing::debug!(
                    "placement pass {} left {} of {} words unplaced, restarting",
                    pass + 1,
                    failed_words.len(),
                    ordered.len()
                );
            }
        }

        self.fill_empty_cells();

        Ok(PlacementResult {
            grid: self.grid.clone(),
            placed_words: self.placed_words.clone(),
            success: failed_words.is_empty(),
            failed_words,
        })
    }

    /// Check the engine's current grid against a requested word list:
    /// every word must appear among the placed words, and every placed
    /// word must read back off the grid exactly.
    pub fn validate_placement(&self, words: &[String]) -> bool {
        PlacementValidator::validate(&self.grid, &self.placed_words, words)
    }

    fn reset(&mut self) {
        for row in self.grid.iter_mut() {
            row.fill(EMPTY_CELL);
        }
        self.placed_words.clear();
    }

    /// Search for a spot for one word.
    ///
    /// Directions rotate in fixed round-robin order so the four
    /// directions get roughly even coverage. Each attempt probes random
    /// starts under the exact-match rule; every hundredth attempt falls
    /// back to an exhaustive overlap-tolerant scan in the direction that
    /// attempt happened to land on.
    fn place_word_with_retry(&mut self, word: &str) -> Result<bool, PlacementError> {
        let len = word.chars().count();

        for attempt in 0..MAX_ATTEMPTS_PER_WORD {
            let direction = Direction::ALL[attempt % Direction::ALL.len()];

            let Some(bounds) = self.start_bounds(len, direction) else {
                continue;
            };

            for _ in 0..CANDIDATES_PER_ATTEMPT {
                let start = self.random_start(&bounds);
                if self.fits_at(word, start, direction) {
                    self.commit(word, start, direction)?;
                    return Ok(true);
                }
            }

            if attempt > 0
                && attempt % 100 == 0
                && self.try_place_word_with_overlap(word, direction)?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Raster-scan fallback that tolerates up to `floor(0.3 * len)`
    /// conflicting letters. Scans row-major and commits the first start
    /// whose conflict count stays within budget.
    fn try_place_word_with_overlap(
        &mut self,
        word: &str,
        direction: Direction,
    ) -> Result<bool, PlacementError> {
        let len = word.chars().count();
        let Some(bounds) = self.start_bounds(len, direction) else {
            return Ok(false);
        };

        let max_overlap = (OVERLAP_BUDGET * len as f64).floor() as usize;
        let (d_row, d_col) = direction.delta();

        for row in bounds.row_min..=bounds.row_max {
            for col in bounds.col_min..=bounds.col_max {
                let mut overlap = 0usize;
                for (i, letter) in word.chars().enumerate() {
                    let r = (row as isize + d_row * i as isize) as usize;
                    let c = (col as isize + d_col * i as isize) as usize;
                    let cell = self.grid[r][c];
                    if cell != EMPTY_CELL && cell != letter {
                        overlap += 1;
                    }
                }
                if overlap <= max_overlap {
                    self.commit(word, Position { row, col }, direction)?;
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Inclusive start ranges that keep the whole word inside the grid,
    /// or None when the word cannot fit along this direction at all
    fn start_bounds(&self, len: usize, direction: Direction) -> Option<StartBounds> {
        let n = self.grid_size;
        if len == 0 || len > n {
            return None;
        }
        let max_start = n - len;

        let bounds = match direction {
            Direction::Horizontal => StartBounds {
                row_min: 0,
                row_max: n - 1,
                col_min: 0,
                col_max: max_start,
            },
            Direction::Vertical => StartBounds {
                row_min: 0,
                row_max: max_start,
                col_min: 0,
                col_max: n - 1,
            },
            Direction::DiagonalDown => StartBounds {
                row_min: 0,
                row_max: max_start,
                col_min: 0,
                col_max: max_start,
            },
            // Ascending words need headroom above the start row
            Direction::DiagonalUp => StartBounds {
                row_min: len - 1,
                row_max: n - 1,
                col_min: 0,
                col_max: max_start,
            },
        };

        if bounds.row_min > bounds.row_max || bounds.col_min > bounds.col_max {
            return None;
        }
        Some(bounds)
    }

    fn random_start(&mut self, bounds: &StartBounds) -> Position {
        let row_span = bounds.row_max - bounds.row_min + 1;
        let col_span = bounds.col_max - bounds.col_min + 1;
        Position {
            row: bounds.row_min + self.roll(row_span),
            col: bounds.col_min + self.roll(col_span),
        }
    }

    /// Uniform draw in `[0, span)` from the injected source
    fn roll(&mut self, span: usize) -> usize {
        (((self.random)() * span as f64) as usize).min(span.saturating_sub(1))
    }

    /// Exact-match rule: every target cell must be empty or already hold
    /// the same letter
    fn fits_at(&self, word: &str, start: Position, direction: Direction) -> bool {
        let (d_row, d_col) = direction.delta();

        word.chars().enumerate().all(|(i, letter)| {
            let row = start.row as isize + d_row * i as isize;
            let col = start.col as isize + d_col * i as isize;
            match self.cell_at(row, col) {
                Some(cell) => cell == EMPTY_CELL || cell == letter,
                None => false,
            }
        })
    }

    fn cell_at(&self, row: isize, col: isize) -> Option<char> {
        if row < 0 || col < 0 {
            return None;
        }
        self.grid
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Write the word into the grid and record its placement. The
    /// out-of-bounds arm guards against logic defects upstream.
    fn commit(
        &mut self,
        word: &str,
        start: Position,
        direction: Direction,
    ) -> Result<(), PlacementError> {
        let (d_row, d_col) = direction.delta();
        let mut cells = Vec::with_capacity(word.chars().count());
        let mut end = start;

        for (i, letter) in word.chars().enumerate() {
            let row = start.row as isize + d_row * i as isize;
            let col = start.col as isize + d_col * i as isize;

            if row < 0
                || col < 0
                || row >= self.grid_size as isize
                || col >= self.grid_size as isize
            {
                return Err(PlacementError::OutOfBounds {
                    word: word.to_string(),
                    row,
                    col,
                    grid_size: self.grid_size,
                });
            }

            let pos = Position {
                row: row as usize,
                col: col as usize,
            };
            self.grid[pos.row][pos.col] = letter;
            cells.push(pos);
            end = pos;
        }

        self.placed_words.push(PlacedWord {
            word: word.to_string(),
            start_pos: start,
            end_pos: end,
            direction,
            cells,
        });

        Ok(())
    }

    /// Fill every still-empty cell with a random uppercase letter
    fn fill_empty_cells(&mut self) {
        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                if self.grid[row][col] == EMPTY_CELL {
                    let roll = (self.random)();
                    self.grid[row][col] = letters::filler_letter(roll);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_words(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run_seeded(seed: &str, size: usize, words: &[&str]) -> (WordPlacementEngine, PlacementResult) {
        let mut engine = WordPlacementEngine::with_seed(size, seed);
        let result = engine.place_words(&to_words(words)).unwrap();
        (engine, result)
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let words = ["RUST", "GRID", "WORD", "SEARCH", "LETTER"];
        let (_, a) = run_seeded("alpha", 12, &words);
        let (_, b) = run_seeded("alpha", 12, &words);

        assert_eq!(a.grid, b.grid);
        assert_eq!(a.placed_words, b.placed_words);
        assert_eq!(a.failed_words, b.failed_words);
        assert_eq!(a.success, b.success);
    }

    #[test]
    fn test_placed_cells_stay_inside_grid() {
        let size = 8;
        let (_, result) = run_seeded("bounds", size, &["ANCHOR", "TIDE", "REEF", "WAVE"]);

        for placed in &result.placed_words {
            for cell in &placed.cells {
                assert!(cell.row < size, "row {} escaped the grid", cell.row);
                assert!(cell.col < size, "col {} escaped the grid", cell.col);
            }
        }
    }

    #[test]
    fn test_placed_words_read_back_from_grid() {
        let (_, result) = run_seeded("fidelity", 10, &["STONE", "RIVER", "CLOUD"]);

        for placed in &result.placed_words {
            let read: String = placed
                .cells
                .iter()
                .map(|pos| result.grid[pos.row][pos.col])
                .collect();
            assert_eq!(read, placed.word);
        }
    }

    #[test]
    fn test_success_implies_every_word_placed() {
        let words = ["MAPLE", "BIRCH", "CEDAR"];
        let (engine, result) = run_seeded("forest", 12, &words);

        assert!(result.success);
        assert!(result.failed_words.is_empty());
        for word in words {
            let count = result
                .placed_words
                .iter()
                .filter(|p| p.word == word)
                .count();
            assert_eq!(count, 1, "{} should be placed exactly once", word);
        }
        assert!(engine.validate_placement(&to_words(&words)));
    }

    #[test]
    fn test_every_cell_holds_an_uppercase_letter() {
        let (_, result) = run_seeded("cover", 9, &["ORBIT", "COMET"]);

        for row in &result.grid {
            for &cell in row {
                assert!(cell.is_ascii_uppercase(), "cell {:?} is not a letter", cell);
            }
        }
    }

    #[test]
    fn test_word_longer_than_grid_is_rejected() {
        let (_, result) = run_seeded("tiny", 3, &["ELEPHANT"]);

        assert!(!result.success);
        assert_eq!(result.failed_words, vec!["ELEPHANT".to_string()]);
        assert!(result.placed_words.is_empty());
        // The grid is still fully filled with filler letters
        for row in &result.grid {
            for &cell in row {
                assert!(cell.is_ascii_uppercase());
            }
        }
    }

    #[test]
    fn test_cat_and_dog_on_ten_grid() {
        let (_, result) = run_seeded("test", 10, &["CAT", "DOG"]);

        assert!(result.success);
        assert!(result.failed_words.is_empty());
        assert_eq!(result.placed_words.len(), 2);

        // CAT and DOG share no letters, so their cells never coincide
        let word_cells: std::collections::HashSet<Position> = result
            .placed_words
            .iter()
            .flat_map(|p| p.cells.iter().copied())
            .collect();
        assert_eq!(word_cells.len(), 6);

        for row in &result.grid {
            for &cell in row {
                assert!(cell.is_ascii_uppercase());
            }
        }
    }

    #[test]
    fn test_duplicate_words_are_attempted_independently() {
        let (_, result) = run_seeded("twice", 5, &["AB", "AB"]);

        assert!(result.success);
        assert_eq!(result.placed_words.len(), 2);
        for placed in &result.placed_words {
            assert_eq!(placed.word, "AB");
            let read: String = placed
                .cells
                .iter()
                .map(|pos| result.grid[pos.row][pos.col])
                .collect();
            assert_eq!(read, "AB");
        }
    }

    #[test]
    fn test_empty_input_returns_untouched_grid() {
        let mut engine = WordPlacementEngine::with_seed(4, "noop");
        let result = engine.place_words(&[]).unwrap();

        assert!(!result.success);
        assert!(result.placed_words.is_empty());
        assert!(result.failed_words.is_empty());
        for row in &result.grid {
            for &cell in row {
                assert_eq!(cell, EMPTY_CELL);
            }
        }
    }

    #[test]
    fn test_whitespace_only_word_fails_without_aborting() {
        let (_, result) = run_seeded("blank", 6, &["   ", "MOON"]);

        assert!(!result.success);
        assert_eq!(result.failed_words, vec!["".to_string()]);
        assert_eq!(result.placed_words.len(), 1);
        assert_eq!(result.placed_words[0].word, "MOON");
    }

    #[test]
    fn test_words_are_normalized_before_placement() {
        let (engine, result) = run_seeded("case", 8, &["  lantern  "]);

        assert!(result.success);
        assert_eq!(result.placed_words[0].word, "LANTERN");
        assert!(engine.validate_placement(&to_words(&["  lantern  "])));
    }

    #[test]
    fn test_engine_reuse_resets_state() {
        let mut engine = WordPlacementEngine::with_seed(8, "reuse");

        let first = engine.place_words(&to_words(&["SALT"])).unwrap();
        let second = engine.place_words(&to_words(&["PEPPER"])).unwrap();

        assert_eq!(first.placed_words.len(), 1);
        assert_eq!(second.placed_words.len(), 1);
        assert_eq!(second.placed_words[0].word, "PEPPER");
        // Nothing from the first run survives into the second
        assert!(second.placed_words.iter().all(|p| p.word != "SALT"));
    }

    #[test]
    fn test_fixed_source_exercises_overlap_fallback() {
        // A source that always returns 0.0 pins every random candidate to
        // the top-left start, so the second word can only land through the
        // overlap-tolerant raster scan
        let mut engine = WordPlacementEngine::with_random_source(5, Box::new(|| 0.0));
        let result = engine.place_words(&to_words(&["CAT", "DOG"])).unwrap();

        assert!(result.success);
        assert_eq!(result.placed_words.len(), 2);

        let cat = &result.placed_words[0];
        assert_eq!(cat.word, "CAT");
        assert_eq!(cat.start_pos, Position { row: 0, col: 0 });
        assert_eq!(cat.direction, Direction::Horizontal);

        // DOG conflicts with CAT at every pinned candidate; the hundredth
        // attempt scans row-major and settles on the second row
        let dog = &result.placed_words[1];
        assert_eq!(dog.word, "DOG");
        assert_eq!(dog.start_pos, Position { row: 1, col: 0 });
        assert_eq!(dog.direction, Direction::Horizontal);

        // All filler rolls were 0.0, which maps to 'A'
        assert_eq!(result.grid[4][4], 'A');
    }

    #[test]
    fn test_dense_list_reports_partial_result() {
        // Nine 4-letter words cannot all fit on a 4x4 grid; the engine
        // must hand back a well-formed partial result instead of erroring
        let words = [
            "ABCD", "EFGH", "IJKL", "MNOP", "QRST", "UVWX", "YZAB", "CDEF", "GHIJ",
        ];
        let (_, result) = run_seeded("dense", 4, &words);

        assert_eq!(
            result.placed_words.len() + result.failed_words.len(),
            words.len()
        );
        for row in &result.grid {
            for &cell in row {
                assert!(cell.is_ascii_uppercase());
            }
        }
    }

    #[test]
    fn test_validate_placement_detects_corrupted_grid() {
        let words = to_words(&["EMBER"]);
        let mut engine = WordPlacementEngine::with_seed(7, "tamper");
        engine.place_words(&words).unwrap();
        assert!(engine.validate_placement(&words));

        // Flip one letter of the placed word
        let target = engine.placed_words[0].cells[0];
        engine.grid[target.row][target.col] = '#';
        assert!(!engine.validate_placement(&words));
    }

    #[test]
    fn test_validate_placement_detects_missing_word() {
        let mut engine = WordPlacementEngine::with_seed(7, "missing");
        engine.place_words(&to_words(&["FLINT"])).unwrap();

        assert!(!engine.validate_placement(&to_words(&["FLINT", "GRANITE"])));
    }

    #[test]
    fn test_diagonal_up_bounds_allow_ascending_words() {
        let engine = WordPlacementEngine::with_seed(6, "up");
        let bounds = engine.start_bounds(4, Direction::DiagonalUp).unwrap();

        // Starting row needs at least len - 1 rows of headroom above
        assert_eq!(bounds.row_min, 3);
        assert_eq!(bounds.row_max, 5);
        assert_eq!(bounds.col_min, 0);
        assert_eq!(bounds.col_max, 2);
    }

    #[test]
    fn test_start_bounds_reject_oversized_word() {
        let engine = WordPlacementEngine::with_seed(4, "big");
        for direction in Direction::ALL {
            assert!(engine.start_bounds(5, direction).is_none());
        }
    }
}
