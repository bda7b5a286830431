use crate::models::{Grid, PlacedWord};
use crate::utils::letters;

pub struct PlacementValidator;

impl PlacementValidator {
    /// Consistency check over a finished grid: every requested word must
    /// appear among the placed words, and each placed word's recorded
    /// cells must read back as its letters.
    pub fn validate(grid: &Grid, placed: &[PlacedWord], requested: &[String]) -> bool {
        Self::all_requested_placed(placed, requested)
            && placed.iter().all(|word| Self::reads_back(grid, word))
    }

    fn all_requested_placed(placed: &[PlacedWord], requested: &[String]) -> bool {
        requested.iter().all(|raw| {
            let word = letters::normalize_word(raw);
            placed.iter().any(|p| p.word == word)
        })
    }

    fn reads_back(grid: &Grid, placed: &PlacedWord) -> bool {
        if placed.cells.len() != placed.word.chars().count() {
            return false;
        }

        placed
            .word
            .chars()
            .zip(placed.cells.iter())
            .all(|(letter, pos)| {
                grid.get(pos.row)
                    .and_then(|row| row.get(pos.col))
                    .is_some_and(|&cell| cell == letter)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Position};

    fn sample_grid() -> Grid {
        vec![
            vec!['C', 'A', 'T'],
            vec!['X', 'Y', 'Z'],
            vec!['Q', 'Q', 'Q'],
        ]
    }

    fn cat() -> PlacedWord {
        PlacedWord {
            word: "CAT".to_string(),
            start_pos: Position { row: 0, col: 0 },
            end_pos: Position { row: 0, col: 2 },
            direction: Direction::Horizontal,
            cells: vec![
                Position { row: 0, col: 0 },
                Position { row: 0, col: 1 },
                Position { row: 0, col: 2 },
            ],
        }
    }

    #[test]
    fn test_valid_placement_passes() {
        let grid = sample_grid();
        let placed = vec![cat()];
        let requested = vec!["cat".to_string()];

        assert!(PlacementValidator::validate(&grid, &placed, &requested));
    }

    #[test]
    fn test_unplaced_requested_word_fails() {
        let grid = sample_grid();
        let placed = vec![cat()];
        let requested = vec!["CAT".to_string(), "DOG".to_string()];

        assert!(!PlacementValidator::validate(&grid, &placed, &requested));
    }

    #[test]
    fn test_mismatched_grid_letter_fails() {
        let mut grid = sample_grid();
        grid[0][1] = 'B';
        let placed = vec![cat()];
        let requested = vec!["CAT".to_string()];

        assert!(!PlacementValidator::validate(&grid, &placed, &requested));
    }

    #[test]
    fn test_cells_outside_grid_fail() {
        let grid = sample_grid();
        let mut rogue = cat();
        rogue.cells[2] = Position { row: 9, col: 9 };
        let requested = vec!["CAT".to_string()];

        assert!(!PlacementValidator::validate(&grid, &[rogue], &requested));
    }

    #[test]
    fn test_cell_count_must_match_word_length() {
        let grid = sample_grid();
        let mut truncated = cat();
        truncated.cells.pop();
        let requested = vec!["CAT".to_string()];

        assert!(!PlacementValidator::validate(&grid, &[truncated], &requested));
    }
}
