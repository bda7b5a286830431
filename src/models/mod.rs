pub mod puzzle;

pub use puzzle::{Direction, Grid, PlacedWord, PlacementResult, Position, Puzzle};
