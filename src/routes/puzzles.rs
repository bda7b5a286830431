use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::WordPlacementEngine;
use crate::models::Puzzle;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePuzzleRequest {
    /// Words to hide; drawn from the word bank when omitted
    pub words: Option<Vec<String>>,
    pub grid_size: Option<usize>,
    /// Fixed seed for reproducible grids
    pub seed: Option<String>,
}

/// Generate a new puzzle and store it for later retrieval
pub async fn generate_puzzle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GeneratePuzzleRequest>,
) -> Result<Json<Puzzle>, StatusCode> {
    let grid_size = payload
        .grid_size
        .unwrap_or(state.config.generator.default_grid_size);

    if grid_size == 0 || grid_size > state.config.generator.max_grid_size {
        tracing::warn!("Rejected puzzle request with grid size {}", grid_size);
        return Err(StatusCode::BAD_REQUEST);
    }

    let words = match payload.words {
        Some(words) if !words.is_empty() => words,
        _ => state
            .word_bank
            .sample(state.config.generator.words_per_puzzle, grid_size),
    };

    if words.len() > state.config.generator.max_words_per_puzzle {
        tracing::warn!("Rejected puzzle request with {} words", words.len());
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut engine = match payload.seed.as_deref() {
        Some(seed) => WordPlacementEngine::with_seed(grid_size, seed),
        None => WordPlacementEngine::new(grid_size),
    };

    let result = engine.place_words(&words).map_err(|e| {
        tracing::error!("Placement engine failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // A fully successful grid must survive the read-back check
    if result.success && !engine.validate_placement(&words) {
        tracing::error!("Generated grid failed read-back validation");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if !result.success {
        tracing::debug!(
            "Generated partial puzzle: {} placed, {} failed",
            result.placed_words.len(),
            result.failed_words.len()
        );
    }

    let puzzle = Puzzle {
        puzzle_id: Uuid::new_v4(),
        grid_size,
        seed: payload.seed,
        grid: result.grid,
        placed_words: result.placed_words,
        failed_words: result.failed_words,
        success: result.success,
        created_at: Utc::now(),
    };

    state.puzzles.insert(puzzle.clone());

    tracing::info!(
        "Generated puzzle {} ({}x{}, {} words placed)",
        puzzle.puzzle_id,
        grid_size,
        grid_size,
        puzzle.placed_words.len()
    );

    Ok(Json(puzzle))
}

/// Fetch a previously generated puzzle by id
pub async fn get_puzzle(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<Json<Puzzle>, StatusCode> {
    state
        .puzzles
        .get(&puzzle_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
