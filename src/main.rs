mod config;
mod engine;
mod models;
mod routes;
mod store;
mod utils;
mod wordbank;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use config::Config;
use store::PuzzleStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordbank::WordBank;

/// How often the expired-puzzle sweep runs
pub const PUZZLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub word_bank: WordBank,
    pub puzzles: PuzzleStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_search_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting word search backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load word bank
    let word_bank = match WordBank::load(&config.generator.word_bank_path).await {
        Ok(bank) => {
            tracing::info!("Word bank loaded successfully");
            bank
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load word bank: {}. Using the built-in word list.",
                e
            );
            tracing::warn!(
                "Provide a word list at {} for a richer puzzle pool",
                config.generator.word_bank_path
            );
            WordBank::builtin()
        }
    };
    if word_bank.is_empty() {
        tracing::warn!("Word bank is empty; puzzle requests must supply their own words");
    } else {
        tracing::info!("Word bank ready with {} words", word_bank.len());
    }

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        word_bank,
        puzzles: PuzzleStore::new(),
    });

    // Spawn background task to drop puzzles past their TTL
    let sweep_state = state.clone();
    tokio::spawn(async move {
        puzzle_sweep_task(sweep_state).await;
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Generate puzzles: POST http://{}/api/puzzles", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically removes puzzles past their TTL
async fn puzzle_sweep_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(PUZZLE_SWEEP_INTERVAL);
    let ttl = state.config.generator.puzzle_ttl_secs;

    loop {
        interval.tick().await;

        let removed = state.puzzles.remove_expired(ttl);
        if removed > 0 {
            tracing::info!(
                "Removed {} expired puzzles, {} remaining",
                removed,
                state.puzzles.len()
            );
        }
    }
}
