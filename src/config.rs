use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub word_bank_path: String,
    pub default_grid_size: usize,
    pub max_grid_size: usize,
    pub words_per_puzzle: usize,
    pub max_words_per_puzzle: usize,
    pub puzzle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let generator = GeneratorConfig {
            word_bank_path: env::var("WORD_BANK_PATH")
                .unwrap_or_else(|_| "./words.txt".to_string()),
            default_grid_size: env::var("DEFAULT_GRID_SIZE")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .unwrap_or(12),
            max_grid_size: env::var("MAX_GRID_SIZE")
                .unwrap_or_else(|_| "32".to_string())
                .parse()
                .unwrap_or(32),
            words_per_puzzle: env::var("WORDS_PER_PUZZLE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            max_words_per_puzzle: env::var("MAX_WORDS_PER_PUZZLE")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .unwrap_or(40),
            puzzle_ttl_secs: env::var("PUZZLE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
        };

        Ok(Config { server, generator })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
