use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use tokio::fs;

/// Words handed out when no bank file is available
static BUILTIN_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "PUZZLE", "SEARCH", "LETTER", "HIDDEN", "ACROSS", "BOARD", "TRACE", "ANGLE", "RIDDLE",
        "CIPHER", "TOKEN", "SCRIPT", "MARGIN", "CORNER", "STREAK", "BRANCH", "CANYON", "MEADOW",
        "HARBOR", "LANTERN", "ORCHARD", "THICKET", "GLACIER", "EMBER", "FROST", "RAVEN", "MAPLE",
        "CEDAR", "STONE", "RIVER",
    ]
    .iter()
    .map(|word| word.to_string())
    .collect()
});

/// A pool of candidate words for generated puzzles
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Load a word bank from a newline-separated file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let unique: HashSet<String> = content
            .lines()
            .map(|line| line.trim().to_uppercase())
            .filter(|word| word.len() >= 2 && word.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();

        // Sorted so sampling draws from a stable ordering
        let mut words: Vec<String> = unique.into_iter().collect();
        words.sort();

        tracing::info!("Loaded {} words into word bank", words.len());

        Ok(Self { words })
    }

    /// Compiled-in word list used when no bank file is present
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.clone(),
        }
    }

    /// Get the number of words in the bank
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pick up to `count` distinct words that fit a `grid_size` grid
    pub fn sample(&self, count: usize, grid_size: usize) -> Vec<String> {
        let eligible: Vec<String> = self
            .words
            .iter()
            .filter(|word| word.chars().count() <= grid_size)
            .cloned()
            .collect();

        eligible
            .choose_multiple(&mut rand::rng(), count)
            .cloned()
            .collect()
    }
}
