//! Filesystem game history.
//!
//! Completed rounds live in a single JSONL file under the data directory,
//! one game per line, appended as new games arrive.

mod games;
mod jsonl;

use std::path::PathBuf;
use thiserror::Error;

pub use games::{DatabaseStats, GameMarker, GameStore, InsertSummary};
pub use jsonl::{JsonlContents, JsonlReader, JsonlWriter};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// JSONL file holding every stored game.
    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join("games.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
