//! Game history store with duplicate detection.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{JsonlContents, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::analysis::GameSource;
use crate::models::{GameImport, GameRecord};

/// Outcome of a batch insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertSummary {
    pub total: usize,
    pub inserted: usize,
}

impl InsertSummary {
    pub fn duplicates(&self) -> usize {
        self.total - self.inserted
    }
}

/// Identifies one stored game in database statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameMarker {
    pub game_id: u64,
    pub timestamp: DateTime<Utc>,
}

/// Summary of what the store holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub total_games: usize,
    pub oldest_game: Option<GameMarker>,
    pub newest_game: Option<GameMarker>,
    /// Lines in the games file that could not be read back
    pub unreadable_lines: usize,
}

/// JSONL-backed store of completed games.
///
/// Readers never block. Writers are serialized so two concurrent imports
/// cannot both store the same `game_id`.
pub struct GameStore {
    reader: JsonlReader<GameRecord>,
    writer: JsonlWriter<GameRecord>,
    write_lock: Mutex<()>,
}

impl GameStore {
    pub fn new(config: &StorageConfig) -> Self {
        let path = config.games_path();
        Self {
            reader: JsonlReader::new(path.clone()),
            writer: JsonlWriter::new(path),
            write_lock: Mutex::new(()),
        }
    }

    /// Every stored game, newest (highest `game_id`) first.
    ///
    /// If a `game_id` appears more than once, the first stored copy wins.
    pub fn all(&self) -> Result<Vec<GameRecord>, StorageError> {
        Ok(self.load()?.0)
    }

    /// Deduplicated games plus the number of unreadable lines.
    fn load(&self) -> Result<(Vec<GameRecord>, usize), StorageError> {
        let JsonlContents { records, skipped } = self.reader.read_all()?;
        if skipped > 0 {
            warn!("Games file has {} unreadable lines", skipped);
        }

        let mut seen = HashSet::new();
        let mut games: Vec<GameRecord> = records
            .into_iter()
            .filter(|g| seen.insert(g.game_id))
            .collect();

        games.sort_by(|a, b| b.game_id.cmp(&a.game_id));
        Ok((games, skipped))
    }

    /// The `limit` most recent games, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<GameRecord>, StorageError> {
        let mut games = self.all()?;
        games.truncate(limit);
        Ok(games)
    }

    /// Store one game. Returns false if its `game_id` is already stored.
    pub fn insert_game(&self, game: GameImport) -> Result<bool, StorageError> {
        let summary = self.insert_games(vec![game])?;
        Ok(summary.inserted == 1)
    }

    /// Store a batch of games, skipping ids already stored or repeated in the batch.
    pub fn insert_games(&self, games: Vec<GameImport>) -> Result<InsertSummary, StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let total = games.len();
        let mut known: HashSet<u64> = self
            .reader
            .read_all()?
            .records
            .iter()
            .map(|g| g.game_id)
            .collect();

        let now = Utc::now();
        let mut fresh = Vec::new();
        for game in games {
            if !known.insert(game.game_id) {
                debug!("Game {} already exists, skipping", game.game_id);
                continue;
            }
            fresh.push(game.into_record(now));
        }

        let inserted = self.writer.append_batch(&fresh)?;
        info!("Inserted {} new games out of {} total", inserted, total);

        Ok(InsertSummary { total, inserted })
    }

    /// Count of stored games with the oldest and newest of them.
    pub fn stats(&self) -> Result<DatabaseStats, StorageError> {
        let (games, unreadable_lines) = self.load()?;
        let marker = |g: &GameRecord| GameMarker {
            game_id: g.game_id,
            timestamp: g.timestamp,
        };

        Ok(DatabaseStats {
            total_games: games.len(),
            oldest_game: games.last().map(marker),
            newest_game: games.first().map(marker),
            unreadable_lines,
        })
    }
}

impl GameSource for GameStore {
    type Error = StorageError;

    fn fetch_recent(&self, count: usize) -> Result<Vec<GameRecord>, Self::Error> {
        self.recent(count)
    }
}
