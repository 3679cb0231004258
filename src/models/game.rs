//! Completed jackpot round model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Position of the winning ticket as a percentage of the pot.
///
/// An empty pot yields 0.
pub fn ticket_percentile(winning_ticket: u64, pot_lamports: u64) -> f64 {
    if pot_lamports == 0 {
        return 0.0;
    }
    (winning_ticket as f64 / pot_lamports as f64) * 100.0
}

/// Decile bucket (1-10) for a ticket percentile.
///
/// Percentiles of 100 and above land in decile 10.
pub fn decile_for_percentile(percentile: f64) -> i32 {
    if percentile >= 100.0 {
        return 10;
    }
    let bucket = (percentile / 10.0).floor() as i32 + 1;
    bucket.clamp(1, 10)
}

/// A completed round as stored in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Game identifier, increasing over time
    pub game_id: u64,

    /// Total pot size in SOL
    pub game_value: f64,

    /// Winning ticket number (0 to pot size in lamports)
    pub winning_ticket: u64,

    /// Winner's username
    pub winner: String,

    /// EOS block used for randomness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_block: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_block_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_block_timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_block_producer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,

    /// Whether the round's fairness proof was checked
    #[serde(default)]
    pub verified: bool,

    /// When the record was stored
    pub timestamp: DateTime<Utc>,

    /// Winning ticket position as a percentage of the pot (0-100)
    pub ticket_percentile: f64,

    /// Decile the winning ticket fell in (1-10); 0 when unknown
    #[serde(default)]
    pub decile: i32,
}

/// A round as submitted for import, before it is stamped and stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameImport {
    pub game_id: u64,
    pub game_value: f64,
    pub winning_ticket: u64,
    pub winner: String,
    #[serde(default)]
    pub eos_block: Option<String>,
    pub ticket_percentile: f64,
    pub decile: i32,
    #[serde(default)]
    pub eos_block_hash: Option<String>,
    #[serde(default)]
    pub eos_block_timestamp: Option<String>,
    #[serde(default)]
    pub eos_block_producer: Option<String>,
    #[serde(default)]
    pub server_seed: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl GameImport {
    /// Build an import from raw round values, deriving percentile and decile.
    ///
    /// The stored percentile is rounded to 2 decimals; the decile is taken
    /// from the unrounded value.
    pub fn from_round(
        game_id: u64,
        game_value: f64,
        winning_ticket: u64,
        winner: String,
        eos_block: Option<String>,
    ) -> Self {
        let pot_lamports = (game_value * LAMPORTS_PER_SOL as f64) as u64;
        let percentile = ticket_percentile(winning_ticket, pot_lamports);

        Self {
            game_id,
            game_value,
            winning_ticket,
            winner,
            eos_block,
            ticket_percentile: (percentile * 100.0).round() / 100.0,
            decile: decile_for_percentile(percentile),
            eos_block_hash: None,
            eos_block_timestamp: None,
            eos_block_producer: None,
            server_seed: None,
            verified: false,
        }
    }

    /// Stamp the import with its storage time.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> GameRecord {
        GameRecord {
            game_id: self.game_id,
            game_value: self.game_value,
            winning_ticket: self.winning_ticket,
            winner: self.winner,
            eos_block: self.eos_block,
            eos_block_hash: self.eos_block_hash,
            eos_block_timestamp: self.eos_block_timestamp,
            eos_block_producer: self.eos_block_producer,
            server_seed: self.server_seed,
            verified: self.verified,
            timestamp,
            ticket_percentile: self.ticket_percentile,
            decile: self.decile,
        }
    }
}

/// Body of a game import file: a `{ "games": [...] }` envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Envelope { games: Vec<GameImport> },
    Bare(Vec<GameImport>),
}

/// Parse the contents of a game import file.
pub fn parse_import_file(json: &str) -> Result<Vec<GameImport>, serde_json::Error> {
    let games = match serde_json::from_str(json)? {
        ImportFile::Envelope { games } | ImportFile::Bare(games) => games,
    };
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_GAME: &str = r#"{
        "game_id": 9,
        "game_value": 2.0,
        "winning_ticket": 1500000000,
        "winner": "frank",
        "ticket_percentile": 75.0,
        "decile": 8
    }"#;

    #[test]
    fn test_parse_import_file_envelope() {
        let games = parse_import_file(&format!(r#"{{"games": [{}]}}"#, ONE_GAME)).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, 9);
        assert_eq!(games[0].decile, 8);
    }

    #[test]
    fn test_parse_import_file_bare_array() {
        let games = parse_import_file(&format!("[{0}, {0}]", ONE_GAME)).unwrap();
        assert_eq!(games.len(), 2);
    }

    #[test]
    fn test_parse_import_file_rejects_other_shapes() {
        assert!(parse_import_file(r#"{"rounds": []}"#).is_err());
        assert!(parse_import_file("not json").is_err());
    }

    #[test]
    fn test_decile_boundaries() {
        assert_eq!(decile_for_percentile(0.0), 1);
        assert_eq!(decile_for_percentile(9.99), 1);
        assert_eq!(decile_for_percentile(10.0), 2);
        assert_eq!(decile_for_percentile(55.5), 6);
        assert_eq!(decile_for_percentile(90.0), 10);
        assert_eq!(decile_for_percentile(99.99), 10);
    }

    #[test]
    fn test_decile_percentile_100_is_top_decile() {
        assert_eq!(decile_for_percentile(100.0), 10);
        assert_eq!(decile_for_percentile(250.0), 10);
    }

    #[test]
    fn test_decile_negative_clamps_to_first() {
        assert_eq!(decile_for_percentile(-5.0), 1);
        assert_eq!(decile_for_percentile(-50.0), 1);
    }

    #[test]
    fn test_ticket_percentile() {
        assert_eq!(ticket_percentile(0, 0), 0.0);
        assert_eq!(ticket_percentile(25, 100), 25.0);
        assert_eq!(ticket_percentile(100, 100), 100.0);
    }

    #[test]
    fn test_from_round_derives_decile() {
        // 1.5 SOL pot, ticket at 1.2 SOL worth of lamports = 80%
        let import = GameImport::from_round(
            42,
            1.5,
            1_200_000_000,
            "alice".to_string(),
            Some("abc123".to_string()),
        );

        assert_eq!(import.ticket_percentile, 80.0);
        assert_eq!(import.decile, 9);
        assert!(!import.verified);
    }

    #[test]
    fn test_from_round_rounds_percentile() {
        // 1/3 of the pot
        let import = GameImport::from_round(1, 3.0, 1_000_000_000, "bob".to_string(), None);
        assert_eq!(import.ticket_percentile, 33.33);
        assert_eq!(import.decile, 4);
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let import = GameImport::from_round(7, 2.0, 500_000_000, "carol".to_string(), None);
        let now = Utc::now();
        let record = import.clone().into_record(now);

        assert_eq!(record.game_id, 7);
        assert_eq!(record.winner, "carol");
        assert_eq!(record.decile, import.decile);
        assert_eq!(record.timestamp, now);
    }

    #[test]
    fn test_record_missing_decile_defaults_to_zero() {
        let json = r#"{
            "game_id": 1,
            "game_value": 1.0,
            "winning_ticket": 10,
            "winner": "dave",
            "timestamp": "2026-01-01T00:00:00Z",
            "ticket_percentile": 0.0
        }"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.decile, 0);
        assert!(record.eos_block.is_none());
    }

    #[test]
    fn test_import_optional_fields_default() {
        let json = r#"{
            "game_id": 5,
            "game_value": 0.75,
            "winning_ticket": 1000,
            "winner": "erin",
            "ticket_percentile": 12.5,
            "decile": 2
        }"#;
        let import: GameImport = serde_json::from_str(json).unwrap();
        assert_eq!(import.decile, 2);
        assert!(import.server_seed.is_none());
        assert!(!import.verified);
    }
}
