//! Pattern analysis result models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Win counts per decile (1-10), ascending.
pub type DecileDistribution = BTreeMap<u8, u32>;

/// Share of wins per decile in percent, rounded to 2 decimals.
pub type DecilePercentages = BTreeMap<u8, f64>;

/// Decile distribution statistics for one window of recent games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// Number of games analyzed
    pub game_count: usize,

    /// Count of wins per decile
    pub decile_distribution: DecileDistribution,

    /// Percentage of wins per decile
    pub decile_percentages: DecilePercentages,

    /// Decile with most wins
    pub most_common_decile: u8,

    /// Decile with fewest wins
    pub least_common_decile: u8,
}

/// Pattern analysis over the 10, 30 and 50 most recent games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternComparison {
    pub last_10_games: PatternAnalysis,
    pub last_30_games: PatternAnalysis,
    pub last_50_games: PatternAnalysis,
}

/// How the hot decile moves between comparison windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    /// Same hot decile across all windows
    Stable,
    /// 10- and 30-game windows agree, 50-game window differs
    RecentShift,
    /// 30- and 50-game windows agree, 10-game window differs
    NewTrend,
    /// No two adjacent windows agree
    Volatile,
}

impl Trend {
    /// Classify the most common decile of the 10/30/50-game windows.
    pub fn classify(last_10: u8, last_30: u8, last_50: u8) -> Self {
        if last_10 == last_30 && last_30 == last_50 {
            Trend::Stable
        } else if last_10 == last_30 {
            Trend::RecentShift
        } else if last_30 == last_50 {
            Trend::NewTrend
        } else {
            Trend::Volatile
        }
    }

    /// Human-readable explanation of the trend.
    pub fn summary(&self) -> &'static str {
        match self {
            Trend::Stable => "STABLE - Same hot decile across all time windows",
            Trend::RecentShift => "RECENT_SHIFT - Pattern changed in last 30 games",
            Trend::NewTrend => "NEW_TREND - New pattern emerging in last 10 games",
            Trend::Volatile => "VOLATILE - Pattern changing frequently",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Stable => write!(f, "STABLE"),
            Trend::RecentShift => write!(f, "RECENT_SHIFT"),
            Trend::NewTrend => write!(f, "NEW_TREND"),
            Trend::Volatile => write!(f, "VOLATILE"),
        }
    }
}

/// Movement of the most common decile across the comparison windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendShift {
    pub most_common_10: u8,
    pub most_common_30: u8,
    pub most_common_50: u8,

    /// All three windows share the same hot decile
    pub consistent: bool,

    pub trend: Trend,

    /// Sentence describing `trend`
    pub summary: String,
}

impl TrendShift {
    pub fn from_comparison(comparison: &PatternComparison) -> Self {
        let most_common_10 = comparison.last_10_games.most_common_decile;
        let most_common_30 = comparison.last_30_games.most_common_decile;
        let most_common_50 = comparison.last_50_games.most_common_decile;
        let trend = Trend::classify(most_common_10, most_common_30, most_common_50);

        Self {
            most_common_10,
            most_common_30,
            most_common_50,
            consistent: trend == Trend::Stable,
            trend,
            summary: trend.summary().to_string(),
        }
    }
}

/// Hot/cold zones and a betting recommendation for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicInsight {
    /// Deciles winning at or above the hot-zone density
    pub hot_zones: Vec<u8>,

    /// Deciles with no wins
    pub cold_zones: Vec<u8>,

    pub most_common_range: String,
    pub least_common_range: String,
    pub sample_size: usize,
    pub recommendation: String,
}
