//! Pattern analysis engine.
//!
//! Turns the recent game history into decile statistics:
//! - Decile distribution and percentage breakdown
//! - Most/least common decile
//! - 10/30/50-game window comparison and trend classification
//! - Hot/cold zones with a betting recommendation
//!
//! The engine holds no state. Every call fetches its window from a
//! [`GameSource`] and recomputes from scratch.

pub mod deciles;
pub mod insight;

use tracing::debug;

use crate::models::{GameRecord, PatternAnalysis, PatternComparison, StrategicInsight, TrendShift};

pub use deciles::{
    decile_distribution, decile_percentages, least_common_decile, most_common_decile, DECILES,
    PERCENT_SUM_TOLERANCE,
};
pub use insight::decile_range_description;

/// Window sizes compared by [`PatternAnalyzer::compare`].
pub const COMPARISON_WINDOWS: [usize; 3] = [10, 30, 50];

/// Read access to the game history.
pub trait GameSource {
    type Error;

    /// The most recent `count` games, newest first.
    ///
    /// Returns fewer games when the history is shorter; a shortage is not an
    /// error.
    fn fetch_recent(&self, count: usize) -> Result<Vec<GameRecord>, Self::Error>;
}

impl<T: GameSource + ?Sized> GameSource for &T {
    type Error = T::Error;

    fn fetch_recent(&self, count: usize) -> Result<Vec<GameRecord>, Self::Error> {
        (**self).fetch_recent(count)
    }
}

impl<T: GameSource + ?Sized> GameSource for std::sync::Arc<T> {
    type Error = T::Error;

    fn fetch_recent(&self, count: usize) -> Result<Vec<GameRecord>, Self::Error> {
        (**self).fetch_recent(count)
    }
}

/// Analyzes winning ticket patterns from a game source.
///
/// Source errors are returned unchanged.
pub struct PatternAnalyzer<S> {
    source: S,
}

impl<S: GameSource> PatternAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Pattern analysis of the last `window_size` games.
    pub fn summarize(&self, window_size: usize) -> Result<PatternAnalysis, S::Error> {
        let games = self.source.fetch_recent(window_size)?;
        debug!("Analyzing {} games (window {})", games.len(), window_size);
        Ok(PatternAnalysis::from_games(&games))
    }

    /// Independent analyses of the 10, 30 and 50 most recent games.
    pub fn compare(&self) -> Result<PatternComparison, S::Error> {
        let [short, medium, long] = COMPARISON_WINDOWS;

        Ok(PatternComparison {
            last_10_games: self.summarize(short)?,
            last_30_games: self.summarize(medium)?,
            last_50_games: self.summarize(long)?,
        })
    }

    /// How the hot decile moves across the comparison windows.
    pub fn trend_shift(&self) -> Result<TrendShift, S::Error> {
        let comparison = self.compare()?;
        Ok(TrendShift::from_comparison(&comparison))
    }

    /// Hot/cold zones and a recommendation for the last `window_size` games.
    pub fn strategic_insight(&self, window_size: usize) -> Result<StrategicInsight, S::Error> {
        let pattern = self.summarize(window_size)?;
        Ok(StrategicInsight::from_pattern(&pattern, window_size))
    }

    /// Human-readable pot range for a decile.
    pub fn range_description(&self, decile: i64) -> &'static str {
        decile_range_description(decile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;
    use chrono::Utc;
    use std::cell::RefCell;

    /// In-memory history, newest first, recording every fetch.
    struct MemorySource {
        games: Vec<GameRecord>,
        fetches: RefCell<Vec<usize>>,
    }

    impl MemorySource {
        /// Build from deciles listed newest first.
        fn from_deciles(deciles: &[i32]) -> Self {
            let total = deciles.len() as u64;
            let games = deciles
                .iter()
                .enumerate()
                .map(|(i, &decile)| GameRecord {
                    game_id: total - i as u64,
                    game_value: 2.0,
                    winning_ticket: 0,
                    winner: format!("player-{}", i),
                    eos_block: None,
                    eos_block_hash: None,
                    eos_block_timestamp: None,
                    eos_block_producer: None,
                    server_seed: None,
                    verified: false,
                    timestamp: Utc::now(),
                    ticket_percentile: 0.0,
                    decile,
                })
                .collect();
            Self {
                games,
                fetches: RefCell::new(Vec::new()),
            }
        }
    }

    impl GameSource for MemorySource {
        type Error = std::convert::Infallible;

        fn fetch_recent(&self, count: usize) -> Result<Vec<GameRecord>, Self::Error> {
            self.fetches.borrow_mut().push(count);
            Ok(self.games.iter().take(count).cloned().collect())
        }
    }

    #[derive(Debug, PartialEq)]
    struct Unavailable;

    struct FailingSource;

    impl GameSource for FailingSource {
        type Error = Unavailable;

        fn fetch_recent(&self, _count: usize) -> Result<Vec<GameRecord>, Self::Error> {
            Err(Unavailable)
        }
    }

    /// Expand `(decile, repeat)` runs into a newest-first decile list.
    fn history(runs: &[(i32, usize)]) -> Vec<i32> {
        runs.iter()
            .flat_map(|&(decile, n)| std::iter::repeat(decile).take(n))
            .collect()
    }

    // Hot deciles per window: 10 -> 4, 30 -> 4, 50 -> 7
    const RECENT_SHIFT: &[(i32, usize)] = &[(4, 10), (7, 9), (2, 9), (3, 2), (7, 20)];

    // Hot deciles per window: 10 -> 2, 30 -> 2, 50 -> 2
    const STABLE: &[(i32, usize)] = &[
        (2, 6),
        (1, 1),
        (3, 1),
        (4, 1),
        (5, 1),
        (2, 10),
        (5, 10),
        (2, 10),
        (8, 10),
    ];

    // Hot deciles per window: 10 -> 9, 30 -> 6, 50 -> 6
    const NEW_TREND: &[(i32, usize)] = &[
        (9, 4),
        (6, 3),
        (1, 1),
        (2, 1),
        (3, 1),
        (6, 20),
        (6, 5),
        (3, 15),
    ];

    #[test]
    fn test_summarize_scenario() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[3, 3, 6, 6, 1]));
        let pattern = analyzer.summarize(10).unwrap();

        assert_eq!(pattern.game_count, 5);
        assert_eq!(pattern.decile_distribution[&1], 1);
        assert_eq!(pattern.decile_distribution[&3], 2);
        assert_eq!(pattern.decile_distribution[&6], 2);
        assert_eq!(pattern.decile_percentages[&3], 40.0);
        assert_eq!(pattern.most_common_decile, 3);
    }

    #[test]
    fn test_summarize_empty_history() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[]));
        let pattern = analyzer.summarize(10).unwrap();

        assert_eq!(pattern, PatternAnalysis::empty());
        assert_eq!(pattern.most_common_decile, 1);
        assert_eq!(pattern.least_common_decile, 1);
    }

    #[test]
    fn test_summarize_only_uses_window() {
        let source = MemorySource::from_deciles(&[2, 2, 9, 9, 9, 9]);
        let analyzer = PatternAnalyzer::new(&source);
        let pattern = analyzer.summarize(2).unwrap();

        assert_eq!(pattern.game_count, 2);
        assert_eq!(pattern.most_common_decile, 2);
        assert_eq!(*source.fetches.borrow(), vec![2]);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[4, 7, 7, 1, 10, 3]));
        let first = analyzer.summarize(5).unwrap();
        let second = analyzer.summarize(5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_fetches_each_window() {
        let source = MemorySource::from_deciles(&history(RECENT_SHIFT));
        let analyzer = PatternAnalyzer::new(&source);
        let comparison = analyzer.compare().unwrap();

        assert_eq!(*source.fetches.borrow(), vec![10, 30, 50]);
        assert_eq!(comparison.last_10_games.game_count, 10);
        assert_eq!(comparison.last_30_games.game_count, 30);
        assert_eq!(comparison.last_50_games.game_count, 50);
    }

    #[test]
    fn test_compare_with_short_history() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[5; 12]));
        let comparison = analyzer.compare().unwrap();

        assert_eq!(comparison.last_10_games.game_count, 10);
        assert_eq!(comparison.last_30_games.game_count, 12);
        assert_eq!(comparison.last_50_games.game_count, 12);
    }

    #[test]
    fn test_trend_shift_recent_shift() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&history(RECENT_SHIFT)));
        let shift = analyzer.trend_shift().unwrap();

        assert_eq!(shift.most_common_10, 4);
        assert_eq!(shift.most_common_30, 4);
        assert_eq!(shift.most_common_50, 7);
        assert_eq!(shift.trend, Trend::RecentShift);
        assert!(!shift.consistent);
    }

    #[test]
    fn test_trend_shift_stable() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&history(STABLE)));
        let shift = analyzer.trend_shift().unwrap();

        assert_eq!(
            (shift.most_common_10, shift.most_common_30, shift.most_common_50),
            (2, 2, 2)
        );
        assert_eq!(shift.trend, Trend::Stable);
        assert!(shift.consistent);
    }

    #[test]
    fn test_trend_shift_new_trend() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&history(NEW_TREND)));
        let shift = analyzer.trend_shift().unwrap();

        assert_eq!(shift.most_common_10, 9);
        assert_eq!(shift.most_common_30, 6);
        assert_eq!(shift.most_common_50, 6);
        assert_eq!(shift.trend, Trend::NewTrend);
    }

    #[test]
    fn test_trend_shift_empty_history_is_stable() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[]));
        let shift = analyzer.trend_shift().unwrap();
        assert_eq!(shift.trend, Trend::Stable);
        assert!(shift.consistent);
    }

    #[test]
    fn test_strategic_insight_single_hot_zone() {
        // 10 games, only decile 7 reaches 1.5 wins
        let analyzer =
            PatternAnalyzer::new(MemorySource::from_deciles(&[7, 7, 7, 1, 2, 3, 4, 5, 6, 8]));
        let insight = analyzer.strategic_insight(10).unwrap();

        assert_eq!(insight.hot_zones, vec![7]);
        assert_eq!(insight.cold_zones, vec![9, 10]);
        assert_eq!(insight.sample_size, 10);
        assert_eq!(insight.most_common_range, "61-70% of pot (High-Medium)");
        assert!(insight
            .recommendation
            .contains("61-70% of pot (High-Medium) is winning frequently"));
    }

    #[test]
    fn test_strategic_insight_short_history() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[3, 3, 3]));
        let insight = analyzer.strategic_insight(10).unwrap();

        assert_eq!(insight.hot_zones, vec![3]);
        assert_eq!(insight.sample_size, 3);
        assert!(insight.recommendation.starts_with("Insufficient data"));
    }

    #[test]
    fn test_source_errors_propagate() {
        let analyzer = PatternAnalyzer::new(FailingSource);
        assert_eq!(analyzer.summarize(10), Err(Unavailable));
        assert_eq!(analyzer.compare().unwrap_err(), Unavailable);
        assert_eq!(analyzer.trend_shift().unwrap_err(), Unavailable);
        assert_eq!(analyzer.strategic_insight(10).unwrap_err(), Unavailable);
    }

    #[test]
    fn test_range_description_passthrough() {
        let analyzer = PatternAnalyzer::new(MemorySource::from_deciles(&[]));
        assert_eq!(analyzer.range_description(8), "71-80% of pot (High)");
        assert_eq!(analyzer.range_description(42), "Unknown");
    }
}
