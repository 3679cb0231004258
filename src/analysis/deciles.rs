//! Decile counting and extremum lookup.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::models::{DecileDistribution, DecilePercentages, GameRecord, PatternAnalysis};

/// Valid decile numbers, in the order ties are resolved.
pub const DECILES: RangeInclusive<u8> = 1..=10;

/// Decile reported when a distribution is empty.
pub const DEFAULT_DECILE: u8 = 1;

/// Allowed drift of summed percentages from 100 after 2-decimal rounding.
pub const PERCENT_SUM_TOLERANCE: f64 = 0.1;

/// Distribution with every decile present and zero wins.
pub fn empty_distribution() -> DecileDistribution {
    DECILES.map(|d| (d, 0)).collect()
}

/// Count wins per decile.
///
/// Records whose decile lies outside 1-10 are skipped.
pub fn decile_distribution(games: &[GameRecord]) -> DecileDistribution {
    let mut distribution = empty_distribution();
    let mut skipped = 0usize;

    for game in games {
        let bucket = u8::try_from(game.decile)
            .ok()
            .and_then(|d| distribution.get_mut(&d));
        match bucket {
            Some(count) => *count += 1,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} games with out-of-range decile", skipped);
    }

    distribution
}

/// Convert win counts to percentages of `total_games`, rounded to 2 decimals.
pub fn decile_percentages(
    distribution: &DecileDistribution,
    total_games: usize,
) -> DecilePercentages {
    if total_games == 0 {
        return DECILES.map(|d| (d, 0.0)).collect();
    }

    DECILES
        .map(|d| {
            let count = distribution.get(&d).copied().unwrap_or(0);
            let pct = count as f64 / total_games as f64 * 100.0;
            (d, (pct * 100.0).round() / 100.0)
        })
        .collect()
}

/// Decile with the most wins; the lowest decile wins ties.
pub fn most_common_decile(distribution: &DecileDistribution) -> u8 {
    // BTreeMap iterates ascending, so only a strictly larger count moves the pick
    let mut best: Option<(u8, u32)> = None;
    for (&decile, &count) in distribution {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((decile, count));
        }
    }
    best.map_or(DEFAULT_DECILE, |(d, _)| d)
}

/// Decile with the fewest wins; the lowest decile wins ties.
pub fn least_common_decile(distribution: &DecileDistribution) -> u8 {
    let mut best: Option<(u8, u32)> = None;
    for (&decile, &count) in distribution {
        if best.map_or(true, |(_, c)| count < c) {
            best = Some((decile, count));
        }
    }
    best.map_or(DEFAULT_DECILE, |(d, _)| d)
}

impl PatternAnalysis {
    /// Analysis of a history with no games.
    pub fn empty() -> Self {
        Self {
            game_count: 0,
            decile_distribution: empty_distribution(),
            decile_percentages: decile_percentages(&empty_distribution(), 0),
            most_common_decile: DEFAULT_DECILE,
            least_common_decile: DEFAULT_DECILE,
        }
    }

    /// Full decile analysis of the given games.
    pub fn from_games(games: &[GameRecord]) -> Self {
        if games.is_empty() {
            return Self::empty();
        }

        let distribution = decile_distribution(games);
        let percentages = decile_percentages(&distribution, games.len());

        Self {
            game_count: games.len(),
            most_common_decile: most_common_decile(&distribution),
            least_common_decile: least_common_decile(&distribution),
            decile_distribution: distribution,
            decile_percentages: percentages,
        }
    }
}
