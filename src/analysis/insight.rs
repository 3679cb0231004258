//! Hot/cold zone detection and betting recommendations.

use crate::models::{PatternAnalysis, StrategicInsight};

/// Share of the window a decile must reach to count as a hot zone.
pub const HOT_ZONE_DENSITY: f64 = 0.15;

/// Sample size below which no recommendation is attempted.
pub const MIN_RECOMMENDATION_SAMPLE: usize = 10;

/// More hot zones than this means the wins are spread out.
pub const MAX_FOCUSED_HOT_ZONES: usize = 5;

/// Hot zones named in a multi-zone recommendation.
pub const LISTED_HOT_ZONES: usize = 3;

/// Human-readable pot range for a decile.
pub fn decile_range_description(decile: i64) -> &'static str {
    match decile {
        1 => "0-10% of pot (Very Low)",
        2 => "11-20% of pot (Low)",
        3 => "21-30% of pot (Low-Medium)",
        4 => "31-40% of pot (Medium-Low)",
        5 => "41-50% of pot (Medium)",
        6 => "51-60% of pot (Medium-High)",
        7 => "61-70% of pot (High-Medium)",
        8 => "71-80% of pot (High)",
        9 => "81-90% of pot (Very High)",
        10 => "91-100% of pot (Extreme High)",
        _ => "Unknown",
    }
}

/// Deciles whose win count reaches the hot-zone density of `window_size`.
pub fn hot_zones(pattern: &PatternAnalysis, window_size: usize) -> Vec<u8> {
    let threshold = window_size as f64 * HOT_ZONE_DENSITY;
    pattern
        .decile_distribution
        .iter()
        .filter(|&(_, &count)| count as f64 >= threshold)
        .map(|(&decile, _)| decile)
        .collect()
}

/// Deciles without a single win.
pub fn cold_zones(pattern: &PatternAnalysis) -> Vec<u8> {
    pattern
        .decile_distribution
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&decile, _)| decile)
        .collect()
}

/// Betting recommendation for a sample and its hot zones.
pub fn recommendation(sample_size: usize, hot_zones: &[u8]) -> String {
    if sample_size < MIN_RECOMMENDATION_SAMPLE {
        return "Insufficient data for reliable recommendations. Collect more historical games."
            .to_string();
    }

    match hot_zones {
        [single] => format!(
            "Strong pattern detected: {} is winning frequently. Consider positioning bets in this range.",
            decile_range_description(i64::from(*single))
        ),
        zones if zones.len() > MAX_FOCUSED_HOT_ZONES => {
            "Pattern is widely distributed. No clear hot zone. Use standard probability-based betting."
                .to_string()
        }
        [] => "Pattern appears random. Use bankroll management and expected value calculations."
            .to_string(),
        zones => {
            let ranges = zones
                .iter()
                .take(LISTED_HOT_ZONES)
                .map(|&d| decile_range_description(i64::from(d)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Multiple hot zones detected: {}. Spread bets across these ranges.",
                ranges
            )
        }
    }
}

impl StrategicInsight {
    /// Derive zones and a recommendation from a window's analysis.
    pub fn from_pattern(pattern: &PatternAnalysis, window_size: usize) -> Self {
        let hot = hot_zones(pattern, window_size);
        let cold = cold_zones(pattern);
        let recommendation = recommendation(pattern.game_count, &hot);

        Self {
            most_common_range: decile_range_description(i64::from(pattern.most_common_decile))
                .to_string(),
            least_common_range: decile_range_description(i64::from(pattern.least_common_decile))
                .to_string(),
            sample_size: pattern.game_count,
            hot_zones: hot,
            cold_zones: cold,
            recommendation,
        }
    }
}
