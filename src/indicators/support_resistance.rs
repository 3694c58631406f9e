//! Support and resistance detection
//!
//! Local lows/highs (strictly beyond two neighbours on each side) within a lookback
//! window are clustered by relative distance and averaged into levels.

use serde::{Deserialize, Serialize};

use crate::models::Candle;

pub const DEFAULT_SR_THRESHOLD: f64 = 0.02;
pub const DEFAULT_SR_LOOKBACK: usize = 50;

const LEVELS_REPORTED: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Up to three highest support levels, ascending
    pub support_levels: Vec<f64>,
    /// Up to three lowest resistance levels, ascending
    pub resistance_levels: Vec<f64>,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
    /// Percent of current price
    pub distance_to_support: Option<f64>,
    /// Percent of current price
    pub distance_to_resistance: Option<f64>,
}

fn is_local_extreme(values: &[f64], i: usize, beyond: impl Fn(f64, f64) -> bool) -> bool {
    let v = values[i];
    beyond(v, values[i - 1])
        && beyond(v, values[i - 2])
        && beyond(v, values[i + 1])
        && beyond(v, values[i + 2])
}

fn local_extremes(values: &[f64], beyond: impl Fn(f64, f64) -> bool + Copy) -> Vec<f64> {
    if values.len() < 5 {
        return Vec::new();
    }

    (2..values.len() - 2)
        .filter(|&i| is_local_extreme(values, i, beyond))
        .map(|i| values[i])
        .collect()
}

/// Group sorted levels whose relative gap to the previous member is within
/// `threshold`, and average each group
pub fn cluster_levels(levels: &[f64], threshold: f64) -> Vec<f64> {
    if levels.is_empty() {
        return Vec::new();
    }

    let mut sorted = levels.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut clusters = Vec::new();
    let mut current = vec![sorted[0]];

    for &level in &sorted[1..] {
        let last = current[current.len() - 1];
        let within = if last != 0.0 {
            (level - last).abs() / last.abs() <= threshold
        } else {
            level == last
        };

        if within {
            current.push(level);
        } else {
            clusters.push(current.iter().sum::<f64>() / current.len() as f64);
            current = vec![level];
        }
    }
    clusters.push(current.iter().sum::<f64>() / current.len() as f64);

    clusters
}

/// Detect support and resistance levels over the trailing `lookback` candles
///
/// If fewer than `lookback` candles exist the whole history is scanned.
pub fn detect_support_resistance(
    candles: &[Candle],
    threshold: f64,
    lookback: usize,
) -> SupportResistance {
    if candles.is_empty() {
        return SupportResistance::default();
    }

    let lookback = lookback.min(candles.len());
    let recent = &candles[candles.len() - lookback..];
    let current_price = candles[candles.len() - 1].close;

    let lows: Vec<f64> = recent.iter().map(|c| c.low).collect();
    let highs: Vec<f64> = recent.iter().map(|c| c.high).collect();

    let support = cluster_levels(&local_extremes(&lows, |v, n| v < n), threshold);
    let resistance = cluster_levels(&local_extremes(&highs, |v, n| v > n), threshold);

    let nearest_support = support
        .iter()
        .copied()
        .filter(|&s| s < current_price)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));
    let nearest_resistance = resistance
        .iter()
        .copied()
        .filter(|&r| r > current_price)
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.min(r))));

    let pct_of_price = |distance: f64| {
        if current_price != 0.0 {
            Some(distance / current_price * 100.0)
        } else {
            None
        }
    };

    // Clusters come out ascending
    let support_levels = support[support.len().saturating_sub(LEVELS_REPORTED)..].to_vec();
    let resistance_levels = resistance.iter().copied().take(LEVELS_REPORTED).collect();

    SupportResistance {
        support_levels,
        resistance_levels,
        nearest_support,
        nearest_resistance,
        distance_to_support: nearest_support.and_then(|s| pct_of_price(current_price - s)),
        distance_to_resistance: nearest_resistance.and_then(|r| pct_of_price(r - current_price)),
    }
}
