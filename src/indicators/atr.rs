//! Average True Range (ATR) indicator
//!
//! Measures market volatility by calculating the average of true ranges over a period.
//! True Range is the greatest of:
//! - Current High - Current Low
//! - Abs(Current High - Previous Close)
//! - Abs(Current Low - Previous Close)
//!
//! Smoothed with Wilder's method after an SMA seed.

use crate::models::Candle;

use super::Series;

/// True range of each candle against the previous close
///
/// Returns one value per candle from index 1 onward.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| {
            let high = w[1].high;
            let low = w[1].low;
            let prev_close = w[0].close;

            (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs())
        })
        .collect()
}

/// ATR series aligned with `candles`
///
/// The first ATR (index `period`) is the simple average of the first `period`
/// true ranges; later values use Wilder's smoothing. Earlier entries are `None`.
pub fn atr_series(candles: &[Candle], period: usize) -> Series {
    if period == 0 || candles.len() < period + 1 {
        return vec![None; candles.len()];
    }

    let true_ranges = true_ranges(candles);
    let mut series = vec![None; period];

    // First ATR is simple average of first 'period' true ranges
    let mut atr: f64 = true_ranges.iter().take(period).sum::<f64>() / period as f64;
    series.push(Some(atr));

    // Apply Wilder's smoothing for subsequent values
    for tr in &true_ranges[period..] {
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
        series.push(Some(atr));
    }

    series
}

/// Calculate ATR for the given candles
///
/// Returns the current ATR value, or None if insufficient data
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    atr_series(candles, period).last().copied().flatten()
}
