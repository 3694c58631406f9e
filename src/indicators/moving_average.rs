use serde::{Deserialize, Serialize};

use super::Series;

/// Simple Moving Average series, aligned with `prices`
///
/// Entries before index `period - 1` are `None`. If the input is shorter
/// than `period` the whole series is `None`.
pub fn sma_series(prices: &[f64], period: usize) -> Series {
    if period == 0 || prices.len() < period {
        return vec![None; prices.len()];
    }

    let mut series = vec![None; period - 1];
    series.extend(
        prices
            .windows(period)
            .map(|window| Some(window.iter().sum::<f64>() / period as f64)),
    );
    series
}

/// Exponential Moving Average series, seeded with the SMA of the first `period` prices
pub fn ema_series(prices: &[f64], period: usize) -> Series {
    if period == 0 || prices.len() < period {
        return vec![None; prices.len()];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut series = vec![None; period - 1];

    let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
    series.push(Some(ema));

    for price in &prices[period..] {
        ema = (price - ema) * multiplier + ema;
        series.push(Some(ema));
    }

    series
}

/// Weighted Moving Average series (weights 1..=period, newest weighted highest)
pub fn wma_series(prices: &[f64], period: usize) -> Series {
    if period == 0 || prices.len() < period {
        return vec![None; prices.len()];
    }

    let weight_sum = (period * (period + 1) / 2) as f64;
    let mut series = vec![None; period - 1];
    series.extend(prices.windows(period).map(|window| {
        let weighted: f64 = window
            .iter()
            .enumerate()
            .map(|(i, price)| (i + 1) as f64 * price)
            .sum();
        Some(weighted / weight_sum)
    }));
    series
}

/// Calculate Simple Moving Average (SMA) of the trailing window
pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Calculate Exponential Moving Average (EMA) at the last price
pub fn calculate_ema(prices: &[f64], period: usize) -> Option<f64> {
    ema_series(prices, period).last().copied().flatten()
}

/// Calculate Weighted Moving Average (WMA) at the last price
pub fn calculate_wma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let weight_sum = (period * (period + 1) / 2) as f64;
    let weighted: f64 = window
        .iter()
        .enumerate()
        .map(|(i, price)| (i + 1) as f64 * price)
        .sum();
    Some(weighted / weight_sum)
}

/// Direction implied by a fast/slow moving average pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaTrend {
    Bullish,
    Bearish,
    Neutral,
}

/// Compare a fast and slow average: fast above slow is bullish
pub fn ma_trend(fast: f64, slow: f64) -> MaTrend {
    if fast > slow {
        MaTrend::Bullish
    } else if fast < slow {
        MaTrend::Bearish
    } else {
        MaTrend::Neutral
    }
}
