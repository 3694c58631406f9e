//! Momentum as the distance of price from its moving average, in standard deviations

use super::round_to;
use crate::error::{AnalysisError, Result};

/// Number of most recent prices used for the deviation estimate
pub const MOMENTUM_DEVIATION_WINDOW: usize = 20;

/// Momentum over a window of `ma_period + 20` prices, or None if the window is incomplete
fn momentum_value(prices: &[f64], ma_period: usize) -> Option<f64> {
    let window_len = ma_period + MOMENTUM_DEVIATION_WINDOW;
    if ma_period == 0 || prices.len() < window_len {
        return None;
    }

    let recent = &prices[prices.len() - window_len..];
    // MA of the oldest `ma_period` prices in the window
    let ma = recent[..ma_period].iter().sum::<f64>() / ma_period as f64;
    let current_price = recent[recent.len() - 1];

    // RMS deviation of the last 20 prices from that MA
    let deviation_sq: f64 = recent[recent.len() - MOMENTUM_DEVIATION_WINDOW..]
        .iter()
        .map(|p| (p - ma).powi(2))
        .sum();
    let std_dev = (deviation_sq / MOMENTUM_DEVIATION_WINDOW as f64).sqrt();

    if std_dev == 0.0 {
        return Some(0.0);
    }

    Some(round_to((current_price - ma) / std_dev, 2))
}

/// Calculate momentum (price deviation from MA in standard deviations)
///
/// Returns 0.0 both when fewer than `ma_period + 20` prices are supplied and when
/// the deviation is zero. Callers that must tell "no data" from "no momentum"
/// should use [`try_momentum`].
pub fn calculate_momentum(prices: &[f64], ma_period: usize) -> f64 {
    momentum_value(prices, ma_period).unwrap_or(0.0)
}

/// Like [`calculate_momentum`], but reports thin history as `InsufficientData`
pub fn try_momentum(prices: &[f64], ma_period: usize) -> Result<f64> {
    momentum_value(prices, ma_period).ok_or(AnalysisError::InsufficientData {
        required: ma_period.max(1) + MOMENTUM_DEVIATION_WINDOW,
        available: prices.len(),
    })
}

/// Minimum history for a real (non-fallback) momentum reading
pub fn momentum_history_required(ma_period: usize) -> usize {
    ma_period + MOMENTUM_DEVIATION_WINDOW
}
