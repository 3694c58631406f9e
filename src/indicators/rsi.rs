use serde::{Deserialize, Serialize};

use super::Series;

/// RSI reported when the window has no losses (including a completely flat window)
pub const RSI_NO_LOSS: f64 = 100.0;

/// Split price changes into (gains, losses), both non-negative
fn gains_and_losses(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return RSI_NO_LOSS;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Consecutive RSI values, one per complete window of `period` price changes
///
/// The first value corresponds to price index `period`.
fn rsi_values(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let (gains, losses) = gains_and_losses(prices);
    gains
        .windows(period)
        .zip(losses.windows(period))
        .map(|(g, l)| {
            let avg_gain = g.iter().sum::<f64>() / period as f64;
            let avg_loss = l.iter().sum::<f64>() / period as f64;
            rsi_from_averages(avg_gain, avg_loss)
        })
        .collect()
}

/// Relative Strength Index series, aligned with `prices`
///
/// Uses simple averages of gains and losses over the trailing `period` changes.
/// The first `period` entries are `None`.
pub fn rsi_series(prices: &[f64], period: usize) -> Series {
    let values = rsi_values(prices, period);
    if values.is_empty() {
        return vec![None; prices.len()];
    }

    let mut series = vec![None; period];
    series.extend(values.into_iter().map(Some));
    series
}

/// Calculate Relative Strength Index (RSI)
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let (gains, losses) = gains_and_losses(&prices[prices.len() - period - 1..]);
    let avg_gain = gains.iter().sum::<f64>() / period as f64;
    let avg_loss = losses.iter().sum::<f64>() / period as f64;

    Some(rsi_from_averages(avg_gain, avg_loss))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StochZone {
    Oversold,
    Neutral,
    Overbought,
}

impl StochZone {
    pub fn classify(k: f64) -> Self {
        if k < 20.0 {
            StochZone::Oversold
        } else if k > 80.0 {
            StochZone::Overbought
        } else {
            StochZone::Neutral
        }
    }
}

/// Latest Stochastic RSI reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochRsi {
    pub k: f64,
    pub d: f64,
    #[serde(rename = "signal")]
    pub zone: StochZone,
}

fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Calculate Stochastic RSI (%K and %D)
///
/// RSI values are min-max normalised over `stoch_period` to [0, 100], smoothed
/// with an SMA of `k_period` (%K), and %K is smoothed again with `d_period` (%D).
/// A window with zero RSI range yields a stochastic value of 0.
///
/// Returns None unless at least `rsi_period + stoch_period + k_period + d_period`
/// prices are supplied.
pub fn stochastic_rsi(
    prices: &[f64],
    rsi_period: usize,
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
) -> Option<StochRsi> {
    if [rsi_period, stoch_period, k_period, d_period].contains(&0) {
        return None;
    }
    if prices.len() < rsi_period + stoch_period + k_period + d_period {
        return None;
    }

    let rsi = rsi_values(prices, rsi_period);
    if rsi.len() < stoch_period {
        return None;
    }

    let stoch: Vec<f64> = rsi
        .windows(stoch_period)
        .map(|window| {
            let min = window.iter().copied().fold(f64::INFINITY, f64::min);
            let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let current = window[window.len() - 1];
            if max - min == 0.0 {
                0.0
            } else {
                (current - min) / (max - min) * 100.0
            }
        })
        .collect();

    if stoch.len() < k_period {
        return None;
    }
    let k_values = rolling_mean(&stoch, k_period);

    if k_values.len() < d_period {
        return None;
    }
    let d_values = rolling_mean(&k_values, d_period);

    let k = *k_values.last()?;
    let d = *d_values.last()?;

    Some(StochRsi {
        k,
        d,
        zone: StochZone::classify(k),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_calculation() {
        // Test with known values
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5,
        ];

        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_some());

        let rsi_value = rsi.unwrap();
        assert!(rsi_value > 0.0 && rsi_value < 100.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0, 102.0, 101.0];
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_none());
        assert!(rsi_series(&prices, 14).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let rsi = calculate_rsi(&prices, 5);
        assert!(rsi.is_some());
        assert_eq!(rsi.unwrap(), 100.0); // All gains = RSI 100
    }

    #[test]
    fn test_rsi_flat_prices_is_100() {
        // avg_gain == avg_loss == 0: no losses, so RSI is pinned at 100
        let prices = vec![50.0; 20];
        assert_eq!(calculate_rsi(&prices, 14), Some(RSI_NO_LOSS));
        assert_eq!(rsi_series(&prices, 14).last().copied().flatten(), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 5), Some(0.0));
    }

    #[test]
    fn test_rsi_series_matches_latest() {
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5, 45.0, 44.0,
        ];
        let series = rsi_series(&prices, 14);

        assert_eq!(series.len(), prices.len());
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));

        let latest = series.last().copied().flatten().unwrap();
        assert!((latest - calculate_rsi(&prices, 14).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_stoch_rsi_insufficient_data() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert!(stochastic_rsi(&prices, 14, 14, 3, 3).is_none());
    }

    #[test]
    fn test_stoch_rsi_flat_range_is_zero() {
        // Constant uptrend: RSI pinned at 100, zero range -> stochastic 0 -> oversold
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let stoch = stochastic_rsi(&prices, 14, 14, 3, 3).unwrap();

        assert_eq!(stoch.k, 0.0);
        assert_eq!(stoch.d, 0.0);
        assert_eq!(stoch.zone, StochZone::Oversold);
    }

    #[test]
    fn test_stoch_rsi_bounds() {
        let prices: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let stoch = stochastic_rsi(&prices, 14, 14, 3, 3).unwrap();

        assert!((0.0..=100.0).contains(&stoch.k));
        assert!((0.0..=100.0).contains(&stoch.d));
    }

    #[test]
    fn test_stoch_rsi_rebound_is_overbought() {
        // Choppy decline (-2, +1), then five straight +3 bars
        let mut prices = vec![150.0];
        for i in 0..40 {
            let step = if i % 2 == 0 { -2.0 } else { 1.0 };
            prices.push(prices[prices.len() - 1] + step);
        }
        for _ in 0..5 {
            prices.push(prices[prices.len() - 1] + 3.0);
        }

        let stoch = stochastic_rsi(&prices, 14, 14, 3, 3).unwrap();
        assert!(stoch.k > 80.0, "K = {}", stoch.k);
        assert_eq!(stoch.zone, StochZone::Overbought);
    }

    #[test]
    fn test_stoch_zone_classification() {
        assert_eq!(StochZone::classify(10.0), StochZone::Oversold);
        assert_eq!(StochZone::classify(50.0), StochZone::Neutral);
        assert_eq!(StochZone::classify(90.0), StochZone::Overbought);
    }
}
