//! Portfolio risk metrics over daily return series
//!
//! Crypto trades every day, so annualization uses 365 periods throughout.

use serde::{Deserialize, Serialize};

use crate::indicators::round_to;
use crate::indicators::volatility::{mean, simple_returns, std_dev, Annualization};

const ANNUALIZATION: Annualization = Annualization::CalendarDays;

/// Simple returns; a zero previous price yields a 0.0 return
pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
    simple_returns(prices)
}

/// Pearson correlation rounded to 4 decimals
///
/// None when the series differ in length, have fewer than 2 points, or either
/// has zero variance.
pub fn calculate_correlation(returns_a: &[f64], returns_b: &[f64]) -> Option<f64> {
    if returns_a.len() != returns_b.len() || returns_a.len() < 2 {
        return None;
    }

    let mean_a = mean(returns_a)?;
    let mean_b = mean(returns_b)?;

    let (mut covariance, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (a, b) in returns_a.iter().zip(returns_b) {
        let da = a - mean_a;
        let db = b - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return None;
    }

    Some(round_to(covariance / denominator, 4))
}

/// Pairwise correlations, rows and columns in `assets` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub assets: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, asset_a: &str, asset_b: &str) -> Option<f64> {
        let i = self.assets.iter().position(|a| a == asset_a)?;
        let j = self.assets.iter().position(|a| a == asset_b)?;
        Some(self.matrix[i][j])
    }
}

/// Correlation matrix with 1.0 on the diagonal and 0.0 for undefined pairs
pub fn correlation_matrix(asset_returns: &[(String, Vec<f64>)]) -> CorrelationMatrix {
    let matrix = asset_returns
        .iter()
        .enumerate()
        .map(|(i, (_, returns_a))| {
            asset_returns
                .iter()
                .enumerate()
                .map(|(j, (_, returns_b))| {
                    if i == j {
                        1.0
                    } else {
                        calculate_correlation(returns_a, returns_b).unwrap_or(0.0)
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        assets: asset_returns.iter().map(|(asset, _)| asset.clone()).collect(),
        matrix,
    }
}

/// Keep the most recent `n` entries of every series, `n` being the shortest length
pub fn align_returns(returns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let shortest = returns.iter().map(Vec::len).min().unwrap_or(0);
    returns
        .iter()
        .map(|series| series[series.len() - shortest..].to_vec())
        .collect()
}

/// Weighted sum of asset returns per period
///
/// Series of unequal length are tail-aligned to the shortest one.
pub fn portfolio_returns(weights: &[f64], returns: &[Vec<f64>]) -> Vec<f64> {
    if weights.is_empty() || returns.is_empty() {
        return Vec::new();
    }

    let aligned = align_returns(returns);
    let periods = aligned[0].len();

    (0..periods)
        .map(|i| {
            weights
                .iter()
                .zip(&aligned)
                .map(|(w, series)| w * series[i])
                .sum()
        })
        .collect()
}

/// Annualized standard deviation of a return series (fraction, not percent)
pub fn annualized_std(returns: &[f64]) -> Option<f64> {
    std_dev(returns).map(|sd| sd * ANNUALIZATION.factor())
}

/// Annualized volatility of the weighted portfolio (fraction, not percent)
pub fn portfolio_volatility(weights: &[f64], returns: &[Vec<f64>]) -> f64 {
    annualized_std(&portfolio_returns(weights, returns)).unwrap_or(0.0)
}

/// Annualized Sharpe ratio, rounded to 3 decimals
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let annual_return = mean(returns)? * ANNUALIZATION.periods_per_year();
    let annual_volatility = annualized_std(returns)?;
    if annual_volatility == 0.0 {
        return None;
    }

    Some(round_to((annual_return - risk_free_rate) / annual_volatility, 3))
}

/// Annualized Sortino ratio, rounded to 3 decimals
///
/// Downside deviation is the root mean square of the negative returns taken over
/// the full sample. None when there are no negative returns.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let annual_return = mean(returns)? * ANNUALIZATION.periods_per_year();

    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return None;
    }

    let downside_variance = downside.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64;
    let downside_deviation = downside_variance.sqrt() * ANNUALIZATION.factor();
    if downside_deviation == 0.0 {
        return None;
    }

    Some(round_to((annual_return - risk_free_rate) / downside_deviation, 3))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    pub max_drawdown_pct: f64, // Rounded to 2 decimals
    pub peak_idx: usize,
    pub trough_idx: usize,
}

/// Largest peak-to-trough decline in a value series
///
/// `peak_idx` is the peak that preceded the deepest trough.
pub fn max_drawdown(values: &[f64]) -> Drawdown {
    let mut result = Drawdown {
        max_drawdown_pct: 0.0,
        peak_idx: 0,
        trough_idx: 0,
    };
    if values.len() < 2 {
        return result;
    }

    let mut max_dd = 0.0;
    let mut peak = values[0];
    let mut peak_idx = 0;

    for (i, &value) in values.iter().enumerate() {
        if value > peak {
            peak = value;
            peak_idx = i;
        }

        if peak > 0.0 {
            let drawdown = (peak - value) / peak;
            if drawdown > max_dd {
                max_dd = drawdown;
                result.peak_idx = peak_idx;
                result.trough_idx = i;
            }
        }
    }

    result.max_drawdown_pct = round_to(max_dd * 100.0, 2);
    result
}

/// Weighted average volatility over correlated portfolio volatility, 3 decimals
///
/// Above 1.0 means correlations below 1 are reducing risk.
pub fn diversification_ratio(
    weights: &[f64],
    volatilities: &[f64],
    correlations: &[Vec<f64>],
) -> Option<f64> {
    let n = weights.len();
    if n == 0 || volatilities.len() != n || correlations.len() != n {
        return None;
    }
    if correlations.iter().any(|row| row.len() != n) {
        return None;
    }

    let weighted_vol: f64 = weights.iter().zip(volatilities).map(|(w, v)| w * v).sum();

    let mut variance = 0.0;
    for i in 0..n {
        for j in 0..n {
            variance +=
                weights[i] * weights[j] * volatilities[i] * volatilities[j] * correlations[i][j];
        }
    }

    // Negative correlations can push the quadratic form below zero
    if variance <= 0.0 {
        return None;
    }

    Some(round_to(weighted_vol / variance.sqrt(), 3))
}

/// Historical Value at Risk as a positive percentage, 2 decimals
///
/// Needs at least 10 returns.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Option<f64> {
    if returns.len() < 10 {
        return None;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = (((1.0 - confidence) * sorted.len() as f64) as usize).min(sorted.len() - 1);
    Some(round_to(sorted[index].abs() * 100.0, 2))
}
