use serde::{Deserialize, Serialize};

/// Periods per year used to annualize a per-period standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annualization {
    /// 252 trading days, used by the signal rules
    TradingDays,
    /// 365 calendar days, used by portfolio metrics (crypto trades every day)
    CalendarDays,
}

impl Annualization {
    pub fn periods_per_year(self) -> f64 {
        match self {
            Annualization::TradingDays => 252.0,
            Annualization::CalendarDays => 365.0,
        }
    }

    pub fn factor(self) -> f64 {
        self.periods_per_year().sqrt()
    }
}

/// Simple period-over-period returns; a zero previous price yields 0.0
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            if w[0] != 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Some(variance.sqrt())
}

/// Annualized volatility in percent over the trailing `period` prices
///
/// Standard deviation of the `period - 1` simple returns, scaled by the square root
/// of the periods per year and expressed as a percentage. Returns None when fewer
/// than `period` prices (or fewer than 2) are available.
pub fn annualized_volatility(
    prices: &[f64],
    period: usize,
    annualization: Annualization,
) -> Option<f64> {
    if period < 2 || prices.len() < period {
        return None;
    }

    let returns = simple_returns(&prices[prices.len() - period..]);
    let std_dev = std_dev(&returns)?;

    Some(std_dev * annualization.factor() * 100.0)
}
