//! Price / indicator divergence detection

use serde::{Deserialize, Serialize};

use super::moving_average::ema_series;
use super::Series;

pub const DEFAULT_DIVERGENCE_LOOKBACK: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divergence {
    #[serde(rename = "bullish_rsi_divergence")]
    BullishRsi,
    #[serde(rename = "bullish_macd_divergence")]
    BullishMacd,
    #[serde(rename = "bearish_rsi_divergence")]
    BearishRsi,
    #[serde(rename = "bearish_macd_divergence")]
    BearishMacd,
}

impl Divergence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Divergence::BullishRsi => "bullish_rsi_divergence",
            Divergence::BullishMacd => "bullish_macd_divergence",
            Divergence::BearishRsi => "bearish_rsi_divergence",
            Divergence::BearishMacd => "bearish_macd_divergence",
        }
    }
}

/// EMA(fast) - EMA(slow), aligned with `prices`
pub fn macd_proxy_series(prices: &[f64], fast: usize, slow: usize) -> Series {
    ema_series(prices, fast)
        .into_iter()
        .zip(ema_series(prices, slow))
        .map(|(f, s)| Some(f? - s?))
        .collect()
}

/// Last-minus-first over the trailing `lookback` entries, if every one is present
fn trailing_trend(series: &[Option<f64>], lookback: usize) -> Option<f64> {
    if series.len() < lookback {
        return None;
    }

    let recent: Vec<f64> = series[series.len() - lookback..]
        .iter()
        .flatten()
        .copied()
        .collect();
    if recent.len() < lookback {
        return None;
    }

    Some(recent[recent.len() - 1] - recent[0])
}

/// Detect bullish and bearish divergences between price and RSI / MACD
///
/// Price trend and indicator trends are last-minus-first over the trailing
/// `lookback` entries. Bullish: price falling, indicator rising. Bearish: price
/// rising, indicator falling. Returns no divergences unless every series has
/// `lookback` present values in that window.
pub fn detect_divergences(
    prices: &[f64],
    rsi: &[Option<f64>],
    macd: &[Option<f64>],
    lookback: usize,
) -> Vec<Divergence> {
    let mut divergences = Vec::new();

    if lookback < 2 || prices.len() < lookback {
        return divergences;
    }

    let (Some(rsi_trend), Some(macd_trend)) =
        (trailing_trend(rsi, lookback), trailing_trend(macd, lookback))
    else {
        return divergences;
    };

    let recent_prices = &prices[prices.len() - lookback..];
    let price_trend = recent_prices[lookback - 1] - recent_prices[0];

    if price_trend < 0.0 {
        if rsi_trend > 0.0 {
            divergences.push(Divergence::BullishRsi);
        }
        if macd_trend > 0.0 {
            divergences.push(Divergence::BullishMacd);
        }
    } else if price_trend > 0.0 {
        if rsi_trend < 0.0 {
            divergences.push(Divergence::BearishRsi);
        }
        if macd_trend < 0.0 {
            divergences.push(Divergence::BearishMacd);
        }
    }

    divergences
}
