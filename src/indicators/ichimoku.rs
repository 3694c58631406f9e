//! Ichimoku Cloud
//!
//! All-in-one trend indicator built from midpoints of the highest high and lowest low
//! over three lookbacks (9, 26, 52). Values here are the current readings; the forward
//! and backward displacement of the spans is a charting concern and is not applied.

use serde::{Deserialize, Serialize};

use crate::models::Candle;

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudColor {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudPosition {
    Above,
    Below,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IchimokuSignal {
    StrongBullish,
    Bullish,
    StrongBearish,
    Bearish,
}

impl IchimokuSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            IchimokuSignal::StrongBullish => "strong_bullish",
            IchimokuSignal::Bullish => "bullish",
            IchimokuSignal::StrongBearish => "strong_bearish",
            IchimokuSignal::Bearish => "bearish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ichimoku {
    pub tenkan_sen: f64,
    pub kijun_sen: f64,
    pub senkou_span_a: f64,
    pub senkou_span_b: f64,
    pub chikou_span: f64,
    pub cloud_color: CloudColor,
    pub price_vs_cloud: CloudPosition,
    pub signal: Option<IchimokuSignal>,
}

/// (highest high + lowest low) / 2 over the trailing `period` candles
fn midpoint(candles: &[Candle], period: usize) -> Option<f64> {
    if candles.len() < period || period == 0 {
        return None;
    }

    let window = &candles[candles.len() - period..];
    let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    Some((highest + lowest) / 2.0)
}

/// Calculate Ichimoku Cloud components; needs at least 52 candles
pub fn ichimoku(candles: &[Candle]) -> Option<Ichimoku> {
    if candles.len() < SENKOU_B_PERIOD {
        return None;
    }

    let tenkan = midpoint(candles, TENKAN_PERIOD)?;
    let kijun = midpoint(candles, KIJUN_PERIOD)?;
    let senkou_a = (tenkan + kijun) / 2.0;
    let senkou_b = midpoint(candles, SENKOU_B_PERIOD)?;
    let current_price = candles[candles.len() - 1].close;

    let cloud_color = if senkou_a > senkou_b {
        CloudColor::Bullish
    } else {
        CloudColor::Bearish
    };

    let price_vs_cloud = if current_price > senkou_a.max(senkou_b) {
        CloudPosition::Above
    } else if current_price < senkou_a.min(senkou_b) {
        CloudPosition::Below
    } else {
        CloudPosition::Inside
    };

    let signal = if tenkan > kijun {
        if price_vs_cloud == CloudPosition::Above {
            Some(IchimokuSignal::StrongBullish)
        } else {
            Some(IchimokuSignal::Bullish)
        }
    } else if tenkan < kijun {
        if price_vs_cloud == CloudPosition::Below {
            Some(IchimokuSignal::StrongBearish)
        } else {
            Some(IchimokuSignal::Bearish)
        }
    } else {
        None
    };

    Some(Ichimoku {
        tenkan_sen: tenkan,
        kijun_sen: kijun,
        senkou_span_a: senkou_a,
        senkou_span_b: senkou_b,
        chikou_span: current_price,
        cloud_color,
        price_vs_cloud,
        signal,
    })
}
