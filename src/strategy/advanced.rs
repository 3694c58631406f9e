//! Advanced signal tags
//!
//! Tags annotate an analysis with setups worth a second look; they never change
//! the composite BUY/SELL/HOLD signal.

use serde::{Deserialize, Serialize, Serializer};

use crate::indicators::divergence::DEFAULT_DIVERGENCE_LOOKBACK;
use crate::indicators::support_resistance::{DEFAULT_SR_LOOKBACK, DEFAULT_SR_THRESHOLD};
use crate::indicators::{
    Divergence, Ichimoku, IchimokuSignal, StochRsi, StochZone, SupportResistance,
};

/// Periods and thresholds for the advanced indicator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub sr_threshold: f64, // Relative distance for clustering levels (0.02 = 2%)
    pub sr_lookback: usize,
    pub atr_period: usize,
    pub stoch_rsi_period: usize,
    pub stoch_period: usize,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub wma_period: usize,
    pub divergence_lookback: usize,
    pub near_level_pct: f64, // % distance that counts as "near" a level
    pub high_atr_pct: f64,   // ATR as % of price above this is high volatility
    pub low_atr_pct: f64,    // ... below this is consolidation
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            sr_threshold: DEFAULT_SR_THRESHOLD,
            sr_lookback: DEFAULT_SR_LOOKBACK,
            atr_period: 14,
            stoch_rsi_period: 14,
            stoch_period: 14,
            stoch_k_period: 3,
            stoch_d_period: 3,
            ema_fast: 12,
            ema_slow: 26,
            wma_period: 20,
            divergence_lookback: DEFAULT_DIVERGENCE_LOOKBACK,
            near_level_pct: 2.0,
            high_atr_pct: 5.0,
            low_atr_pct: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancedSignal {
    NearSupportBounce,
    NearResistanceRejection,
    HighVolatilityCaution,
    LowVolatilityConsolidation,
    StochRsiOversoldReversal,
    StochRsiOverboughtReversal,
    Ichimoku(IchimokuSignal),
    Divergence(Divergence),
}

impl AdvancedSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvancedSignal::NearSupportBounce => "near_support_bounce_opportunity",
            AdvancedSignal::NearResistanceRejection => "near_resistance_rejection_risk",
            AdvancedSignal::HighVolatilityCaution => "high_volatility_caution",
            AdvancedSignal::LowVolatilityConsolidation => "low_volatility_consolidation",
            AdvancedSignal::StochRsiOversoldReversal => "stoch_rsi_oversold_reversal",
            AdvancedSignal::StochRsiOverboughtReversal => "stoch_rsi_overbought_reversal",
            AdvancedSignal::Ichimoku(IchimokuSignal::StrongBullish) => "ichimoku_strong_bullish",
            AdvancedSignal::Ichimoku(IchimokuSignal::Bullish) => "ichimoku_bullish",
            AdvancedSignal::Ichimoku(IchimokuSignal::StrongBearish) => "ichimoku_strong_bearish",
            AdvancedSignal::Ichimoku(IchimokuSignal::Bearish) => "ichimoku_bearish",
            AdvancedSignal::Divergence(divergence) => divergence.as_str(),
        }
    }
}

impl std::fmt::Display for AdvancedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AdvancedSignal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// ATR as a percentage of price; None when either is missing or zero
pub fn atr_percent(atr: Option<f64>, price: f64) -> Option<f64> {
    match atr {
        Some(atr) if atr > 0.0 && price != 0.0 => Some(atr / price * 100.0),
        _ => None,
    }
}

/// Derive advanced tags from the indicator snapshot
///
/// Tags are emitted in a fixed order: support/resistance proximity, ATR regime,
/// Stochastic RSI zone, Ichimoku signal, then divergences.
pub fn advanced_signals(
    support_resistance: &SupportResistance,
    atr_pct: Option<f64>,
    stoch_rsi: Option<&StochRsi>,
    ichimoku: Option<&Ichimoku>,
    divergences: &[Divergence],
    config: &AdvancedConfig,
) -> Vec<AdvancedSignal> {
    let mut signals = Vec::new();

    if matches!(support_resistance.distance_to_support, Some(d) if d < config.near_level_pct) {
        signals.push(AdvancedSignal::NearSupportBounce);
    }
    if matches!(support_resistance.distance_to_resistance, Some(d) if d < config.near_level_pct)
    {
        signals.push(AdvancedSignal::NearResistanceRejection);
    }

    if let Some(pct) = atr_pct {
        if pct > config.high_atr_pct {
            signals.push(AdvancedSignal::HighVolatilityCaution);
        } else if pct < config.low_atr_pct {
            signals.push(AdvancedSignal::LowVolatilityConsolidation);
        }
    }

    match stoch_rsi.map(|s| s.zone) {
        Some(StochZone::Oversold) => signals.push(AdvancedSignal::StochRsiOversoldReversal),
        Some(StochZone::Overbought) => signals.push(AdvancedSignal::StochRsiOverboughtReversal),
        _ => {}
    }

    if let Some(signal) = ichimoku.and_then(|i| i.signal) {
        signals.push(AdvancedSignal::Ichimoku(signal));
    }

    signals.extend(divergences.iter().copied().map(AdvancedSignal::Divergence));

    signals
}
