use serde::{Deserialize, Serialize};

use crate::indicators::market_analysis::{volume_confirmation, VolumeConfirmation};
use crate::indicators::MaTrend;
use crate::models::Signal;

/// Confidence assigned when every condition of a strong rule holds
pub const STRONG_CONFIDENCE: f64 = 0.8;
/// Confidence for moderate signals and HOLD
pub const BASE_CONFIDENCE: f64 = 0.5;

/// Configuration for the composite rule engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub momentum_threshold: f64,   // In standard deviations
    pub volatility_threshold: f64, // Annualized %, strong signals need < 1.5x this
    pub rsi_period: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub momentum_period: usize,   // MA period for momentum (needs +20 candles)
    pub volatility_period: usize, // Prices in the volatility window
    pub volume_window: usize,     // Volumes averaged for confirmation
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 2.0,
            volatility_threshold: 2.5,
            rsi_period: 14,
            ma_fast: 12,
            ma_slow: 26,
            momentum_period: 50,
            volatility_period: 20,
            volume_window: 10,
        }
    }
}

impl RuleConfig {
    /// Candles needed before the analyzer will produce a signal
    pub fn min_candles_required(&self) -> usize {
        self.ma_slow + 20
    }
}

/// Evaluate the decision table in priority order
///
/// Returns the signal with its base confidence, before adjustments.
pub fn generate_signal(
    momentum: f64,
    rsi: f64,
    trend: MaTrend,
    volatility: f64,
    config: &RuleConfig,
) -> (Signal, f64) {
    let threshold = config.momentum_threshold;
    let calm = volatility < config.volatility_threshold * 1.5;

    tracing::debug!(
        "Rule inputs: momentum={:.2}, RSI={:.1}, trend={:?}, volatility={:.2}%",
        momentum,
        rsi,
        trend,
        volatility
    );

    if momentum > threshold && rsi < 70.0 && trend == MaTrend::Bullish && calm {
        tracing::info!(
            "Strong BUY: momentum {:.2} > {:.2}, RSI<70, MA↑, volatility {:.2}% calm",
            momentum,
            threshold,
            volatility
        );
        (Signal::Buy, STRONG_CONFIDENCE)
    } else if momentum < -threshold && rsi > 30.0 && trend == MaTrend::Bearish && calm {
        tracing::info!(
            "Strong SELL: momentum {:.2} < -{:.2}, RSI>30, MA↓, volatility {:.2}% calm",
            momentum,
            threshold,
            volatility
        );
        (Signal::Sell, STRONG_CONFIDENCE)
    } else if momentum > threshold && rsi < 80.0 {
        tracing::info!("Moderate BUY: momentum {:.2}, RSI={:.1}", momentum, rsi);
        (Signal::Buy, BASE_CONFIDENCE)
    } else if momentum < -threshold && rsi > 20.0 {
        tracing::info!("Moderate SELL: momentum {:.2}, RSI={:.1}", momentum, rsi);
        (Signal::Sell, BASE_CONFIDENCE)
    } else {
        tracing::debug!(
            "HOLD: |momentum| {:.2} vs threshold {:.2}, RSI={:.1}",
            momentum.abs(),
            threshold,
            rsi
        );
        (Signal::Hold, BASE_CONFIDENCE)
    }
}

/// Apply volatility, RSI-extreme and volume adjustments, then clamp to [0, 1]
///
/// `volumes` is the full volume history; only the trailing `volume_window`
/// values are considered.
pub fn adjust_confidence(
    confidence: f64,
    rsi: f64,
    volatility: f64,
    volumes: &[f64],
    config: &RuleConfig,
) -> f64 {
    let mut confidence = confidence;

    if volatility > 0.0 {
        confidence *= (1.0 - volatility / 10.0).max(0.5);
    }

    if rsi > 75.0 || rsi < 25.0 {
        confidence *= 0.8;
    }

    let window_start = volumes.len().saturating_sub(config.volume_window);
    match volume_confirmation(&volumes[window_start..]) {
        Some(VolumeConfirmation::High) => confidence *= 1.1,
        Some(VolumeConfirmation::Low) => confidence *= 0.8,
        Some(VolumeConfirmation::Normal) | None => {}
    }

    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuleConfig::default();
        assert_eq!(config.momentum_threshold, 2.0);
        assert_eq!(config.volatility_threshold, 2.5);
        assert_eq!(config.min_candles_required(), 46);
    }

    #[test]
    fn test_strong_buy() {
        let config = RuleConfig::default();
        let (signal, confidence) = generate_signal(2.5, 60.0, MaTrend::Bullish, 1.0, &config);
        assert_eq!(signal, Signal::Buy);
        assert_eq!(confidence, STRONG_CONFIDENCE);
    }

    #[test]
    fn test_strong_sell() {
        let config = RuleConfig::default();
        let (signal, confidence) = generate_signal(-2.5, 40.0, MaTrend::Bearish, 1.0, &config);
        assert_eq!(signal, Signal::Sell);
        assert_eq!(confidence, STRONG_CONFIDENCE);
    }

    #[test]
    fn test_high_volatility_downgrades_to_moderate() {
        let config = RuleConfig::default();
        // 1.5 x 2.5 = 3.75 is the ceiling for strong signals
        let (signal, confidence) = generate_signal(2.5, 60.0, MaTrend::Bullish, 3.75, &config);
        assert_eq!(signal, Signal::Buy);
        assert_eq!(confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_moderate_buy_without_trend() {
        let config = RuleConfig::default();
        let (signal, confidence) = generate_signal(3.0, 75.0, MaTrend::Neutral, 1.0, &config);
        assert_eq!(signal, Signal::Buy);
        assert_eq!(confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_overbought_blocks_buy() {
        let config = RuleConfig::default();
        let (signal, _) = generate_signal(3.0, 85.0, MaTrend::Bullish, 1.0, &config);
        assert_eq!(signal, Signal::Hold);
    }

    #[test]
    fn test_moderate_sell() {
        let config = RuleConfig::default();
        let (signal, confidence) = generate_signal(-3.0, 25.0, MaTrend::Bearish, 1.0, &config);
        assert_eq!(signal, Signal::Sell);
        assert_eq!(confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_momentum_at_threshold_holds() {
        let config = RuleConfig::default();
        let (signal, confidence) = generate_signal(2.0, 50.0, MaTrend::Bullish, 1.0, &config);
        assert_eq!(signal, Signal::Hold);
        assert_eq!(confidence, BASE_CONFIDENCE);
    }

    #[test]
    fn test_volatility_dampening() {
        let config = RuleConfig::default();
        let volumes = vec![1000.0; 10];

        // 1 - 2/10 = 0.8
        let c = adjust_confidence(0.8, 50.0, 2.0, &volumes, &config);
        assert!((c - 0.64).abs() < 1e-12);

        // Floor at 0.5
        let c = adjust_confidence(0.8, 50.0, 40.0, &volumes, &config);
        assert!((c - 0.4).abs() < 1e-12);

        // Zero volatility leaves confidence untouched
        assert_eq!(adjust_confidence(0.8, 50.0, 0.0, &volumes, &config), 0.8);
    }

    #[test]
    fn test_rsi_extreme_penalty() {
        let config = RuleConfig::default();
        let volumes = vec![1000.0; 10];
        let c = adjust_confidence(0.5, 90.0, 0.0, &volumes, &config);
        assert!((c - 0.4).abs() < 1e-12);
        let c = adjust_confidence(0.5, 10.0, 0.0, &volumes, &config);
        assert!((c - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_volume_confirmation_adjustments() {
        let config = RuleConfig::default();

        let mut spike = vec![1000.0; 9];
        spike.push(5000.0);
        let c = adjust_confidence(0.5, 50.0, 0.0, &spike, &config);
        assert!((c - 0.55).abs() < 1e-12);

        let mut drought = vec![1000.0; 9];
        drought.push(100.0);
        let c = adjust_confidence(0.5, 50.0, 0.0, &drought, &config);
        assert!((c - 0.4).abs() < 1e-12);

        // No volume at all: no adjustment
        assert_eq!(adjust_confidence(0.5, 50.0, 0.0, &[0.0; 10], &config), 0.5);
        assert_eq!(adjust_confidence(0.5, 50.0, 0.0, &[], &config), 0.5);
    }

    #[test]
    fn test_only_trailing_window_counts() {
        let config = RuleConfig::default();
        // Huge early volumes fall outside the 10-candle window
        let mut volumes = vec![1_000_000.0; 20];
        volumes.extend(vec![1000.0; 10]);
        assert_eq!(adjust_confidence(0.5, 50.0, 0.0, &volumes, &config), 0.5);
    }

    #[test]
    fn test_confidence_clamped() {
        let config = RuleConfig::default();
        let mut spike = vec![1000.0; 9];
        spike.push(5000.0);
        assert_eq!(adjust_confidence(1.0, 50.0, 0.0, &spike, &config), 1.0);
    }
}
