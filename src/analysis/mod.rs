// Analysis engine
// Turns a candle history into an indicator snapshot and a composite signal

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::indicators::{
    annualized_volatility, calculate_atr, calculate_average_volume, calculate_momentum,
    calculate_rsi, calculate_sma, calculate_wma, detect_divergences, detect_support_resistance,
    ema_series, ichimoku, ma_trend, macd_proxy_series, momentum_history_required, round_to,
    rsi_series, stochastic_rsi, volume_ratio, Annualization, Divergence, Ichimoku, MaTrend,
    StochRsi, SupportResistance,
};
use crate::models::{MarketData, Signal};
use crate::strategy::{
    adjust_confidence, advanced_signals, atr_percent, generate_signal, AdvancedSignal,
};

/// Latest indicator readings behind a composite signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub momentum: f64,
    pub momentum_threshold: f64,
    pub volatility: f64,
    pub volatility_threshold: f64,
    pub rsi: f64,
    pub rsi_period: usize,
    pub ma_fast: f64,
    pub ma_slow: f64,
    pub ma_signal: MaTrend,
    pub price_change_pct: f64,
    pub recent_volume: f64,
    pub avg_volume: f64,
    pub volume_ratio: f64,
}

/// Composite analysis of one pair
///
/// Serializes to a single flat JSON document; the advanced snapshot is nested
/// under `advanced` when requested.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub pair: String,
    pub timestamp: i64,
    pub current_price: f64,
    #[serde(flatten)]
    pub indicators: IndicatorSnapshot,
    pub signal: Signal,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub wma: Option<f64>,
    pub ema_crossover: MaTrend,
}

/// Support/resistance, volatility, oscillator, cloud and divergence readings
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedAnalysis {
    pub pair: String,
    pub timestamp: i64,
    pub current_price: f64,
    pub support_resistance: SupportResistance,
    pub atr: Option<f64>,
    pub atr_percent: Option<f64>,
    pub stochastic_rsi: Option<StochRsi>,
    pub moving_averages: MovingAverages,
    pub ichimoku: Option<Ichimoku>,
    pub divergences: Vec<Divergence>,
    pub advanced_signals: Vec<AdvancedSignal>,
}

/// Stateless analyzer; every call is a pure function of the candles and config
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    include_advanced: bool,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            include_advanced: false,
        }
    }

    /// Embed the advanced snapshot in every [`AnalysisResult`]
    pub fn with_advanced(mut self, include_advanced: bool) -> Self {
        self.include_advanced = include_advanced;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the rule engine over the full candle history
    ///
    /// Fails with `InsufficientData` when fewer than `ma_slow + 20` candles are supplied.
    pub fn analyze(&self, market: &MarketData) -> Result<AnalysisResult> {
        let rules = &self.config.rules;
        let candles = &market.data;

        let required = rules.min_candles_required();
        if candles.is_empty() || candles.len() < required {
            return Err(AnalysisError::InsufficientData {
                required,
                available: candles.len(),
            });
        }

        let closes = market.closes();
        let volumes = market.volumes();
        let first = &candles[0];
        let last = &candles[candles.len() - 1];
        let current_close = last.close;

        let rsi = calculate_rsi(&closes, rules.rsi_period).unwrap_or(50.0);
        let ma_fast = calculate_sma(&closes, rules.ma_fast).unwrap_or(current_close);
        let ma_slow = calculate_sma(&closes, rules.ma_slow).unwrap_or(current_close);
        let trend = ma_trend(ma_fast, ma_slow);

        let momentum_required = momentum_history_required(rules.momentum_period);
        if closes.len() < momentum_required {
            tracing::warn!(
                "⚠️  {}: momentum needs {} candles, got {}; reporting 0.0",
                market.pair,
                momentum_required,
                closes.len()
            );
        }
        let momentum = calculate_momentum(&closes, rules.momentum_period);
        let volatility = annualized_volatility(
            &closes,
            rules.volatility_period,
            Annualization::TradingDays,
        )
        .unwrap_or(0.0);

        let (signal, base_confidence) = generate_signal(momentum, rsi, trend, volatility, rules);
        let confidence = adjust_confidence(base_confidence, rsi, volatility, &volumes, rules);

        let price_change_pct = if first.open != 0.0 {
            (current_close - first.open) / first.open * 100.0
        } else {
            0.0
        };

        let volume_window = rules.volume_window.min(volumes.len());
        let avg_volume = calculate_average_volume(&volumes, volume_window).unwrap_or(0.0);

        let indicators = IndicatorSnapshot {
            momentum,
            momentum_threshold: rules.momentum_threshold,
            volatility: round_to(volatility, 2),
            volatility_threshold: rules.volatility_threshold,
            rsi: round_to(rsi, 1),
            rsi_period: rules.rsi_period,
            ma_fast: round_to(ma_fast, 2),
            ma_slow: round_to(ma_slow, 2),
            ma_signal: trend,
            price_change_pct: round_to(price_change_pct, 2),
            recent_volume: round_to(last.volume, 2),
            avg_volume: round_to(avg_volume, 2),
            volume_ratio: round_to(volume_ratio(&volumes, volume_window).unwrap_or(1.0), 2),
        };

        tracing::info!(
            "{}: {} (confidence {:.3}) momentum={:.2} RSI={:.1} trend={:?}",
            market.pair,
            signal,
            confidence,
            momentum,
            rsi,
            trend
        );

        let advanced = if self.include_advanced {
            Some(self.analyze_advanced(market)?)
        } else {
            None
        };

        Ok(AnalysisResult {
            pair: market.pair.clone(),
            timestamp: last.timestamp,
            current_price: round_to(current_close, 2),
            indicators,
            signal,
            confidence: round_to(confidence, 3),
            advanced,
        })
    }

    /// Compute the advanced indicator snapshot
    ///
    /// Indicators lacking history are reported as absent; only empty input fails.
    pub fn analyze_advanced(&self, market: &MarketData) -> Result<AdvancedAnalysis> {
        let cfg = &self.config.advanced;
        let candles = &market.data;

        let last = candles.last().ok_or(AnalysisError::EmptyInput)?;
        let closes = market.closes();
        let current_price = last.close;

        let support_resistance =
            detect_support_resistance(candles, cfg.sr_threshold, cfg.sr_lookback);

        let atr = calculate_atr(candles, cfg.atr_period);
        let atr_pct = atr_percent(atr, current_price);

        let stoch = stochastic_rsi(
            &closes,
            cfg.stoch_rsi_period,
            cfg.stoch_period,
            cfg.stoch_k_period,
            cfg.stoch_d_period,
        );

        let ema_fast = ema_series(&closes, cfg.ema_fast);
        let ema_slow = ema_series(&closes, cfg.ema_slow);
        let latest_fast = ema_fast.last().copied().flatten();
        let latest_slow = ema_slow.last().copied().flatten();
        let moving_averages = MovingAverages {
            ema_fast: latest_fast,
            ema_slow: latest_slow,
            wma: calculate_wma(&closes, cfg.wma_period),
            ema_crossover: match (latest_fast, latest_slow) {
                (Some(fast), Some(slow)) => ma_trend(fast, slow),
                _ => MaTrend::Neutral,
            },
        };

        let ichimoku = ichimoku(candles);

        let macd = macd_proxy_series(&closes, cfg.ema_fast, cfg.ema_slow);
        let rsi = rsi_series(&closes, self.config.rules.rsi_period);
        let divergences = detect_divergences(&closes, &rsi, &macd, cfg.divergence_lookback);

        let signals = advanced_signals(
            &support_resistance,
            atr_pct,
            stoch.as_ref(),
            ichimoku.as_ref(),
            &divergences,
            cfg,
        );

        tracing::debug!(
            "{}: ATR={:?}, StochRSI={:?}, divergences={:?}, tags={}",
            market.pair,
            atr,
            stoch.map(|s| s.k),
            divergences,
            signals.len()
        );

        Ok(AdvancedAnalysis {
            pair: market.pair.clone(),
            timestamp: last.timestamp,
            current_price,
            support_resistance,
            atr,
            atr_percent: atr_pct,
            stochastic_rsi: stoch,
            moving_averages,
            ichimoku,
            divergences,
            advanced_signals: signals,
        })
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

impl AdvancedAnalysis {
    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║              ADVANCED TECHNICAL ANALYSIS              ║");
        println!("╚═══════════════════════════════════════════════════════╝\n");

        println!("  Pair:          {}", self.pair);
        println!("  Price:         {:.2}", self.current_price);
        if let Some(as_of) = chrono::DateTime::from_timestamp(self.timestamp, 0) {
            println!("  As of:         {}", as_of.format("%Y-%m-%d %H:%M UTC"));
        }

        let sr = &self.support_resistance;
        println!("\n📏 SUPPORT / RESISTANCE");
        println!(
            "  Nearest support:     {} ({}% away)",
            fmt_opt(sr.nearest_support),
            fmt_opt(sr.distance_to_support)
        );
        println!(
            "  Nearest resistance:  {} ({}% away)",
            fmt_opt(sr.nearest_resistance),
            fmt_opt(sr.distance_to_resistance)
        );

        println!("\n⚡ VOLATILITY");
        println!("  ATR:           {}", fmt_opt(self.atr));
        println!("  ATR % price:   {}", fmt_opt(self.atr_percent));

        println!("\n📊 OSCILLATORS & AVERAGES");
        match &self.stochastic_rsi {
            Some(stoch) => println!(
                "  Stoch RSI:     K {:.2} / D {:.2} ({:?})",
                stoch.k, stoch.d, stoch.zone
            ),
            None => println!("  Stoch RSI:     n/a"),
        }
        let ma = &self.moving_averages;
        println!(
            "  EMA fast/slow: {} / {} ({:?})",
            fmt_opt(ma.ema_fast),
            fmt_opt(ma.ema_slow),
            ma.ema_crossover
        );
        println!("  WMA:           {}", fmt_opt(ma.wma));

        if let Some(cloud) = &self.ichimoku {
            println!("\n☁️  ICHIMOKU");
            println!(
                "  Tenkan {:.2}  Kijun {:.2}  Span A {:.2}  Span B {:.2}",
                cloud.tenkan_sen, cloud.kijun_sen, cloud.senkou_span_a, cloud.senkou_span_b
            );
            println!(
                "  Cloud {:?}, price {:?}",
                cloud.cloud_color, cloud.price_vs_cloud
            );
        }

        println!("\n🔔 SIGNALS");
        if self.advanced_signals.is_empty() {
            println!("  (none)");
        }
        for signal in &self.advanced_signals {
            println!("  • {signal}");
        }
        println!();
    }
}
