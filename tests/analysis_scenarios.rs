use kraken_analyst::data::{CandleValidator, MarketScenario, SyntheticDataGenerator};
use kraken_analyst::indicators::MaTrend;
use kraken_analyst::*;

fn market(closes: &[f64], volumes: &[f64]) -> MarketData {
    let candles = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Candle {
            timestamp: 1_700_000_000 + i as i64 * 3600,
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume,
        })
        .collect();
    MarketData::new("XXBTZUSD", candles)
}

fn constant_volume(n: usize) -> Vec<f64> {
    vec![1000.0; n]
}

/// 99 bars chopping between `even` and `odd`, then one breakout close
fn chop_then_break(even: f64, odd: f64, last: f64) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..99)
        .map(|i| if i % 2 == 0 { even } else { odd })
        .collect();
    closes.push(last);
    closes
}

#[test]
fn test_breakout_above_range_buys() {
    let closes = chop_then_break(100.0, 101.0, 110.0);
    let result = Analyzer::default()
        .analyze(&market(&closes, &constant_volume(100)))
        .unwrap();

    println!("{}", serde_json::to_string_pretty(&result).unwrap());

    assert_eq!(result.signal, Signal::Buy);
    assert_eq!(result.indicators.momentum, 4.36);
    assert_eq!(result.indicators.rsi, 69.6);
    assert_eq!(result.indicators.ma_signal, MaTrend::Bullish);
    // Too volatile for the strong rule: 0.5 base, halved by the volatility factor
    assert!((result.confidence - 0.25).abs() < 1e-9);
}

#[test]
fn test_breakdown_below_range_sells() {
    let closes = chop_then_break(110.0, 109.0, 100.0);
    let result = Analyzer::default()
        .analyze(&market(&closes, &constant_volume(100)))
        .unwrap();

    assert_eq!(result.signal, Signal::Sell);
    assert_eq!(result.indicators.momentum, -4.36);
    assert_eq!(result.indicators.ma_signal, MaTrend::Bearish);
    assert!((result.confidence - 0.25).abs() < 1e-9);
}

#[test]
fn test_volume_spike_raises_confidence() {
    let closes = chop_then_break(100.0, 101.0, 110.0);
    let mut volumes = constant_volume(100);
    volumes[99] = 3000.0;

    let result = Analyzer::default()
        .analyze(&market(&closes, &volumes))
        .unwrap();

    assert_eq!(result.signal, Signal::Buy);
    assert!((result.confidence - 0.275).abs() < 1e-9);
    assert_eq!(result.indicators.recent_volume, 3000.0);
    assert_eq!(result.indicators.avg_volume, 1200.0);
    assert_eq!(result.indicators.volume_ratio, 2.5);
}

#[test]
fn test_linear_ramp_is_bullish_but_holds() {
    // A straight line never strays more than ~1.3 deviations from its MA
    let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
    let result = Analyzer::default()
        .analyze(&market(&closes, &constant_volume(100)))
        .unwrap();

    assert_eq!(result.indicators.ma_signal, MaTrend::Bullish);
    assert!(result.indicators.momentum > 0.0);
    assert!(result.indicators.momentum < 2.0);
    assert_eq!(result.indicators.rsi, 100.0);
    assert_eq!(result.signal, Signal::Hold);
}

#[test]
fn test_flat_market_degenerate_values() {
    let closes = vec![100.0; 100];
    let analyzer = Analyzer::default().with_advanced(true);
    let result = analyzer
        .analyze(&market(&closes, &constant_volume(100)))
        .unwrap();

    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.indicators.rsi, 100.0);
    assert_eq!(result.indicators.momentum, 0.0);
    assert_eq!(result.indicators.volatility, 0.0);
    assert_eq!(result.confidence, 0.4);

    let advanced = result.advanced.unwrap();
    assert_eq!(advanced.atr, Some(1.0)); // high - low on every bar
    assert!(advanced.divergences.is_empty());
}

#[test]
fn test_insufficient_history_is_reported() {
    let config = AnalyzerConfig::default();
    let required = config.rules.ma_slow + 20;
    let closes = vec![100.0; required - 1];

    let err = Analyzer::new(config)
        .analyze(&market(&closes, &constant_volume(required - 1)))
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::InsufficientData { required: 46, available: 45 }
    ));
}

#[test]
fn test_identical_input_identical_output() {
    let data = SyntheticDataGenerator::new(7).generate_market(
        "XXBTZUSD",
        MarketScenario::Volatile,
        150,
        60,
    );
    let analyzer = Analyzer::default().with_advanced(true);

    let a = serde_json::to_string(&analyzer.analyze(&data).unwrap()).unwrap();
    let b = serde_json::to_string(&analyzer.analyze(&data).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_every_synthetic_scenario_analyzes() {
    for scenario in MarketScenario::ALL {
        let data = SyntheticDataGenerator::new(42).generate_market("SYNTH", scenario, 200, 60);
        assert!(CandleValidator::new().validate_series(&data.data).is_ok());

        let result = Analyzer::default().analyze(&data).unwrap();
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "{scenario}: confidence {} out of range",
            result.confidence
        );
        assert!((0.0..=100.0).contains(&result.indicators.rsi));
    }
}

#[test]
fn test_kraken_array_payload() {
    let rows: Vec<String> = (0..60)
        .map(|i| {
            format!(
                r#"[{}, "100.0", "100.5", "99.5", "100.0", "100.0", "12.5", 40]"#,
                1_700_000_000 + i * 3600
            )
        })
        .collect();
    let json = format!(
        r#"{{"pair": "XXBTZUSD", "interval": 60, "data": [{}]}}"#,
        rows.join(",")
    );

    let data: MarketData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.data.len(), 60);
    assert_eq!(data.interval, Some(60));

    let result = Analyzer::default().analyze(&data).unwrap();
    assert_eq!(result.pair, "XXBTZUSD");
    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.current_price, 100.0);
    assert_eq!(result.timestamp, 1_700_000_000 + 59 * 3600);
}

#[test]
fn test_config_overrides_change_the_decision() {
    let closes = chop_then_break(100.0, 101.0, 110.0);
    let data = market(&closes, &constant_volume(100));

    let mut config = AnalyzerConfig::default();
    config.rules.momentum_threshold = 5.0;
    config.validate().unwrap();

    let result = Analyzer::new(config).analyze(&data).unwrap();
    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.indicators.momentum_threshold, 5.0);
}
