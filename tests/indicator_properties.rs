use kraken_analyst::indicators::{
    atr_series, calculate_rsi, calculate_sma, ema_series, rsi_series, sma_series,
    stochastic_rsi, wma_series,
};
use kraken_analyst::{Analyzer, Candle, MarketData};
use proptest::prelude::*;

fn candles_from(bars: &[(f64, f64)]) -> Vec<Candle> {
    bars.iter()
        .enumerate()
        .map(|(i, &(close, spread))| Candle {
            timestamp: 1_700_000_000 + i as i64 * 3600,
            open: close,
            high: close + spread,
            low: (close - spread).max(0.01),
            close,
            volume: 1000.0 + spread * 10.0,
        })
        .collect()
}

fn prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..100_000.0, 0..120)
}

proptest! {
    /// RSI stays within [0, 100] wherever it is defined
    #[test]
    fn rsi_is_bounded(prices in prices(), period in 1usize..30) {
        for value in rsi_series(&prices, period).into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
        }
        if let Some(rsi) = calculate_rsi(&prices, period) {
            prop_assert!((0.0..=100.0).contains(&rsi));
        }
    }

    #[test]
    fn stochastic_rsi_is_bounded(prices in prices()) {
        if let Some(stoch) = stochastic_rsi(&prices, 14, 14, 3, 3) {
            prop_assert!(stoch.k >= 0.0 && stoch.k <= 100.0 + 1e-9);
            prop_assert!(stoch.d >= 0.0 && stoch.d <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn atr_is_non_negative(
        bars in prop::collection::vec((1.0f64..10_000.0, 0.0f64..50.0), 0..80),
        period in 1usize..20,
    ) {
        let candles = candles_from(&bars);
        let series = atr_series(&candles, period);
        prop_assert_eq!(series.len(), candles.len());
        for value in series.into_iter().flatten() {
            prop_assert!(value >= 0.0);
        }
    }

    /// Input shorter than the period yields an all-None series of the same length
    #[test]
    fn short_input_is_all_none(
        (period, prices) in (2usize..40).prop_flat_map(|period| {
            (Just(period), prop::collection::vec(1.0f64..1000.0, 0..period))
        }),
    ) {
        for series in [
            sma_series(&prices, period),
            ema_series(&prices, period),
            wma_series(&prices, period),
            rsi_series(&prices, period),
        ] {
            prop_assert_eq!(series.len(), prices.len());
            prop_assert!(series.iter().all(Option::is_none));
        }
    }

    #[test]
    fn series_are_tail_aligned(prices in prices(), period in 1usize..30) {
        let sma = sma_series(&prices, period);
        prop_assert_eq!(sma.len(), prices.len());
        if prices.len() >= period {
            prop_assert!(sma[..period - 1].iter().all(Option::is_none));
            prop_assert!(sma[period - 1..].iter().all(Option::is_some));
            prop_assert_eq!(sma.last().copied().flatten(), calculate_sma(&prices, period));
        }
    }

    /// With exactly `period` prices the SMA is the plain mean
    #[test]
    fn sma_of_full_window_is_mean(prices in prop::collection::vec(1.0f64..1000.0, 1..50)) {
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        let sma = calculate_sma(&prices, prices.len()).unwrap();
        prop_assert!((sma - mean).abs() < 1e-9);
    }

    /// Same candles and config, same result
    #[test]
    fn analysis_is_deterministic(
        bars in prop::collection::vec((10.0f64..1000.0, 0.0f64..5.0), 46..120),
    ) {
        let market = MarketData::new("XXBTZUSD", candles_from(&bars));
        let analyzer = Analyzer::default().with_advanced(true);

        let first = analyzer.analyze(&market).unwrap();
        let second = analyzer.analyze(&market).unwrap();

        prop_assert_eq!(first.signal, second.signal);
        prop_assert_eq!(first.confidence, second.confidence);
        prop_assert!((0.0..=1.0).contains(&first.confidence));
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
