use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Candle, MarketData};

/// 2023-11-14T22:13:20Z, fixed so generated data is reproducible
pub const DEFAULT_START_TIMESTAMP: i64 = 1_700_000_000;

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketScenario {
    /// Steady uptrend with noise (+2% daily average)
    Uptrend,
    /// Steady downtrend with noise (-2% daily average)
    Downtrend,
    /// Sideways/choppy market (±1% around mean)
    Sideways,
    /// High volatility (±5% large swings)
    Volatile,
    /// Constant price, constant volume
    Flat,
}

impl MarketScenario {
    pub const ALL: [MarketScenario; 5] = [
        MarketScenario::Uptrend,
        MarketScenario::Downtrend,
        MarketScenario::Sideways,
        MarketScenario::Volatile,
        MarketScenario::Flat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketScenario::Uptrend => "uptrend",
            MarketScenario::Downtrend => "downtrend",
            MarketScenario::Sideways => "sideways",
            MarketScenario::Volatile => "volatile",
            MarketScenario::Flat => "flat",
        }
    }
}

impl std::fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MarketScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketScenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown scenario '{s}' (expected one of: uptrend, downtrend, sideways, volatile, flat)"
                )
            })
    }
}

/// Generates synthetic OHLCV data for dry runs and tests
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
    start_timestamp: i64,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
            start_timestamp: DEFAULT_START_TIMESTAMP,
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn with_start_timestamp(mut self, start_timestamp: i64) -> Self {
        self.start_timestamp = start_timestamp;
        self
    }

    /// Generate candles for a specific market scenario
    ///
    /// # Arguments
    /// * `scenario` - The market scenario to simulate
    /// * `num_candles` - Number of candles to generate
    /// * `interval_minutes` - Minutes between candles
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        let mut candles = Vec::with_capacity(num_candles);
        let mut current_price = self.base_price;
        let intervals_per_day = 24.0 * 60.0 / interval_minutes.max(1) as f64;

        for i in 0..num_candles {
            let timestamp = self.start_timestamp + i as i64 * interval_minutes * 60;

            current_price = match scenario {
                MarketScenario::Uptrend => self.trend_step(current_price, 0.02 / intervals_per_day),
                MarketScenario::Downtrend => {
                    self.trend_step(current_price, -0.02 / intervals_per_day)
                }
                MarketScenario::Sideways => {
                    // Mean reversion force + noise
                    let reversion = (self.base_price - current_price) * 0.1;
                    let noise = current_price * self.rng.gen_range(-0.01..0.01);
                    current_price + reversion + noise
                }
                MarketScenario::Volatile => {
                    let change = current_price * self.rng.gen_range(-0.05..0.05);
                    // Prevent price from going too low
                    (current_price + change).max(self.base_price * 0.5)
                }
                MarketScenario::Flat => self.base_price,
            };

            let candle = if scenario == MarketScenario::Flat {
                Candle {
                    timestamp,
                    open: current_price,
                    high: current_price,
                    low: current_price,
                    close: current_price,
                    volume: self.base_volume,
                }
            } else {
                self.create_candle(current_price, timestamp)
            };
            candles.push(candle);
        }

        candles
    }

    /// Generate a full `MarketData` document for `pair`
    pub fn generate_market(
        &mut self,
        pair: &str,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> MarketData {
        let candles = self.generate(scenario, num_candles, interval_minutes);
        let mut market = MarketData::new(pair, candles);
        market.interval = u32::try_from(interval_minutes).ok();
        market
    }

    // Drift plus reduced noise so the trend is dominant
    fn trend_step(&mut self, price: f64, drift_per_interval: f64) -> f64 {
        let drift = price * drift_per_interval;
        let noise = price * self.rng.gen_range(-0.001..0.001); // ±0.1% noise
        price + drift + noise
    }

    /// Helper to create a candle from price and timestamp
    fn create_candle(&mut self, price: f64, timestamp: i64) -> Candle {
        let noise_pct = 0.002; // ±0.2% intrabar movement

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));

        // Generate open and clamp it between low and high
        let open_raw = price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let open = open_raw.clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle {
            timestamp,
            open,
            high,
            low,
            close: price,
            volume,
        }
    }
}
