use crate::error::{AnalysisError, Result};
use crate::models::Candle;

/// Validates OHLC candle data for sanity and correctness
pub struct CandleValidator;

impl CandleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a candle for correctness
    pub fn validate(&self, candle: &Candle) -> Result<()> {
        self.validate_prices(candle)?;
        self.validate_ohlc_relationship(candle)?;
        Ok(())
    }

    /// Validate a whole history
    ///
    /// Timestamps that do not strictly increase are a hard error. Bad candles,
    /// uneven spacing and zero-volume bars are returned as warnings.
    pub fn validate_series(&self, candles: &[Candle]) -> Result<Vec<String>> {
        if candles.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        for (i, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalysisError::InvalidCandles(format!(
                    "timestamps not increasing at candle {}: {} -> {}",
                    i + 1,
                    pair[0].timestamp,
                    pair[1].timestamp
                )));
            }
        }

        let mut warnings = Vec::new();

        for (i, candle) in candles.iter().enumerate() {
            match self.validate(candle) {
                Ok(()) => {}
                Err(AnalysisError::InvalidCandles(msg)) => {
                    warnings.push(format!("candle {i}: {msg}"))
                }
                Err(other) => return Err(other),
            }
        }

        if candles.len() >= 3 {
            let expected = candles[1].timestamp - candles[0].timestamp;
            let gaps = candles
                .windows(2)
                .filter(|pair| pair[1].timestamp - pair[0].timestamp != expected)
                .count();
            if gaps > 0 {
                warnings.push(format!(
                    "{gaps} interval(s) differ from the first spacing of {expected}s"
                ));
            }
        }

        let zero_volume = candles.iter().filter(|c| c.volume == 0.0).count();
        if zero_volume > 0 {
            warnings.push(format!("{zero_volume} candle(s) have zero volume"));
        }

        for warning in &warnings {
            tracing::warn!("⚠️  {}", warning);
        }

        Ok(warnings)
    }

    /// Validate that all prices are positive and finite
    fn validate_prices(&self, candle: &Candle) -> Result<()> {
        let prices = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
        ];
        for (name, price) in prices {
            if !price.is_finite() || price <= 0.0 {
                return Err(invalid(format!("Invalid {name} price: {price}")));
            }
        }
        // Volume can be 0.0 (illiquid intervals)
        if !candle.volume.is_finite() || candle.volume < 0.0 {
            return Err(invalid(format!("Invalid volume: {}", candle.volume)));
        }
        Ok(())
    }

    /// Validate OHLC relationships (high >= low, etc.)
    fn validate_ohlc_relationship(&self, candle: &Candle) -> Result<()> {
        if candle.high < candle.low {
            return Err(invalid(format!(
                "High ({}) is less than low ({})",
                candle.high, candle.low
            )));
        }

        // High must be >= open and close
        if candle.high < candle.open {
            return Err(invalid(format!(
                "High ({}) is less than open ({})",
                candle.high, candle.open
            )));
        }
        if candle.high < candle.close {
            return Err(invalid(format!(
                "High ({}) is less than close ({})",
                candle.high, candle.close
            )));
        }

        // Low must be <= open and close
        if candle.low > candle.open {
            return Err(invalid(format!(
                "Low ({}) is greater than open ({})",
                candle.low, candle.open
            )));
        }
        if candle.low > candle.close {
            return Err(invalid(format!(
                "Low ({}) is greater than close ({})",
                candle.low, candle.close
            )));
        }

        Ok(())
    }
}

impl Default for CandleValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(message: String) -> AnalysisError {
    AnalysisError::InvalidCandles(message)
}
