use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// OHLCV candlestick for one interval of one trading pair
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Candle {
    pub timestamp: i64, // Unix seconds
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Candle open time as a UTC datetime (None if out of range)
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Candle history for one pair, as produced by the OHLC fetcher
///
/// ```json
/// { "pair": "XXBTZUSD", "interval": 60, "data": [ { "timestamp": 1700000000, ... } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default = "unknown_pair")]
    pub pair: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default)]
    pub data: Vec<Candle>,
}

fn unknown_pair() -> String {
    "UNKNOWN".to_string()
}

impl MarketData {
    pub fn new(pair: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            pair: pair.into(),
            interval: None,
            data: candles,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.data.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.data.iter().map(|c| c.volume).collect()
    }
}

/// Trading recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

// Kraken returns prices as strings ("42000.1"), the fetcher as numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Numeric::Number(n) => Ok(n),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid numeric field: {s:?}"))),
        }
    }
}

#[derive(Deserialize)]
struct CandleObject {
    #[serde(default = "zero_numeric")]
    timestamp: Numeric,
    open: Numeric,
    high: Numeric,
    low: Numeric,
    close: Numeric,
    #[serde(default = "zero_numeric")]
    volume: Numeric,
}

fn zero_numeric() -> Numeric {
    Numeric::Number(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandle {
    Object(CandleObject),
    // [timestamp, open, high, low, close, vwap, volume, count]
    Array(Vec<Numeric>),
}

impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match RawCandle::deserialize(deserializer)? {
            RawCandle::Object(c) => Ok(Candle {
                timestamp: c.timestamp.into_f64::<D::Error>()? as i64,
                open: c.open.into_f64::<D::Error>()?,
                high: c.high.into_f64::<D::Error>()?,
                low: c.low.into_f64::<D::Error>()?,
                close: c.close.into_f64::<D::Error>()?,
                volume: c.volume.into_f64::<D::Error>()?,
            }),
            RawCandle::Array(fields) => {
                if fields.len() < 7 {
                    return Err(D::Error::custom(format!(
                        "array candle needs at least 7 fields, got {}",
                        fields.len()
                    )));
                }
                let mut values = Vec::with_capacity(7);
                for field in fields.into_iter().take(7) {
                    values.push(field.into_f64::<D::Error>()?);
                }
                Ok(Candle {
                    timestamp: values[0] as i64,
                    open: values[1],
                    high: values[2],
                    low: values[3],
                    close: values[4],
                    volume: values[6],
                })
            }
        }
    }
}
