use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Insufficient data: need at least {required} candles, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("No OHLC data provided")]
    EmptyInput,

    #[error("No portfolio balances provided")]
    EmptyPortfolio,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid candle data: {0}")]
    InvalidCandles(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
