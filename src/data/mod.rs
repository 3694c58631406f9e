//! Input adapters: JSON readers, candle validation and synthetic data

pub mod input;
pub mod synthetic;
pub mod validator;

pub use input::{read_json, read_market_data, read_portfolio};
pub use synthetic::{MarketScenario, SyntheticDataGenerator};
pub use validator::CandleValidator;
