// Technical indicators module
// Implements MA, RSI, ATR, volatility, momentum, Ichimoku, S/R and divergence

pub mod atr;
pub mod divergence;
pub mod ichimoku;
pub mod market_analysis;
pub mod momentum;
pub mod moving_average;
pub mod rsi;
pub mod support_resistance;
pub mod volatility;

/// Indicator output aligned with its input: entry `i` belongs to price `i`,
/// `None` until enough history exists
pub type Series = Vec<Option<f64>>;

/// Round to a fixed number of decimal places for reporting
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub use atr::{atr_series, calculate_atr, true_ranges};
pub use divergence::{detect_divergences, macd_proxy_series, Divergence};
pub use ichimoku::{ichimoku, CloudColor, CloudPosition, Ichimoku, IchimokuSignal};
pub use market_analysis::{
    calculate_average_volume, volume_confirmation, volume_ratio, VolumeConfirmation,
};
pub use momentum::{calculate_momentum, momentum_history_required, try_momentum};
pub use moving_average::{
    calculate_ema, calculate_sma, calculate_wma, ema_series, ma_trend, sma_series, wma_series,
    MaTrend,
};
pub use rsi::{calculate_rsi, rsi_series, stochastic_rsi, StochRsi, StochZone};
pub use support_resistance::{cluster_levels, detect_support_resistance, SupportResistance};
pub use volatility::{annualized_volatility, Annualization};
