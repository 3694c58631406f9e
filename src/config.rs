use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::portfolio::PortfolioConfig;
use crate::strategy::{AdvancedConfig, RuleConfig};

/// Environment variables override settings as `KRAKEN_ANALYST__RULES__RSI_PERIOD=21`
pub const ENV_PREFIX: &str = "KRAKEN_ANALYST";
const ENV_SEPARATOR: &str = "__";

fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

/// All analyzer settings, grouped per engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub rules: RuleConfig,
    pub advanced: AdvancedConfig,
    pub portfolio: PortfolioConfig,
}

impl AnalyzerConfig {
    /// Load configuration: defaults, then an optional TOML file, then environment
    ///
    /// `.env` is read first so its entries take part in the environment layer.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            tracing::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engines cannot work with
    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;
        let advanced = &self.advanced;

        let periods = [
            ("rules.rsi_period", rules.rsi_period),
            ("rules.ma_fast", rules.ma_fast),
            ("rules.ma_slow", rules.ma_slow),
            ("rules.momentum_period", rules.momentum_period),
            ("rules.volatility_period", rules.volatility_period),
            ("rules.volume_window", rules.volume_window),
            ("advanced.sr_lookback", advanced.sr_lookback),
            ("advanced.atr_period", advanced.atr_period),
            ("advanced.stoch_rsi_period", advanced.stoch_rsi_period),
            ("advanced.stoch_period", advanced.stoch_period),
            ("advanced.stoch_k_period", advanced.stoch_k_period),
            ("advanced.stoch_d_period", advanced.stoch_d_period),
            ("advanced.ema_fast", advanced.ema_fast),
            ("advanced.ema_slow", advanced.ema_slow),
            ("advanced.wma_period", advanced.wma_period),
            ("advanced.divergence_lookback", advanced.divergence_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(AnalysisError::InvalidConfig(format!("{name} must be > 0")));
        }

        if rules.volatility_period < 2 {
            return Err(AnalysisError::InvalidConfig(
                "rules.volatility_period must be at least 2".to_string(),
            ));
        }

        let thresholds = [
            ("rules.momentum_threshold", rules.momentum_threshold),
            ("rules.volatility_threshold", rules.volatility_threshold),
            ("advanced.sr_threshold", advanced.sr_threshold),
            ("advanced.near_level_pct", advanced.near_level_pct),
            ("advanced.high_atr_pct", advanced.high_atr_pct),
            ("advanced.low_atr_pct", advanced.low_atr_pct),
        ];
        if let Some((name, value)) = thresholds
            .iter()
            .find(|(_, value)| value.is_nan() || *value <= 0.0)
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "{name} must be positive, got {value}"
            )));
        }

        if rules.ma_fast >= rules.ma_slow {
            return Err(AnalysisError::InvalidConfig(format!(
                "rules.ma_fast ({}) must be shorter than rules.ma_slow ({})",
                rules.ma_fast, rules.ma_slow
            )));
        }
        if advanced.ema_fast >= advanced.ema_slow {
            return Err(AnalysisError::InvalidConfig(format!(
                "advanced.ema_fast ({}) must be shorter than advanced.ema_slow ({})",
                advanced.ema_fast, advanced.ema_slow
            )));
        }

        self.portfolio.validate()
    }
}
