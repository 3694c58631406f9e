// Signal generation module
pub mod advanced;
pub mod signals;

pub use advanced::{advanced_signals, atr_percent, AdvancedConfig, AdvancedSignal};
pub use signals::{adjust_confidence, generate_signal, RuleConfig};
