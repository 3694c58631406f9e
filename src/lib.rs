// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod portfolio;
pub mod strategy;

// Re-export commonly used types
pub use analysis::{AdvancedAnalysis, AnalysisResult, Analyzer};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
pub use models::*;
