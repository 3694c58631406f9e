// Portfolio analysis module
// Allocation weights, correlations, risk-adjusted performance and rebalancing hints

pub mod metrics;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::indicators::round_to;

pub use metrics::{
    align_returns, annualized_std, calculate_correlation, calculate_returns, correlation_matrix,
    diversification_ratio, max_drawdown, portfolio_returns, portfolio_volatility, sharpe_ratio,
    sortino_ratio, value_at_risk, CorrelationMatrix, Drawdown,
};

/// Configuration for portfolio analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub risk_free_rate: f64,    // Annual, as a fraction (0.02 = 2%)
    pub concentration_pct: f64, // Weight above this suggests reducing
    pub small_position_pct: f64,
    /// Small positions are only flagged once the portfolio is worth more than this (USD)
    pub small_position_min_total: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            concentration_pct: 50.0,
            small_position_pct: 5.0,
            small_position_min_total: 1000.0,
        }
    }
}

impl PortfolioConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "portfolio.risk_free_rate must be finite".to_string(),
            ));
        }
        if !(self.small_position_pct > 0.0 && self.small_position_pct < self.concentration_pct) {
            return Err(AnalysisError::InvalidConfig(format!(
                "portfolio.small_position_pct ({}) must be positive and below concentration_pct ({})",
                self.small_position_pct, self.concentration_pct
            )));
        }
        Ok(())
    }
}

/// One holding as reported by the balance fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub value_usd: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioInput {
    #[serde(default)]
    pub balances: Vec<Balance>,
    /// Daily closes per asset, oldest first
    #[serde(default)]
    pub historical_prices: HashMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub asset: String,
    pub balance: f64,
    pub value_usd: f64,
    pub weight_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub var_95: Option<f64>,
    pub var_99: Option<f64>,
    pub max_drawdown_pct: f64,
    pub volatility: f64, // Annualized, as a fraction
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceAction {
    Reduce,
    IncreaseOrRemove,
}

impl RebalanceAction {
    pub fn description(&self) -> &'static str {
        match self {
            RebalanceAction::Reduce => "Consider reducing allocation",
            RebalanceAction::IncreaseOrRemove => "Consider increasing or removing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rebalance {
    pub asset: String,
    pub current_weight: f64,
    pub action: RebalanceAction,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub total_value: f64,
    pub assets: Vec<AssetAllocation>,
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub risk_metrics: Option<RiskMetrics>,
    pub diversification_ratio: Option<f64>,
    pub rebalancing_recommendations: Vec<Rebalance>,
}

/// Analyze holdings and, where price history exists, their risk profile
///
/// Assets without at least two historical prices only contribute to weights and
/// rebalancing. Return series are tail-aligned to the shortest history.
pub fn analyze_portfolio(
    input: &PortfolioInput,
    config: &PortfolioConfig,
) -> Result<PortfolioReport> {
    if input.balances.is_empty() {
        return Err(AnalysisError::EmptyPortfolio);
    }

    let total_value: f64 = input.balances.iter().map(|b| b.value_usd).sum();
    let weight_of = |value: f64| {
        if total_value > 0.0 {
            value / total_value
        } else {
            0.0
        }
    };

    let assets: Vec<AssetAllocation> = input
        .balances
        .iter()
        .map(|b| AssetAllocation {
            asset: b.asset.clone(),
            balance: b.balance,
            value_usd: b.value_usd,
            weight_pct: round_to(weight_of(b.value_usd) * 100.0, 2),
        })
        .collect();

    // (asset, weight, returns) for holdings with usable history
    let with_history: Vec<(String, f64, Vec<f64>)> = input
        .balances
        .iter()
        .filter_map(|b| {
            let prices = input.historical_prices.get(&b.asset)?;
            if prices.len() < 2 {
                return None;
            }
            Some((b.asset.clone(), weight_of(b.value_usd), calculate_returns(prices)))
        })
        .collect();

    let missing = input.balances.len() - with_history.len();
    if missing > 0 {
        tracing::debug!("{} of {} assets lack price history", missing, input.balances.len());
    }

    let weights: Vec<f64> = with_history.iter().map(|(_, w, _)| *w).collect();
    let aligned = align_returns(
        &with_history
            .iter()
            .map(|(_, _, r)| r.clone())
            .collect::<Vec<_>>(),
    );

    let correlation = if with_history.len() >= 2 {
        let named: Vec<(String, Vec<f64>)> = with_history
            .iter()
            .map(|(asset, _, _)| asset.clone())
            .zip(aligned.iter().cloned())
            .collect();
        Some(correlation_matrix(&named))
    } else {
        None
    };

    let risk_metrics = if with_history.is_empty() {
        None
    } else {
        let combined = portfolio_returns(&weights, &aligned);

        // Equity curve of the weighted portfolio, starting at 1.0
        let mut equity = Vec::with_capacity(combined.len() + 1);
        equity.push(1.0);
        for r in &combined {
            let last = equity[equity.len() - 1];
            equity.push(last * (1.0 + r));
        }

        Some(RiskMetrics {
            sharpe_ratio: sharpe_ratio(&combined, config.risk_free_rate),
            sortino_ratio: sortino_ratio(&combined, config.risk_free_rate),
            var_95: value_at_risk(&combined, 0.95),
            var_99: value_at_risk(&combined, 0.99),
            max_drawdown_pct: max_drawdown(&equity).max_drawdown_pct,
            volatility: round_to(portfolio_volatility(&weights, &aligned), 4),
        })
    };

    let diversification = correlation.as_ref().and_then(|matrix| {
        let volatilities: Vec<f64> = aligned
            .iter()
            .map(|r| annualized_std(r).unwrap_or(0.0))
            .collect();
        diversification_ratio(&weights, &volatilities, &matrix.matrix)
    });

    let rebalancing_recommendations = rebalancing(&assets, total_value, config);

    tracing::info!(
        "Portfolio ${:.2} across {} assets ({} with history), {} rebalancing hints",
        total_value,
        assets.len(),
        with_history.len(),
        rebalancing_recommendations.len()
    );

    Ok(PortfolioReport {
        total_value,
        assets,
        correlation_matrix: correlation,
        risk_metrics,
        diversification_ratio: diversification,
        rebalancing_recommendations,
    })
}

/// Flag concentrated and negligible positions
fn rebalancing(
    assets: &[AssetAllocation],
    total_value: f64,
    config: &PortfolioConfig,
) -> Vec<Rebalance> {
    assets
        .iter()
        .filter_map(|a| {
            let (action, reason) = if a.weight_pct > config.concentration_pct {
                (
                    RebalanceAction::Reduce,
                    format!("Concentration risk (>{}%)", config.concentration_pct),
                )
            } else if a.weight_pct < config.small_position_pct
                && total_value > config.small_position_min_total
            {
                (
                    RebalanceAction::IncreaseOrRemove,
                    format!(
                        "Small allocation (<{}%) may not impact returns",
                        config.small_position_pct
                    ),
                )
            } else {
                return None;
            };

            Some(Rebalance {
                asset: a.asset.clone(),
                current_weight: a.weight_pct,
                action,
                reason,
            })
        })
        .collect()
}

fn sharpe_rating(sharpe: f64) -> &'static str {
    if sharpe > 2.0 {
        "Excellent"
    } else if sharpe > 1.0 {
        "Good"
    } else if sharpe > 0.0 {
        "Fair"
    } else {
        "Poor"
    }
}

fn diversification_rating(ratio: f64) -> &'static str {
    if ratio > 1.5 {
        "Well-diversified"
    } else if ratio > 1.2 {
        "Moderately diversified"
    } else {
        "Concentrated"
    }
}

impl PortfolioReport {
    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║            PORTFOLIO OPTIMIZATION ANALYSIS            ║");
        println!("╚═══════════════════════════════════════════════════════╝\n");

        println!("  Total Portfolio Value: ${:.2}", self.total_value);

        println!("\n📊 CURRENT ALLOCATION");
        for asset in &self.assets {
            println!(
                "  {:<8} {:>6.2}%  (${:.2})",
                asset.asset, asset.weight_pct, asset.value_usd
            );
        }

        if let Some(matrix) = &self.correlation_matrix {
            println!("\n🔗 CORRELATION MATRIX");
            let header: Vec<String> = matrix.assets.iter().map(|a| format!("{a:>7}")).collect();
            println!("       {}", header.join(" "));
            for (asset, row) in matrix.assets.iter().zip(&matrix.matrix) {
                let cells: Vec<String> = row.iter().map(|v| format!("{v:>7.2}")).collect();
                println!("  {:>4} {}", asset, cells.join(" "));
            }
        }

        if let Some(risk) = &self.risk_metrics {
            println!("\n📈 RISK-ADJUSTED PERFORMANCE");
            if let Some(sharpe) = risk.sharpe_ratio {
                println!("  Sharpe Ratio:          {:.3} ({})", sharpe, sharpe_rating(sharpe));
            }
            if let Some(sortino) = risk.sortino_ratio {
                println!("  Sortino Ratio:         {:.3}", sortino);
            }
            println!("  Volatility:            {:.2}%", risk.volatility * 100.0);
            println!("  Max Drawdown:          -{:.2}%", risk.max_drawdown_pct);
            if let (Some(var_95), Some(var_99)) = (risk.var_95, risk.var_99) {
                println!("  VaR (95%):             {:.2}%", var_95);
                println!("  VaR (99%):             {:.2}%", var_99);
            }
        }

        if let Some(ratio) = self.diversification_ratio {
            println!(
                "\n🎯 Diversification Ratio: {:.3} ({})",
                ratio,
                diversification_rating(ratio)
            );
        }

        if !self.rebalancing_recommendations.is_empty() {
            println!("\n💡 REBALANCING RECOMMENDATIONS");
            for rec in &self.rebalancing_recommendations {
                println!(
                    "  {} ({:.1}%): {}",
                    rec.asset,
                    rec.current_weight,
                    rec.action.description()
                );
                println!("    Reason: {}", rec.reason);
            }
        }
        println!();
    }
}
