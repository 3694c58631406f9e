use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use kraken_analyst::data::{
    read_market_data, read_portfolio, CandleValidator, MarketScenario, SyntheticDataGenerator,
};
use kraken_analyst::portfolio::analyze_portfolio;
use kraken_analyst::{AnalysisError, Analyzer, AnalyzerConfig, MarketData};
use tracing_subscriber::EnvFilter;

/// Technical analysis and portfolio risk for Kraken OHLC data
#[derive(Debug, Parser)]
#[command(name = "kraken-analyst", version)]
struct Cli {
    /// TOML configuration file (defaults, then file, then KRAKEN_ANALYST__* env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Composite BUY/SELL/HOLD signal from an OHLC history
    Analyze {
        /// MarketData JSON file (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        momentum_threshold: Option<f64>,
        #[arg(long)]
        volatility_threshold: Option<f64>,
        #[arg(long)]
        rsi_period: Option<usize>,
        #[arg(long)]
        ma_fast: Option<usize>,
        #[arg(long)]
        ma_slow: Option<usize>,
        /// Embed the advanced snapshot in the result
        #[arg(long)]
        advanced: bool,
    },
    /// Support/resistance, ATR, Stochastic RSI, Ichimoku and divergences
    Advanced {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Portfolio correlation, risk metrics and rebalancing
    Portfolio {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        risk_free_rate: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Emit seeded synthetic MarketData JSON
    Synthetic {
        /// uptrend, downtrend, sideways, volatile or flat
        #[arg(long)]
        scenario: MarketScenario,
        #[arg(long, default_value_t = 200)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "SYNTH")]
        pair: String,
        /// Candle interval in minutes
        #[arg(long, default_value_t = 60)]
        interval: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    setup_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(AnalysisError::InsufficientData {
                required,
                available,
            }) = e.downcast_ref::<AnalysisError>()
            {
                eprintln!(
                    "❌ Insufficient data: need at least {} candles, got {}",
                    required, available
                );
            } else {
                eprintln!("❌ Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kraken_analyst=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        AnalyzerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Analyze {
            input,
            momentum_threshold,
            volatility_threshold,
            rsi_period,
            ma_fast,
            ma_slow,
            advanced,
        } => {
            let rules = &mut config.rules;
            if let Some(v) = momentum_threshold {
                rules.momentum_threshold = v;
            }
            if let Some(v) = volatility_threshold {
                rules.volatility_threshold = v;
            }
            if let Some(v) = rsi_period {
                rules.rsi_period = v;
            }
            if let Some(v) = ma_fast {
                rules.ma_fast = v;
            }
            if let Some(v) = ma_slow {
                rules.ma_slow = v;
            }
            config.validate().context("Invalid command-line overrides")?;

            let market = load_market(input)?;
            let result = Analyzer::new(config)
                .with_advanced(advanced)
                .analyze(&market)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Advanced { input, format } => {
            let market = load_market(input)?;
            let analysis = Analyzer::new(config).analyze_advanced(&market)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
                OutputFormat::Text => analysis.print_report(),
            }
        }
        Command::Portfolio {
            input,
            risk_free_rate,
            format,
        } => {
            if let Some(rate) = risk_free_rate {
                config.portfolio.risk_free_rate = rate;
            }
            config.validate().context("Invalid command-line overrides")?;
            let portfolio = read_portfolio(input.as_deref()).context("Failed to read portfolio")?;
            let report = analyze_portfolio(&portfolio, &config.portfolio)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => report.print_report(),
            }
        }
        Command::Synthetic {
            scenario,
            count,
            seed,
            pair,
            interval,
        } => {
            let market = SyntheticDataGenerator::new(seed).generate_market(
                &pair,
                scenario,
                count,
                interval,
            );
            tracing::info!(
                "Generated {} {} candles for {} (seed {})",
                count,
                scenario,
                pair,
                seed
            );
            println!("{}", serde_json::to_string_pretty(&market)?);
        }
    }

    Ok(())
}

/// Read market data and run the series checks; only unsorted timestamps are fatal
fn load_market(input: Option<PathBuf>) -> anyhow::Result<MarketData> {
    let market = read_market_data(input.as_deref()).context("Failed to read market data")?;
    if !market.data.is_empty() {
        CandleValidator::new()
            .validate_series(&market.data)
            .context("Rejected candle history")?;
    }
    Ok(market)
}
