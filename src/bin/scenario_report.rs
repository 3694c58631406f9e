use kraken_analyst::data::{MarketScenario, SyntheticDataGenerator};
use kraken_analyst::{AnalysisResult, Analyzer, Result};

const CANDLES_PER_SCENARIO: usize = 200;
const INTERVAL_MINUTES: i64 = 60;
const SEED: u64 = 42;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("kraken_analyst=warn")
        .with_writer(std::io::stderr)
        .init();

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║          KRAKEN ANALYST SCENARIO REPORT               ║");
    println!("╚═══════════════════════════════════════════════════════╝");

    let analyzer = Analyzer::default().with_advanced(true);

    let scenarios = MarketScenario::ALL.map(|scenario| {
        let name = match scenario {
            MarketScenario::Uptrend => "📈 Uptrend (+2% daily)",
            MarketScenario::Downtrend => "📉 Downtrend (-2% daily)",
            MarketScenario::Sideways => "↔️  Sideways (mean-reverting)",
            MarketScenario::Volatile => "⚡ Volatile (±5% swings)",
            MarketScenario::Flat => "➖ Flat (constant price)",
        };
        (scenario, name)
    });

    let mut results = Vec::new();

    for (scenario, name) in scenarios {
        let market = SyntheticDataGenerator::new(SEED).generate_market(
            scenario.as_str(),
            scenario,
            CANDLES_PER_SCENARIO,
            INTERVAL_MINUTES,
        );

        match analyzer.analyze(&market) {
            Ok(result) => results.push((name.to_string(), result)),
            Err(e) => eprintln!("❌ Analysis failed for {}: {}", name, e),
        }
    }

    print_summary_comparison(&results);

    Ok(())
}

fn print_summary_comparison(results: &[(String, AnalysisResult)]) {
    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║              SCENARIO COMPARISON                      ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    println!(
        "{:<30} {:>6} {:>6} {:>8} {:>7} {:>8} {:>9}",
        "Scenario", "Signal", "Conf", "Momentum", "RSI", "Vol%", "Trend"
    );
    println!("{}", "─".repeat(80));

    for (name, result) in results {
        let indicators = &result.indicators;
        println!(
            "{:<30} {:>6} {:>6.3} {:>8.2} {:>7.1} {:>8.2} {:>9}",
            name,
            result.signal.to_string(),
            result.confidence,
            indicators.momentum,
            indicators.rsi,
            indicators.volatility,
            format!("{:?}", indicators.ma_signal)
        );
    }

    println!("\n🔔 ADVANCED SIGNALS");
    for (name, result) in results {
        let tags: Vec<String> = result
            .advanced
            .iter()
            .flat_map(|a| a.advanced_signals.iter().map(|s| s.to_string()))
            .collect();
        let tags = if tags.is_empty() {
            "(none)".to_string()
        } else {
            tags.join(", ")
        };
        println!("  {:<30} {}", name, tags);
    }

    println!("\n");
}
