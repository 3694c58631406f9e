use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::MarketData;
use crate::portfolio::PortfolioInput;

/// Read a JSON document from `path`, or from stdin when no path (or `-`) is given
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let contents = match path {
        Some(path) if path != Path::new("-") => {
            tracing::debug!("Reading {}", path.display());
            std::fs::read_to_string(path)?
        }
        _ => {
            tracing::debug!("Reading stdin");
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&contents)?)
}

pub fn read_market_data(path: Option<&Path>) -> Result<MarketData> {
    let market: MarketData = read_json(path)?;
    tracing::debug!("Loaded {} candles for {}", market.data.len(), market.pair);
    Ok(market)
}

pub fn read_portfolio(path: Option<&Path>) -> Result<PortfolioInput> {
    let input: PortfolioInput = read_json(path)?;
    tracing::debug!(
        "Loaded {} balances, {} price histories",
        input.balances.len(),
        input.historical_prices.len()
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "kraken-analyst-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_market_data_file() {
        let path = write_temp(
            "market",
            r#"{"pair": "XXBTZUSD", "interval": 60, "data": [
                [1700000000, "100", "101", "99", "100.5", "100.2", "3.5", 12]
            ]}"#,
        );

        let market = read_market_data(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(market.pair, "XXBTZUSD");
        assert_eq!(market.data.len(), 1);
        assert_eq!(market.data[0].close, 100.5);
    }

    #[test]
    fn test_read_portfolio_file() {
        let path = write_temp(
            "portfolio",
            r#"{"balances": [{"asset": "XBT", "balance": 0.5, "value_usd": 20000.0}]}"#,
        );

        let input = read_portfolio(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(input.balances.len(), 1);
        assert!(input.historical_prices.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("kraken-analyst-does-not-exist.json");
        assert!(matches!(
            read_market_data(Some(&path)),
            Err(AnalysisError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let path = write_temp("malformed", "{ not json");
        let result = read_market_data(Some(&path));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AnalysisError::Json(_))));
    }
}
