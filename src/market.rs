//! CoinGecko market-data provider.
//!
//! Implements `MarketDataProvider` over the public `/coins/markets`
//! endpoint. Anything short of a well-formed row with an image URL is a
//! soft miss (`Ok(None)`); only transport-level failures surface as errors.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::logo_cache::MarketDataProvider;
use crate::types::MarketData;
use crate::utils::env_var;

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEMO_API_KEY: &str = "CG-szxrubZPAKKwYnQXtkUuq57x";

pub struct CoinGeckoProvider {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        CoinGeckoProvider::with_base_url(COINGECKO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        CoinGeckoProvider {
            agent,
            base_url: base_url.into(),
            api_key: env_var("SUI_LENS_COINGECKO_API_KEY")
                .unwrap_or_else(|| DEMO_API_KEY.to_string()),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        CoinGeckoProvider::new()
    }
}

impl MarketDataProvider for CoinGeckoProvider {
    fn fetch_market_data(&self, symbol: &str) -> Result<Option<MarketData>> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&symbols={}&price_change_percentage=1h",
            self.base_url,
            symbol.to_lowercase()
        );

        let response = match self.agent.get(&url).set("x-cg-demo-api-key", &self.api_key).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                warn!(symbol, code, "market data request rejected");
                return Ok(None);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("market data request for {}", symbol))
            }
        };

        let rows: Vec<MarketData> = response
            .into_json()
            .with_context(|| format!("decoding market data for {}", symbol))?;
        match rows.into_iter().next() {
            Some(row) if !row.image.is_empty() => Ok(Some(row)),
            Some(_) => {
                debug!(symbol, "market row has no image url");
                Ok(None)
            }
            None => {
                debug!(symbol, "no market rows for symbol");
                Ok(None)
            }
        }
    }
}
