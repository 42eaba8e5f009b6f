//! CoinGecko-backed market data.

use crate::error::{DataError, FetchError};
use crate::fetcher::{MarketDataSource, PricePoint, SpotQuote};
use crate::http::{build_client, fetch_body};
use crate::query::{Coin, Currency, Days};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying a CoinGecko demo-plan key.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Spot prices via `/simple/price` and history via `/coins/{id}/market_chart`.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base: config.base_url,
            api_key: config.api_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let mut req = self.client.get(url);
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        fetch_body(req).await
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn spot(&self, coin: Coin, currency: Currency) -> Result<SpotQuote, FetchError> {
        let mut url = self.endpoint(&["simple", "price"]);
        url.query_pairs_mut()
            .append_pair("ids", coin.id())
            .append_pair("vs_currencies", currency.code())
            .append_pair("include_24hr_change", "true")
            .append_pair("include_last_updated_at", "true");

        let body = self.get(url).await?;
        Ok(parse_simple_price(&body, coin, currency)?)
    }

    async fn market_chart(
        &self,
        coin: Coin,
        currency: Currency,
        days: Days,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let mut url = self.endpoint(&["coins", coin.id(), "market_chart"]);
        url.query_pairs_mut()
            .append_pair("vs_currency", currency.code())
            .append_pair("days", &days.to_string());

        let body = self.get(url).await?;
        Ok(parse_market_chart(&body)?)
    }
}

/// Parse like: `{ "bitcoin": { "usd": 1.0, "usd_24h_change": -0.5, "last_updated_at": 1700000000 } }`
pub(crate) fn parse_simple_price(
    body: &[u8],
    coin: Coin,
    currency: Currency,
) -> Result<SpotQuote, DataError> {
    let mut parsed: HashMap<String, HashMap<String, Option<f64>>> = serde_json::from_slice(body)?;

    let rec = parsed
        .remove(coin.id())
        .ok_or_else(|| DataError::CoinMissing(coin.id().to_string()))?;
    let field = |key: &str| rec.get(key).copied().flatten();

    let price = field(currency.code()).ok_or_else(|| DataError::CurrencyMissing {
        coin: coin.id().to_string(),
        currency: currency.code().to_string(),
    })?;

    Ok(SpotQuote {
        price,
        change_24h: field(&format!("{}_24h_change", currency.code())),
        last_updated_at: field("last_updated_at").map(|secs| secs as i64),
    })
}

#[derive(Deserialize)]
struct MarketChart {
    // market_caps and total_volumes are ignored
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

/// Parse like: `{ "prices": [[1700000000000, 35000.1], ...] }`
pub(crate) fn parse_market_chart(body: &[u8]) -> Result<Vec<PricePoint>, DataError> {
    let chart: MarketChart = serde_json::from_slice(body)?;
    Ok(chart
        .prices
        .into_iter()
        .map(|(ts, price)| PricePoint {
            timestamp_ms: ts as i64,
            price,
        })
        .collect())
}
