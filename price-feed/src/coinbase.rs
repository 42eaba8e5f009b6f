//! Coinbase spot price lookup.
//!
//! Unlike the CoinGecko source this takes free-form symbols (`BTC`, `eth`, ...)
//! straight from the caller and returns only the current price.

use crate::error::{DataError, FetchError, QueryError};
use crate::http::{build_client, fetch_body};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coinbase.com/v2";

const MAX_SYMBOL_LEN: usize = 10;

/// Spot price as Coinbase reports it. `amount` is kept as the API's decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoinbaseSpot {
    pub base: String,
    pub currency: String,
    pub amount: String,
}

#[derive(Deserialize)]
struct SpotEnvelope {
    data: CoinbaseSpot,
}

#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    client: Client,
    base: Url,
}

impl CoinbaseClient {
    pub fn new(base_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base: base_url,
        })
    }

    /// GET `/prices/{CRYPTO}-{CURRENCY}/spot`.
    pub async fn spot_price(&self, crypto: &str, currency: &str) -> Result<CoinbaseSpot, FetchError> {
        let pair = format!("{}-{}", normalize_symbol(crypto)?, normalize_symbol(currency)?);

        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["prices", pair.as_str(), "spot"]);
        }

        debug!(%pair, "fetching coinbase spot price");
        let body = fetch_body(self.client.get(url)).await?;
        Ok(parse_spot(&body)?)
    }
}

/// Trim, check and uppercase a user-supplied ticker.
pub fn normalize_symbol(raw: &str) -> Result<String, QueryError> {
    let sym = raw.trim();
    let valid = !sym.is_empty()
        && sym.len() <= MAX_SYMBOL_LEN
        && sym.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(QueryError::InvalidSymbol(raw.to_string()));
    }
    Ok(sym.to_ascii_uppercase())
}

/// Parse like: `{ "data": { "base": "BTC", "currency": "USD", "amount": "43000.12" } }`
pub(crate) fn parse_spot(body: &[u8]) -> Result<CoinbaseSpot, DataError> {
    let envelope: SpotEnvelope = serde_json::from_slice(body)?;
    Ok(envelope.data)
}
