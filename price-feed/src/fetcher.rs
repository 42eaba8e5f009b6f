//! The price fetcher: two sequential upstream calls and a summary.

use crate::error::{DataError, FetchError};
use crate::query::{Coin, Currency, Days, PriceQuery};
use crate::report::{build_report, PriceReport};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Current price of a coin as reported by the spot endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuote {
    pub price: f64,
    pub change_24h: Option<f64>,
    /// Unix seconds.
    pub last_updated_at: Option<i64>,
}

/// One sample of the historical chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

/// Upstream market data used to build a report.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Spot price, 24h change and last update time for `coin` in `currency`.
    async fn spot(&self, coin: Coin, currency: Currency) -> Result<SpotQuote, FetchError>;

    /// Ordered price samples for `coin` over the trailing `days`.
    async fn market_chart(
        &self,
        coin: Coin,
        currency: Currency,
        days: Days,
    ) -> Result<Vec<PricePoint>, FetchError>;
}

/// Builds [`PriceReport`]s from a [`MarketDataSource`].
///
/// One best-effort attempt per call: no retries, no caching.
#[derive(Debug, Clone)]
pub struct PriceFetcher<S> {
    source: S,
}

impl<S: MarketDataSource> PriceFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    /// Validate raw identifiers, then fetch. Bad input never reaches the network.
    pub async fn fetch(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: i64,
    ) -> Result<PriceReport, FetchError> {
        let query = PriceQuery::parse(coin_id, vs_currency, days)?;
        self.fetch_query(&query).await
    }

    pub async fn fetch_query(&self, query: &PriceQuery) -> Result<PriceReport, FetchError> {
        let PriceQuery {
            coin,
            currency,
            days,
        } = *query;

        debug!(coin = %coin, currency = %currency, "fetching spot price");
        let spot = self.source.spot(coin, currency).await.inspect_err(|e| {
            warn!(coin = %coin, currency = %currency, "spot price failed: {e}");
        })?;

        debug!(coin = %coin, currency = %currency, days = %days, "fetching market chart");
        let history = self
            .source
            .market_chart(coin, currency, days)
            .await
            .inspect_err(|e| {
                warn!(coin = %coin, currency = %currency, days = %days, "market chart failed: {e}");
            })?;

        if history.is_empty() {
            return Err(DataError::EmptyHistory.into());
        }
        debug!(points = history.len(), "summarising history");

        Ok(build_report(query, &spot, &history)?)
    }
}
