//! Crypto price lookups for the price report web app.
//!
//! The [`PriceFetcher`] turns a validated [`PriceQuery`] into a [`PriceReport`]
//! by asking a [`MarketDataSource`] for the current spot price and the
//! historical chart, then summarising the chart.
//!
//! ## Example Flow
//!
//! ```text
//! 1. Caller builds a PriceQuery (coin, currency, days); bad input fails here
//! 2. Fetcher requests /simple/price for the coin
//! 3. Fetcher requests /coins/{coin}/market_chart for the window
//! 4. Chart is summarised into min/max/avg/period change
//! 5. PriceReport is returned for rendering
//! ```
//!
//! [`CoinbaseClient`] is a separate spot-only lookup with no history.

pub mod coinbase;
pub mod coingecko;
pub mod error;
pub mod fetcher;
mod http;
pub mod query;
pub mod report;

pub use coinbase::{CoinbaseClient, CoinbaseSpot};
pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use error::{DataError, FetchError, QueryError};
pub use fetcher::{MarketDataSource, PriceFetcher, PricePoint, SpotQuote};
pub use query::{Coin, Currency, Days, PriceQuery};
pub use report::{HistoryEntry, PriceReport};
