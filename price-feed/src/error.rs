//! Error types for price lookups.

use thiserror::Error;

/// Input rejected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unsupported coin: {0}")]
    UnknownCoin(String),

    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    #[error("days must be between 1 and 30, got {0}")]
    DaysOutOfRange(i64),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

/// The upstream answered, but not with something we can use.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("coin not found in API response: {0}")]
    CoinMissing(String),

    #[error("no {currency} price for {coin} in API response")]
    CurrencyMissing { coin: String, currency: String },

    #[error("no price history returned")]
    EmptyHistory,

    #[error("first historical price is zero, period change is undefined")]
    ZeroStartPrice,

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Any failure of a price lookup.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Data(#[from] DataError),
}

impl FetchError {
    /// True when the failure happened before anything was sent upstream.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
