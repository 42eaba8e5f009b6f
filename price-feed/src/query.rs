//! Validated inputs for a price report.

use crate::error::QueryError;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Coins offered on the report form, keyed by their CoinGecko id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Coin {
    Bitcoin,
    Ethereum,
    Dogecoin,
    Cardano,
    Litecoin,
}

impl Coin {
    /// All coins, in form order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// CoinGecko asset id, e.g. `bitcoin`.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Dogecoin => "Dogecoin",
            Self::Cardano => "Cardano",
            Self::Litecoin => "Litecoin",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        Self::from_str(raw.trim()).map_err(|_| QueryError::UnknownCoin(raw.to_string()))
    }
}

/// Fiat currencies offered on the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Lowercase code as CoinGecko expects it, e.g. `usd`.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Uppercase code for display, e.g. `USD`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        Self::from_str(raw.trim()).map_err(|_| QueryError::UnknownCurrency(raw.to_string()))
    }
}

/// Length of the history window in days, always within `[Days::MIN, Days::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Days(u8);

impl Days {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 30;

    pub fn new(days: i64) -> Result<Self, QueryError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&days) {
            Ok(Self(days as u8))
        } else {
            Err(QueryError::DaysOutOfRange(days))
        }
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete, validated request for a price report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery {
    pub coin: Coin,
    pub currency: Currency,
    pub days: Days,
}

impl PriceQuery {
    pub fn new(coin: Coin, currency: Currency, days: Days) -> Self {
        Self {
            coin,
            currency,
            days,
        }
    }

    /// Validate raw identifiers as they arrive from a caller.
    pub fn parse(coin_id: &str, vs_currency: &str, days: i64) -> Result<Self, QueryError> {
        Ok(Self {
            coin: Coin::parse(coin_id)?,
            currency: Currency::parse(vs_currency)?,
            days: Days::new(days)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_ids_match_coingecko() {
        let ids: Vec<_> = Coin::all().map(Coin::id).collect();
        assert_eq!(
            ids,
            ["bitcoin", "ethereum", "dogecoin", "cardano", "litecoin"]
        );
        assert_eq!(Coin::Cardano.to_string(), "cardano");
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(Coin::parse("Bitcoin"), Ok(Coin::Bitcoin));
        assert_eq!(Coin::parse(" litecoin "), Ok(Coin::Litecoin));
        assert_eq!(Currency::parse("EUR"), Ok(Currency::Eur));
    }

    #[test]
    fn unknown_choices_are_rejected() {
        assert_eq!(
            Coin::parse("solana"),
            Err(QueryError::UnknownCoin("solana".into()))
        );
        assert_eq!(
            Currency::parse("jpy"),
            Err(QueryError::UnknownCurrency("jpy".into()))
        );
    }

    #[test]
    fn days_bounds() {
        assert_eq!(Days::new(1).map(Days::get), Ok(1));
        assert_eq!(Days::new(30).map(Days::get), Ok(30));
        assert_eq!(Days::new(0), Err(QueryError::DaysOutOfRange(0)));
        assert_eq!(Days::new(31), Err(QueryError::DaysOutOfRange(31)));
        assert_eq!(Days::new(-7), Err(QueryError::DaysOutOfRange(-7)));
    }

    #[test]
    fn query_parse_checks_every_field() {
        let q = PriceQuery::parse("ethereum", "gbp", 7).unwrap();
        assert_eq!(q.coin, Coin::Ethereum);
        assert_eq!(q.currency.label(), "GBP");
        assert_eq!(q.days.get(), 7);

        assert!(PriceQuery::parse("ethereum", "gbp", 90).is_err());
        assert!(PriceQuery::parse("nope", "gbp", 7).is_err());
    }
}
