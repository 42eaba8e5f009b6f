//! Report form input and validation.

use crate::csrf::CsrfSigner;
use price_feed::{Coin, Currency, Days, PriceQuery};
use serde::Deserialize;

const REQUIRED: &str = "This field is required.";
const NOT_A_CHOICE: &str = "Not a valid choice.";
const NOT_AN_INTEGER: &str = "Not a valid integer value.";

/// Raw form fields exactly as submitted; kept to re-fill the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    pub coin: Option<String>,
    pub currency: Option<String>,
    pub days: Option<String>,
    pub csrf_token: Option<String>,
}

/// Per-field messages shown next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub coin: Option<String>,
    pub currency: Option<String>,
    pub days: Option<String>,
    pub csrf: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.coin.is_none() && self.currency.is_none() && self.days.is_none() && self.csrf.is_none()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ReportForm {
    /// Validate every field, collecting all messages rather than stopping at the first.
    pub fn validate(&self, csrf: &CsrfSigner) -> Result<PriceQuery, FormErrors> {
        let mut errors = FormErrors::default();

        if let Err(e) = csrf.verify(self.csrf_token.as_deref()) {
            errors.csrf = Some(e.to_string());
        }

        let coin = match present(&self.coin) {
            None => Err(REQUIRED.to_string()),
            Some(raw) => Coin::parse(raw).map_err(|_| NOT_A_CHOICE.to_string()),
        }
        .map_err(|msg| errors.coin = Some(msg));

        let currency = match present(&self.currency) {
            None => Err(REQUIRED.to_string()),
            Some(raw) => Currency::parse(raw).map_err(|_| NOT_A_CHOICE.to_string()),
        }
        .map_err(|msg| errors.currency = Some(msg));

        let days = match present(&self.days) {
            None => Err(REQUIRED.to_string()),
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| NOT_AN_INTEGER.to_string())
                .and_then(|n| {
                    Days::new(n).map_err(|_| {
                        format!("Number must be between {} and {}.", Days::MIN, Days::MAX)
                    })
                }),
        }
        .map_err(|msg| errors.days = Some(msg));

        match (coin, currency, days) {
            (Ok(coin), Ok(currency), Ok(days)) if errors.is_empty() => {
                Ok(PriceQuery::new(coin, currency, days))
            }
            _ => Err(errors),
        }
    }
}

/// Fields of the spot-price variant form. All free text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotForm {
    pub crypto: Option<String>,
    pub currency: Option<String>,
    pub include_time: Option<String>,
}

impl SpotForm {
    pub fn include_time(&self) -> bool {
        matches!(
            present(&self.include_time).map(str::to_ascii_lowercase).as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }
}
