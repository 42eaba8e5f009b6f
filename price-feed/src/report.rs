//! Summary statistics over a price history, shaped for display.

use crate::error::DataError;
use crate::fetcher::{PricePoint, SpotQuote};
use crate::query::PriceQuery;
use chrono::{Local, TimeZone};
use std::fmt::Display;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const PRICE_DECIMALS: i32 = 4;
const PERCENT_DECIMALS: i32 = 2;

/// One row of the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp_ms: i64,
    pub datetime: String,
    pub price: f64,
}

/// Everything the results page shows for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub coin_id: String,
    /// Uppercase, e.g. `USD`.
    pub currency: String,
    pub current_price: f64,
    pub change_24h: Option<f64>,
    pub last_updated: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub period_change_pct: f64,
    pub days: u32,
    pub history: Vec<HistoryEntry>,
}

/// Raw statistics before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub change_pct: f64,
}

pub(crate) fn summarize(history: &[PricePoint]) -> Result<Summary, DataError> {
    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (first.price, last.price),
        _ => return Err(DataError::EmptyHistory),
    };
    if first == 0.0 {
        return Err(DataError::ZeroStartPrice);
    }

    let (min, max, sum) = history.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), p| (min.min(p.price), max.max(p.price), sum + p.price),
    );

    Ok(Summary {
        min,
        max,
        avg: sum / history.len() as f64,
        change_pct: (last - first) / first * 100.0,
    })
}

/// Round to `places` decimals, ties to even.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn format_millis<Tz>(tz: &Tz, millis: i64) -> Result<String, DataError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .ok_or(DataError::InvalidTimestamp(millis))
}

/// Build a report with timestamps rendered in the server's local time.
pub fn build_report(
    query: &PriceQuery,
    spot: &SpotQuote,
    history: &[PricePoint],
) -> Result<PriceReport, DataError> {
    build_report_in(&Local, query, spot, history)
}

/// Build a report with timestamps rendered in `tz`.
pub fn build_report_in<Tz>(
    tz: &Tz,
    query: &PriceQuery,
    spot: &SpotQuote,
    history: &[PricePoint],
) -> Result<PriceReport, DataError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let summary = summarize(history)?;
    let min_price = round_to(summary.min, PRICE_DECIMALS);
    let max_price = round_to(summary.max, PRICE_DECIMALS);
    // the mean of equal prices can sit an ulp above them
    let avg_price = round_to(summary.avg, PRICE_DECIMALS).clamp(min_price, max_price);

    let history = history
        .iter()
        .map(|p| {
            Ok(HistoryEntry {
                timestamp_ms: p.timestamp_ms,
                datetime: format_millis(tz, p.timestamp_ms)?,
                price: round_to(p.price, PRICE_DECIMALS),
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    let last_updated = spot
        .last_updated_at
        .map(|secs| format_millis(tz, secs.saturating_mul(1000)))
        .transpose()?;

    Ok(PriceReport {
        coin_id: query.coin.id().to_string(),
        currency: query.currency.label().to_string(),
        current_price: round_to(spot.price, PRICE_DECIMALS),
        change_24h: spot.change_24h.map(|c| round_to(c, PERCENT_DECIMALS)),
        last_updated,
        min_price,
        max_price,
        avg_price,
        period_change_pct: round_to(summary.change_pct, PERCENT_DECIMALS),
        days: query.days.get(),
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Coin, Currency, Days};
    use chrono::Utc;

    fn query(days: i64) -> PriceQuery {
        PriceQuery::new(Coin::Bitcoin, Currency::Usd, Days::new(days).unwrap())
    }

    fn spot() -> SpotQuote {
        SpotQuote {
            price: 64_123.456_78,
            change_24h: Some(-2.345_6),
            last_updated_at: Some(1_700_000_000),
        }
    }

    fn points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp_ms: 1_700_000_000_000 + i as i64 * 60_000,
                price,
            })
            .collect()
    }

    #[test]
    fn two_point_example() {
        let report = build_report_in(&Utc, &query(1), &spot(), &points(&[100.0, 150.0])).unwrap();

        assert_eq!(report.min_price, 100.0);
        assert_eq!(report.max_price, 150.0);
        assert_eq!(report.avg_price, 125.0);
        assert_eq!(report.period_change_pct, 50.0);
        assert_eq!(report.days, 1);
        assert_eq!(report.currency, "USD");
    }

    #[test]
    fn rounds_prices_and_percentages() {
        let report =
            build_report_in(&Utc, &query(2), &spot(), &points(&[3.0, 1.234_567, 2.0])).unwrap();

        assert_eq!(report.current_price, 64_123.456_8);
        assert_eq!(report.change_24h, Some(-2.35));
        assert_eq!(report.min_price, 1.234_6);
        assert_eq!(report.avg_price, 2.078_2);
        assert_eq!(report.history[1].price, 1.234_6);
        // (2 - 3) / 3 * 100 = -33.333..
        assert_eq!(report.period_change_pct, -33.33);
    }

    #[test]
    fn min_avg_max_are_ordered() {
        let series = [
            vec![5.0],
            vec![1.0, 1.0, 1.0],
            vec![0.000_01, 98_000.5, 42.0, 7.7],
            vec![10.0, 9.0, 8.0, 7.0, 100.0],
        ];
        for prices in series {
            let report = build_report_in(&Utc, &query(3), &spot(), &points(&prices)).unwrap();
            assert!(report.min_price <= report.avg_price, "{prices:?}");
            assert!(report.avg_price <= report.max_price, "{prices:?}");
        }
    }

    #[test]
    fn flat_series_keeps_avg_within_bounds() {
        let report =
            build_report_in(&Utc, &query(1), &spot(), &points(&[2.883_85; 3])).unwrap();

        assert_eq!(report.min_price, 2.883_8);
        assert_eq!(report.max_price, 2.883_8);
        assert_eq!(report.avg_price, 2.883_8);
    }

    #[test]
    fn ties_round_to_even() {
        // (801 - 800) / 800 * 100 = 0.125
        let report = build_report_in(&Utc, &query(1), &spot(), &points(&[800.0, 801.0])).unwrap();
        assert_eq!(report.period_change_pct, 0.12);

        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn period_change_uses_first_and_last_in_order() {
        let s = summarize(&points(&[200.0, 50.0, 400.0, 150.0])).unwrap();
        assert_eq!(s.change_pct, -25.0);
        assert_eq!(s.min, 50.0);
        assert_eq!(s.max, 400.0);
    }

    #[test]
    fn timestamps_are_formatted() {
        let report = build_report_in(&Utc, &query(1), &spot(), &points(&[1.0, 2.0])).unwrap();

        // 1_700_000_000 s = 2023-11-14 22:13:20 UTC
        assert_eq!(report.last_updated.as_deref(), Some("2023-11-14 22:13"));
        assert_eq!(report.history[0].datetime, "2023-11-14 22:13");
        assert_eq!(report.history[1].datetime, "2023-11-14 22:14");
        assert_eq!(report.history[0].timestamp_ms, 1_700_000_000_000);
    }

    #[test]
    fn optional_spot_fields_stay_absent() {
        let spot = SpotQuote {
            price: 1.0,
            change_24h: None,
            last_updated_at: None,
        };
        let report = build_report_in(&Utc, &query(1), &spot, &points(&[1.0])).unwrap();

        assert_eq!(report.change_24h, None);
        assert_eq!(report.last_updated, None);
        assert_eq!(report.period_change_pct, 0.0);
    }

    #[test]
    fn empty_and_zero_start_are_rejected() {
        assert!(matches!(summarize(&[]), Err(DataError::EmptyHistory)));
        assert!(matches!(
            summarize(&points(&[0.0, 1.0])),
            Err(DataError::ZeroStartPrice)
        ));
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let bad = [PricePoint {
            timestamp_ms: i64::MAX,
            price: 1.0,
        }];
        let err = build_report_in(&Utc, &query(1), &spot(), &bad).unwrap_err();
        assert!(matches!(err, DataError::InvalidTimestamp(i64::MAX)));
    }
}
