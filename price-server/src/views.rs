//! Server-rendered HTML pages.

use crate::form::{FormErrors, ReportForm};
use price_feed::{Coin, Currency, PriceReport};

/// Escape text for use in HTML bodies and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}
.error {{ color: #b00020; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: right; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn field_error(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<span class="error">{}</span>"#, escape(m)))
        .unwrap_or_default()
}

fn select<T: Copy>(
    name: &str,
    options: impl Iterator<Item = T>,
    value: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
    selected: Option<&str>,
) -> String {
    let mut html = format!(r#"<select name="{name}" id="{name}">"#);
    for opt in options {
        let v = value(opt);
        let sel = if selected.is_some_and(|s| s.trim().eq_ignore_ascii_case(v)) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(r#"<option value="{v}"{sel}>{}</option>"#, label(opt)));
    }
    html.push_str("</select>");
    html
}

fn report_form(form: &ReportForm, errors: &FormErrors, csrf_token: &str) -> String {
    let days = form.days.as_deref().map(escape).unwrap_or_default();
    format!(
        r#"<form method="post" action="/">
<input type="hidden" name="csrf_token" value="{token}">
{csrf_error}
<p><label for="coin">Cryptocurrency</label>
{coin} {coin_error}</p>
<p><label for="currency">Fiat Currency</label>
{currency} {currency_error}</p>
<p><label for="days">Days of price history (1–30)</label>
<input type="number" name="days" id="days" min="1" max="30" value="{days}"> {days_error}</p>
<p><input type="submit" name="submit" value="Get Prices"></p>
</form>"#,
        token = escape(csrf_token),
        csrf_error = field_error(errors.csrf.as_deref()),
        coin = select("coin", Coin::all(), Coin::id, Coin::label, form.coin.as_deref()),
        coin_error = field_error(errors.coin.as_deref()),
        currency = select(
            "currency",
            Currency::all(),
            Currency::code,
            Currency::label,
            form.currency.as_deref(),
        ),
        currency_error = field_error(errors.currency.as_deref()),
        days_error = field_error(errors.days.as_deref()),
    )
}

/// `GET /` and rejected submissions.
pub fn form_page(form: &ReportForm, errors: &FormErrors, csrf_token: &str) -> String {
    let body = format!(
        "<h1>Crypto Price Lookup</h1>\n{}",
        report_form(form, errors, csrf_token)
    );
    layout("Crypto Price Lookup", &body)
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn report_section(report: &PriceReport) -> String {
    let cur = escape(&report.currency);
    let mut html = format!(
        r#"<h2>{coin} ({cur})</h2>
<table class="summary">
<tr><th>Current price</th><td>{current} {cur}</td></tr>
<tr><th>24h change</th><td>{change_24h}</td></tr>
<tr><th>Last updated</th><td>{last_updated}</td></tr>
<tr><th>Min ({days}d)</th><td>{min} {cur}</td></tr>
<tr><th>Max ({days}d)</th><td>{max} {cur}</td></tr>
<tr><th>Average ({days}d)</th><td>{avg} {cur}</td></tr>
<tr><th>Change over period</th><td>{period}</td></tr>
</table>
<h3>Price history</h3>
<table class="history">
<tr><th>Date</th><th>Price ({cur})</th></tr>
"#,
        coin = escape(&report.coin_id),
        current = report.current_price,
        change_24h = report.change_24h.map(percent).unwrap_or_else(|| "n/a".into()),
        last_updated = report
            .last_updated
            .as_deref()
            .map(escape)
            .unwrap_or_else(|| "n/a".into()),
        days = report.days,
        min = report.min_price,
        max = report.max_price,
        avg = report.avg_price,
        period = percent(report.period_change_pct),
    );
    for entry in &report.history {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&entry.datetime),
            entry.price
        ));
    }
    html.push_str("</table>");
    html
}

/// Accepted submission: the report or the fetch error, then the form again.
pub fn results_page(
    form: &ReportForm,
    csrf_token: &str,
    report: Option<&PriceReport>,
    error: Option<&str>,
) -> String {
    let mut body = String::from("<h1>Crypto Price Results</h1>\n");
    if let Some(error) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
    }
    if let Some(report) = report {
        body.push_str(&report_section(report));
        body.push('\n');
    }
    body.push_str(&report_form(form, &FormErrors::default(), csrf_token));
    layout("Crypto Price Results", &body)
}

/// `GET /price`: the spot-only variant.
pub fn spot_form_page() -> String {
    let body = r#"<h1>Spot Price</h1>
<form method="post" action="/price">
<p><label for="crypto">Crypto</label> <input type="text" name="crypto" id="crypto" placeholder="BTC"></p>
<p><label for="currency">Currency</label> <input type="text" name="currency" id="currency" placeholder="USD"></p>
<p><label><input type="checkbox" name="include_time"> Include time</label></p>
<p><input type="submit" value="Get Price"></p>
</form>"#;
    layout("Spot Price", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_feed::HistoryEntry;

    fn report() -> PriceReport {
        PriceReport {
            coin_id: "bitcoin".into(),
            currency: "USD".into(),
            current_price: 150.0,
            change_24h: Some(-1.5),
            last_updated: None,
            min_price: 100.0,
            max_price: 150.0,
            avg_price: 125.0,
            period_change_pct: 50.0,
            days: 1,
            history: vec![
                HistoryEntry {
                    timestamp_ms: 0,
                    datetime: "2023-11-14 22:13".into(),
                    price: 100.0,
                },
                HistoryEntry {
                    timestamp_ms: 60_000,
                    datetime: "2023-11-14 22:14".into(),
                    price: 150.0,
                },
            ],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn form_keeps_submitted_values_and_errors() {
        let form = ReportForm {
            coin: Some("ethereum".into()),
            currency: Some("gbp".into()),
            days: Some("\"><b>".into()),
            csrf_token: None,
        };
        let errors = FormErrors {
            days: Some("Not a valid integer value.".into()),
            ..FormErrors::default()
        };

        let html = form_page(&form, &errors, "tok");

        assert!(html.contains(r#"<option value="ethereum" selected>Ethereum</option>"#));
        assert!(html.contains(r#"<option value="gbp" selected>GBP</option>"#));
        assert!(html.contains(r#"<option value="bitcoin">Bitcoin</option>"#));
        assert!(html.contains(r#"value="&quot;&gt;&lt;b&gt;""#));
        assert!(html.contains("Not a valid integer value."));
        assert!(html.contains(r#"name="csrf_token" value="tok""#));
    }

    #[test]
    fn results_show_summary_and_history() {
        let html = results_page(&ReportForm::default(), "tok", Some(&report()), None);

        assert!(html.contains("<tr><th>Average (1d)</th><td>125 USD</td></tr>"));
        assert!(html.contains("<tr><th>Change over period</th><td>50.00%</td></tr>"));
        assert!(html.contains("<tr><th>24h change</th><td>-1.50%</td></tr>"));
        assert!(html.contains("<tr><th>Last updated</th><td>n/a</td></tr>"));
        assert!(html.contains("<tr><td>2023-11-14 22:14</td><td>150</td></tr>"));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn results_show_error_without_report() {
        let html = results_page(
            &ReportForm::default(),
            "tok",
            None,
            Some("Error fetching data from API: <boom>"),
        );

        assert!(html.contains(r#"<p class="error">Error fetching data from API: &lt;boom&gt;</p>"#));
        assert!(!html.contains("Price history"));
        assert!(html.contains(r#"<form method="post" action="/">"#));
    }
}
