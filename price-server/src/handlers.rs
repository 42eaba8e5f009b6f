//! HTTP request handlers.

use crate::app::AppState;
use crate::form::{FormErrors, ReportForm, SpotForm};
use crate::views;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use chrono::Local;
use tracing::{debug, info, warn};

/// Body of `POST /price` whenever the lookup fails, whatever the reason.
pub const SPOT_ERROR: &str = "Error: unable to fetch price";

/// GET / - Empty report form.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(views::form_page(
        &ReportForm::default(),
        &FormErrors::default(),
        &state.csrf.issue(),
    ))
}

/// POST / - Validate the form, fetch the report, render results.
///
/// A body that is not a urlencoded form is treated as an empty submission.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<ReportForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            debug!("unreadable report form: {e}");
            ReportForm::default()
        }
    };
    let token = state.csrf.issue();

    let query = match form.validate(&state.csrf) {
        Ok(query) => query,
        Err(errors) => {
            debug!(?errors, "form rejected");
            return Html(views::form_page(&form, &errors, &token));
        }
    };

    let (report, error) = match state.fetcher.fetch_query(&query).await {
        Ok(report) => {
            info!(
                coin = %query.coin,
                currency = %query.currency,
                days = %query.days,
                points = report.history.len(),
                "report ready"
            );
            (Some(report), None)
        }
        Err(e) => {
            warn!(coin = %query.coin, currency = %query.currency, "fetch failed: {e}");
            (None, Some(format!("Error fetching data from API: {e}")))
        }
    };

    Html(views::results_page(
        &form,
        &token,
        report.as_ref(),
        error.as_deref(),
    ))
}

/// GET /price - Spot-price form.
pub async fn spot_form() -> Html<String> {
    Html(views::spot_form_page())
}

/// POST /price - Bare spot price as plain text.
pub async fn spot_price(
    State(state): State<AppState>,
    form: Result<Form<SpotForm>, FormRejection>,
) -> String {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            warn!("unreadable spot form: {e}");
            return SPOT_ERROR.to_string();
        }
    };
    let crypto = form.crypto.as_deref().unwrap_or_default();
    let currency = form.currency.as_deref().unwrap_or_default();

    match state.spot.spot_price(crypto, currency).await {
        Ok(spot) if form.include_time() => format!(
            "{} (as of {})",
            spot.amount,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        Ok(spot) => spot.amount,
        Err(e) => {
            warn!(crypto, currency, "spot price failed: {e}");
            SPOT_ERROR.to_string()
        }
    }
}
