//! Shared request plumbing for the upstream clients.

use crate::error::FetchError;
use reqwest::header::ACCEPT;
use reqwest::RequestBuilder;
use std::time::Duration;
use tracing::debug;

/// Upstream error bodies are echoed to users; keep them short.
const MAX_ERROR_BODY: usize = 200;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a JSON GET and return the body of a 2xx response.
pub(crate) async fn fetch_body(request: RequestBuilder) -> Result<Vec<u8>, FetchError> {
    let resp = request.header(ACCEPT, "application/json").send().await?;

    let status = resp.status();
    debug!(url = %resp.url(), %status, "upstream responded");
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Http {
            status: status.as_u16(),
            body: truncate(body.trim()),
        });
    }

    Ok(resp.bytes().await?.to_vec())
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
