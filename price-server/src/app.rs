//! Application context, routing and the serve loop.

use crate::config::Config;
use crate::csrf::CsrfSigner;
use crate::handlers;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use price_feed::{CoinGeckoClient, CoinbaseClient, PriceFetcher};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Everything a request handler needs. Built once in `main`, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<PriceFetcher<CoinGeckoClient>>,
    pub spot: Arc<CoinbaseClient>,
    pub csrf: Arc<CsrfSigner>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let coingecko =
            CoinGeckoClient::new(config.coingecko()).context("build CoinGecko client")?;
        let spot = CoinbaseClient::new(config.coinbase_url.clone(), config.timeout())
            .context("build Coinbase client")?;
        let csrf = CsrfSigner::new(&config.secret_key)?.with_ttl(config.csrf_ttl_secs);

        Ok(Self {
            fetcher: Arc::new(PriceFetcher::new(coingecko)),
            spot: Arc::new(spot),
            csrf: Arc::new(csrf),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/price", get(handlers::spot_form).post(handlers::spot_price))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    if config.uses_dev_secret() {
        warn!("SECRET_KEY not set, using the development key");
    }

    let state = AppState::new(&config)?;
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;

    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
