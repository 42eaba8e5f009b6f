//! Crypto price report server.
//!
//! Run with:
//! ```bash
//! SECRET_KEY=change-me price-server --listen 127.0.0.1:5000
//! ```

mod app;
mod config;
mod csrf;
mod form;
mod handlers;
mod views;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // RUST_LOG=debug price-server
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "price_server=debug,price_feed=debug,tower_http=info,info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::parse();

    info!("Starting price server");
    info!("  Listen: {}", config.listen);
    info!("  CoinGecko: {}", config.coingecko_url);
    info!("  Coinbase: {}", config.coinbase_url);
    info!("  Timeout: {}s", config.timeout_secs);

    app::run(config).await
}
