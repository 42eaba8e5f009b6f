//! Server configuration.

use crate::csrf;
use clap::Parser;
use price_feed::{coinbase, coingecko};
use reqwest::Url;
use std::net::SocketAddr;
use std::time::Duration;

/// Used when no `SECRET_KEY` is configured. Fine for local development only.
pub const DEV_SECRET_KEY: &str = "dev_secret_key";

/// Command line and environment settings. Every flag falls back to an env var.
#[derive(Parser, Debug, Clone)]
#[command(name = "price-server")]
#[command(about = "Server-rendered crypto price report")]
pub struct Config {
    /// Address to listen on
    #[arg(short, long, env = "PRICE_SERVER_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Key for signing CSRF tokens
    #[arg(long, env = "SECRET_KEY", default_value = DEV_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Lifetime of a CSRF token, in seconds
    #[arg(
        long,
        env = "CSRF_TTL_SECS",
        default_value_t = csrf::DEFAULT_TTL_SECS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub csrf_ttl_secs: i64,

    /// CoinGecko API base URL
    #[arg(long, env = "COINGECKO_API_URL", default_value = coingecko::DEFAULT_BASE_URL)]
    pub coingecko_url: Url,

    /// CoinGecko demo API key, sent as `x-cg-demo-api-key`
    #[arg(long, env = "COINGECKO_API_KEY", hide_env_values = true)]
    pub coingecko_api_key: Option<String>,

    /// Coinbase API base URL for the spot-price page
    #[arg(long, env = "COINBASE_API_URL", default_value = coinbase::DEFAULT_BASE_URL)]
    pub coinbase_url: Url,

    /// Deadline for each outbound request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = coingecko::DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn coingecko(&self) -> coingecko::CoinGeckoConfig {
        coingecko::CoinGeckoConfig {
            base_url: self.coingecko_url.clone(),
            api_key: self.coingecko_api_key.clone().filter(|k| !k.is_empty()),
            timeout: self.timeout(),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}
