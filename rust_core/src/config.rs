//! Configuration for the market data gateway.

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

const MAINNET_QUERY_ENDPOINT: &str = "https://sentry.exchange.grpc-web.injective.network";
const TESTNET_QUERY_ENDPOINT: &str = "https://testnet.sentry.exchange.grpc-web.injective.network";

/// Which chain deployment the gateway queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    fn default_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_QUERY_ENDPOINT,
            Network::Testnet => TESTNET_QUERY_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub network: Network,
    /// Base URL of the ledger's query service.
    pub query_endpoint: String,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    /// Per-request budget for upstream calls; a timeout counts as a failed
    /// fetch for fallback purposes.
    pub upstream_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            query_endpoint: Network::Testnet.default_endpoint().to_string(),
            cache_ttl: Duration::from_secs(60),
            cache_max_entries: 1000,
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let network = match env::var("MARKETSCOPE_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase()
            .as_str()
        {
            "mainnet" => Network::Mainnet,
            "testnet" => Network::Testnet,
            other => return Err(anyhow!("MARKETSCOPE_NETWORK must be mainnet or testnet, got {}", other)),
        };

        let query_endpoint = env::var("MARKETSCOPE_QUERY_ENDPOINT")
            .unwrap_or_else(|_| network.default_endpoint().to_string());

        let cache_ttl_secs = parse_u64("CACHE_TTL_SECS", 60)?;
        let cache_max_entries = parse_u64("CACHE_MAX_ENTRIES", 1000)? as usize;
        let upstream_timeout_secs = parse_u64("UPSTREAM_TIMEOUT_SECS", 10)?;

        if cache_max_entries == 0 {
            return Err(anyhow!("CACHE_MAX_ENTRIES must be > 0"));
        }
        if upstream_timeout_secs == 0 {
            return Err(anyhow!("UPSTREAM_TIMEOUT_SECS must be > 0"));
        }

        Ok(Self {
            network,
            query_endpoint,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
        })
    }
}

/// Parse environment variable as u64 with default fallback
fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val.parse().map_err(|_| anyhow!("{} must be a valid u64", var_name)),
        Err(_) => Ok(default),
    }
}
