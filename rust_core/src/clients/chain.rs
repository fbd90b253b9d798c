//! REST client for the ledger's indexer query service.
//!
//! Read-only public endpoints, no authentication. Every request carries the
//! configured timeout; a timed-out or failed request surfaces as an error
//! that the gateway treats as "no data from this kind".

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::ChainQuery;

#[derive(Clone)]
pub struct ChainRestClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ChainRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChainRestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("marketscope/0.1")
            .build()
            .context("Failed to build HTTP client for chain query service")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("chain query {} returned {}", url, status);
        }

        resp.json::<Value>()
            .await
            .with_context(|| format!("invalid JSON from {}", url))
    }
}

#[async_trait]
impl ChainQuery for ChainRestClient {
    async fn derivative_markets(&self) -> Result<Value> {
        self.get_json("/api/exchange/derivative/v1/markets").await
    }

    async fn spot_markets(&self) -> Result<Value> {
        self.get_json("/api/exchange/spot/v1/markets").await
    }

    async fn derivative_market(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/derivative/v1/markets/{}", market_id))
            .await
    }

    async fn spot_market(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/spot/v1/markets/{}", market_id))
            .await
    }

    async fn derivative_orderbook(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/derivative/v1/orderbooks/{}", market_id))
            .await
    }

    async fn spot_orderbook(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/spot/v1/orderbooks/{}", market_id))
            .await
    }

    async fn derivative_trades(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/derivative/v1/trades?marketId={}", market_id))
            .await
    }

    async fn spot_trades(&self, market_id: &str) -> Result<Value> {
        self.get_json(&format!("/api/exchange/spot/v1/trades?marketId={}", market_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = ChainRestClient::new("https://example.test/", Duration::from_secs(5)).unwrap();
        assert!(format!("{:?}", client).contains("\"https://example.test\""));
    }
}
