//! Upstream ledger query clients.

pub mod chain;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Polymorphic boundary over the ledger's query service.
///
/// One method per upstream query, returning the raw JSON payload; decoding
/// and schema unification happen in the source layer on top. Anything that
/// can answer these eight queries can back the gateway.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    async fn derivative_markets(&self) -> Result<Value>;
    async fn spot_markets(&self) -> Result<Value>;
    async fn derivative_market(&self, market_id: &str) -> Result<Value>;
    async fn spot_market(&self, market_id: &str) -> Result<Value>;
    async fn derivative_orderbook(&self, market_id: &str) -> Result<Value>;
    async fn spot_orderbook(&self, market_id: &str) -> Result<Value>;
    async fn derivative_trades(&self, market_id: &str) -> Result<Value>;
    async fn spot_trades(&self, market_id: &str) -> Result<Value>;
}

pub use chain::ChainRestClient;
