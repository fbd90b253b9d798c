//! Read-through market data gateway.
//!
//! Orchestrates the per-kind sources: every operation consults the shared
//! TTL cache first, otherwise walks the source list in precedence order
//! (derivative, then spot), normalizes whatever answers, caches the result,
//! and returns it. Upstream failures are logged and degraded, never
//! propagated raw.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::cache::{cache_key, TtlCache};
use crate::clients::{ChainQuery, ChainRestClient};
use crate::config::{GatewayConfig, Network};
use crate::error::{GatewayError, Result};
use crate::models::{MarketInfo, MarketKind, MarketSummary, Orderbook, Trade};
use crate::sources::{DerivativeSource, MarketDataSource, SpotSource, MAX_ORDERBOOK_LEVELS};

/// Values the shared cache can hold, one variant per operation shape.
#[derive(Clone)]
enum CachedValue {
    Markets(Vec<MarketInfo>),
    Summary(MarketSummary),
    Orderbook(Orderbook),
    Trades(Vec<Trade>),
}

/// Single gateway instance owning the cache and the lazily-connected
/// upstream sources. Constructed once at process start and shared by
/// reference with whatever serves requests.
pub struct MarketGateway {
    config: GatewayConfig,
    cache: TtlCache<CachedValue>,
    sources: OnceCell<Vec<Arc<dyn MarketDataSource>>>,
}

impl MarketGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl, config.cache_max_entries);
        Self {
            config,
            cache,
            sources: OnceCell::new(),
        }
    }

    /// Build a gateway over explicit sources, skipping the lazy upstream
    /// connection. The precedence order is the vec order.
    pub fn with_sources(config: GatewayConfig, sources: Vec<Arc<dyn MarketDataSource>>) -> Self {
        let cache = TtlCache::new(config.cache_ttl, config.cache_max_entries);
        let cell = OnceCell::new();
        cell.set(sources).ok();
        Self {
            config,
            cache,
            sources: cell,
        }
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    /// Connect to the query service at most once per process lifetime.
    /// Concurrent first callers all await the same initialization.
    async fn sources(&self) -> Result<&[Arc<dyn MarketDataSource>]> {
        let sources = self
            .sources
            .get_or_try_init(|| async {
                tracing::info!(
                    endpoint = %self.config.query_endpoint,
                    network = %self.config.network.as_str(),
                    "connecting to chain query service"
                );
                let client: Arc<dyn ChainQuery> = Arc::new(ChainRestClient::new(
                    &self.config.query_endpoint,
                    self.config.upstream_timeout,
                )?);
                let sources: Vec<Arc<dyn MarketDataSource>> = vec![
                    Arc::new(DerivativeSource::new(client.clone())),
                    Arc::new(SpotSource::new(client)),
                ];
                Ok::<_, anyhow::Error>(sources)
            })
            .await
            .map_err(GatewayError::Init)?;
        Ok(sources.as_slice())
    }

    /// All markets of every kind, derivative entries first. A failing kind
    /// contributes zero markets instead of failing the whole call.
    pub async fn list_markets(&self) -> Result<Vec<MarketInfo>> {
        let key = cache_key("all_markets", &[]);
        if let Some(CachedValue::Markets(markets)) = self.cache.get(&key) {
            return Ok(markets);
        }

        let mut markets = Vec::new();
        for source in self.sources().await? {
            match source.list_markets().await {
                Ok(mut found) => markets.append(&mut found),
                Err(e) => {
                    tracing::warn!(kind = %source.kind(), error = %e, "market list fetch failed");
                }
            }
        }

        self.cache.put(&key, CachedValue::Markets(markets.clone()));
        Ok(markets)
    }

    /// Summary for one market, first kind that resolves it. `None` when
    /// neither kind does (or both are unreachable).
    pub async fn market_summary(&self, market_id: &str) -> Result<Option<MarketSummary>> {
        let key = cache_key("market_summary", &[market_id]);
        if let Some(CachedValue::Summary(summary)) = self.cache.get(&key) {
            return Ok(Some(summary));
        }

        for source in self.sources().await? {
            match source.market_summary(market_id).await {
                Ok(Some(summary)) => {
                    self.cache.put(&key, CachedValue::Summary(summary.clone()));
                    return Ok(Some(summary));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(kind = %source.kind(), market_id, error = %e, "summary fetch failed");
                }
            }
        }
        Ok(None)
    }

    /// Orderbook snapshot, sides capped at [`MAX_ORDERBOOK_LEVELS`] before
    /// caching.
    pub async fn orderbook(&self, market_id: &str) -> Result<Option<Orderbook>> {
        let key = cache_key("orderbook", &[market_id]);
        if let Some(CachedValue::Orderbook(book)) = self.cache.get(&key) {
            return Ok(Some(book));
        }

        for source in self.sources().await? {
            match source.orderbook(market_id).await {
                Ok(Some(mut book)) => {
                    book.bids.truncate(MAX_ORDERBOOK_LEVELS);
                    book.asks.truncate(MAX_ORDERBOOK_LEVELS);
                    self.cache.put(&key, CachedValue::Orderbook(book.clone()));
                    return Ok(Some(book));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(kind = %source.kind(), market_id, error = %e, "orderbook fetch failed");
                }
            }
        }
        Ok(None)
    }

    /// Recent trades, at most `limit`. Derivative trades win when present;
    /// an empty derivative history falls through to spot. Always a list,
    /// never "not found". The cache key includes the limit, so distinct
    /// limits are cached independently.
    pub async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<Vec<Trade>> {
        let limit_arg = limit.to_string();
        let key = cache_key("trades", &[market_id, &limit_arg]);
        if let Some(CachedValue::Trades(trades)) = self.cache.get(&key) {
            return Ok(trades);
        }

        let mut trades = Vec::new();
        for source in self.sources().await? {
            match source.recent_trades(market_id, limit).await {
                Ok(found) if !found.is_empty() => {
                    trades = found;
                    trades.truncate(limit);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(kind = %source.kind(), market_id, error = %e, "trades fetch failed");
                }
            }
        }

        self.cache.put(&key, CachedValue::Trades(trades.clone()));
        Ok(trades)
    }

    /// Drop every cached entry; the next call of each operation re-fetches.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("gateway cache cleared");
    }

    /// Current cache entry count, for health reporting.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Markets filtered by kind, same degradation rules as
    /// [`MarketGateway::list_markets`].
    pub async fn list_markets_of_kind(&self, kind: Option<MarketKind>) -> Result<Vec<MarketInfo>> {
        let markets = self.list_markets().await?;
        Ok(match kind {
            Some(kind) => markets.into_iter().filter(|m| m.kind == kind).collect(),
            None => markets,
        })
    }
}
